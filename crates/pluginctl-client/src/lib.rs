//! Mattermost API client for pluginctl
//!
//! Resolves how to reach the server from the `MM_*` environment (local
//! mode over a unix socket, a bearer token, or username/password login)
//! and exposes the handful of API v4 calls the tools need.

mod client;
mod error;
mod transport;

pub use client::Client;
pub use error::ClientError;
pub use transport::{DEFAULT_LOCAL_SOCKET_PATH, Transport};
