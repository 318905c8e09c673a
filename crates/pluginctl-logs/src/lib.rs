//! Log following for pluginctl
//!
//! A bounded-memory, duplicate-free tail over the server's paginated
//! JSON log endpoint: record codec, plugin/time filter, dedup tracker,
//! pager, the tick-driven follower and the JSON-log preflight check.

mod dedup;
mod entry;
mod error;
mod filter;
mod follower;
mod pager;
mod preflight;
mod source;

pub use entry::TIMESTAMP_FORMAT;
pub use error::Error;
pub use follower::{TAIL_WINDOW, follow, tail};
pub use pager::LOGS_PER_PAGE;
pub use preflight::ensure_json_logs;
pub use source::ServerApi;
