use std::env;
use std::path::{Path, PathBuf};

use tokio::net::UnixStream;

use crate::error::ClientError;

/// Socket path the server uses for local mode when `MM_LOCALSOCKETPATH`
/// is not set.
pub const DEFAULT_LOCAL_SOCKET_PATH: &str = "/var/tmp/mattermost_local.socket";

/// How to reach the server, resolved once at startup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transport {
    /// Local mode over a unix domain socket; bypasses authentication.
    LocalSocket(PathBuf),

    /// HTTPS with a personal access or session token.
    BearerToken { site_url: String, token: String },

    /// HTTPS, logging in with admin credentials to obtain a session.
    LoginCreds {
        site_url: String,
        username: String,
        password: String,
    },
}

impl Transport {
    /// Resolve the transport from the `MM_*` environment.
    ///
    /// A reachable local-mode socket wins over any credentials. With no
    /// socket, `MM_SERVICESETTINGS_SITEURL` is required and a token takes
    /// precedence over username/password.
    pub async fn from_env() -> Result<Self, ClientError> {
        let explicit = env_var("MM_LOCALSOCKETPATH");
        let socket_path = PathBuf::from(
            explicit
                .clone()
                .unwrap_or_else(|| DEFAULT_LOCAL_SOCKET_PATH.to_string()),
        );

        if socket_is_reachable(&socket_path).await {
            tracing::info!(path = %socket_path.display(), "connecting using local mode");
            return Ok(Self::LocalSocket(socket_path));
        }

        if explicit.is_some() {
            tracing::info!(
                path = %socket_path.display(),
                "no socket found for local mode, attempting to authenticate with credentials"
            );
        }

        Self::from_credentials(
            env_var("MM_SERVICESETTINGS_SITEURL"),
            env_var("MM_ADMIN_TOKEN"),
            env_var("MM_ADMIN_USERNAME"),
            env_var("MM_ADMIN_PASSWORD"),
        )
    }

    /// Pick a credential-based transport. Split out of [`Self::from_env`]
    /// so the precedence rules can be tested without touching the process
    /// environment.
    fn from_credentials(
        site_url: Option<String>,
        token: Option<String>,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, ClientError> {
        let site_url = site_url.ok_or(ClientError::MissingSiteUrl)?;

        if let Some(token) = token {
            return Ok(Self::BearerToken { site_url, token });
        }

        if let (Some(username), Some(password)) = (username, password) {
            return Ok(Self::LoginCreds {
                site_url,
                username,
                password,
            });
        }

        Err(ClientError::MissingCredentials)
    }
}

/// Read an environment variable, treating empty values as unset.
fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

async fn socket_is_reachable(path: &Path) -> bool {
    UnixStream::connect(path).await.is_ok()
}
