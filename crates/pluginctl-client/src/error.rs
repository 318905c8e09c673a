use thiserror::Error;

/// Errors raised while resolving a transport or talking to the server.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("MM_SERVICESETTINGS_SITEURL is not set")]
    MissingSiteUrl,

    #[error("one of MM_ADMIN_TOKEN or MM_ADMIN_USERNAME/MM_ADMIN_PASSWORD must be defined")]
    MissingCredentials,

    #[error("invalid request: {0}")]
    Request(String),

    #[error("request failed")]
    Http(#[from] reqwest::Error),

    #[error("request over local socket failed")]
    Socket(#[from] hyper_util::client::legacy::Error),

    #[error("failed to read response body")]
    Body(#[source] hyper::Error),

    #[error("failed to decode response body")]
    Decode(#[source] serde_json::Error),

    #[error("server returned status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("login response did not include a session token")]
    MissingSessionToken,
}
