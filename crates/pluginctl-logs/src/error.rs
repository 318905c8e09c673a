use thiserror::Error;

use pluginctl_client::ClientError;

/// Errors raised by the log follower. None of them are recovered
/// locally; each one ends the session.
#[derive(Debug, Error)]
pub enum Error {
    /// The server is not writing file logs as JSON records.
    #[error(
        "JSON output for file logs is disabled. Please enable LogSettings.FileJson via the configuration in Mattermost."
    )]
    JsonLogsDisabled,

    /// A server RPC failed.
    #[error("failed to fetch log entries")]
    Transport(#[from] ClientError),

    /// A record was not a valid JSON object.
    #[error("log entry is not valid JSON")]
    BadJson {
        #[source]
        source: serde_json::Error,
    },

    /// A record carried a timestamp outside the expected layout.
    #[error("unknown timestamp format: {value:?}")]
    BadTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    /// Writing to the output sink failed.
    #[error("failed to write log entry to stdout")]
    Sink(#[source] std::io::Error),
}
