use crate::error::Error;
use crate::source::ServerApi;

/// Verify the server writes file logs as JSON records.
///
/// The follower parses every record as JSON; with `LogSettings.FileJson`
/// absent or disabled each record would fail to decode, so refuse to
/// start instead. Run once per session, before the first fetch.
pub async fn ensure_json_logs<S: ServerApi>(server: &S) -> Result<(), Error> {
    let config = server.get_config().await?;
    if config.log_settings.file_json != Some(true) {
        return Err(Error::JsonLogsDisabled);
    }
    Ok(())
}
