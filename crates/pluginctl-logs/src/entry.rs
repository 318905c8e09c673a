use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::error::Error;

/// Timestamp layout of the server's JSON file log, for example
/// `2023-12-18 10:58:53.091 +01:00`. Millisecond precision and an
/// explicit numeric zone offset are required; anything else is a decode
/// error.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f %:z";

/// The two record fields the follower makes decisions on. The rest of
/// the record is opaque and emitted verbatim.
#[derive(Debug)]
pub struct EntryMeta {
    pub plugin_id: Option<String>,
    pub timestamp: DateTime<FixedOffset>,
}

#[derive(Deserialize)]
struct RawMeta {
    plugin_id: Option<String>,
    timestamp: Option<String>,
}

/// Extract `plugin_id` and `timestamp` from a raw record.
pub fn decode_meta(line: &str) -> Result<EntryMeta, Error> {
    let raw: RawMeta =
        serde_json::from_str(line).map_err(|source| Error::BadJson { source })?;

    let value = raw.timestamp.unwrap_or_default();
    let timestamp = DateTime::parse_from_str(&value, TIMESTAMP_FORMAT)
        .map_err(|source| Error::BadTimestamp { value, source })?;

    Ok(EntryMeta {
        plugin_id: raw.plugin_id,
        timestamp,
    })
}

/// Strip the single leading newline some server versions prefix to file
/// log records, so output is consistent across versions.
pub fn sanitize(line: &str) -> &str {
    line.strip_prefix('\n').unwrap_or(line)
}
