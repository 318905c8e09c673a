use chrono::{DateTime, Utc};

use crate::entry;
use crate::error::Error;

/// Reduce a page of raw records to the ones belonging to `plugin_id`
/// and stamped at or after `since`, preserving page order.
///
/// Records without a `plugin_id` belong to other server components and
/// are dropped silently. A record that fails to decode aborts the whole
/// page: it means the server stopped emitting JSON logs after the
/// preflight check, and skipping it would silently drop the records the
/// operator asked for.
pub fn filter_entries(
    logs: &[String],
    plugin_id: &str,
    since: DateTime<Utc>,
) -> Result<Vec<String>, Error> {
    let mut matched = Vec::new();

    for line in logs {
        let meta = entry::decode_meta(line)?;

        if meta.plugin_id.as_deref() != Some(plugin_id) {
            continue;
        }
        if meta.timestamp.with_timezone(&Utc) < since {
            continue;
        }

        matched.push(entry::sanitize(line).to_string());
    }

    Ok(matched)
}
