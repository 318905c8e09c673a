use std::io::Write;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::{self, Instant};
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::filter::filter_entries;
use crate::pager::{FollowState, run_tick, write_entries};
use crate::preflight::ensure_json_logs;
use crate::source::ServerApi;

/// Record window requested by the one-shot [`tail`].
pub const TAIL_WINDOW: usize = 500;

/// Poll interval of [`follow`].
const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// One-shot: fetch the latest [`TAIL_WINDOW`] server log records and
/// print the ones belonging to `plugin_id` to `out`.
pub async fn tail<S: ServerApi, W: Write>(
    server: &S,
    plugin_id: &str,
    out: &mut W,
) -> Result<(), Error> {
    ensure_json_logs(server).await?;

    let raw = server.get_logs(0, TAIL_WINDOW).await?;
    let entries = filter_entries(&raw, plugin_id, DateTime::UNIX_EPOCH)?;
    write_entries(out, &entries)
}

/// Follow the plugin's log records until `cancel` is triggered.
///
/// Records stamped before the session starts are never shown. One pager
/// pass runs per tick of a 1-second clock; passes never overlap, and
/// cancellation is honoured between passes, so a pass always runs to
/// completion or to its first error. Any error ends the session.
pub async fn follow<S: ServerApi, W: Write>(
    server: &S,
    plugin_id: &str,
    cancel: CancellationToken,
    out: &mut W,
) -> Result<(), Error> {
    ensure_json_logs(server).await?;

    let mut state = FollowState::starting_at(Utc::now());

    // First tick fires one interval after start, like a ticker.
    let mut ticker = time::interval_at(Instant::now() + TICK_INTERVAL, TICK_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Ok(()),
            _ = ticker.tick() => run_tick(server, plugin_id, &mut state, out).await?,
        }
    }
}
