use std::io::Write;

use chrono::{DateTime, Utc};

use crate::dedup::split_new_entries;
use crate::error::Error;
use crate::filter::filter_entries;
use crate::source::ServerApi;

/// Number of log records requested per page while following.
pub const LOGS_PER_PAGE: usize = 100;

/// Defensive bound on pages walked within a single tick. The server's
/// log buffer is finite, so hitting this means the overlap detection
/// never fired.
const MAX_PAGES_PER_TICK: usize = 1000;

/// Mutable state of one follow session.
#[derive(Debug)]
pub(crate) struct FollowState {
    /// Lower bound on record timestamps; fixed at session start.
    pub since: DateTime<Utc>,

    /// Exact string of the record most recently written to the sink,
    /// empty before anything was emitted. Sole dedup key.
    pub last_emitted: String,
}

impl FollowState {
    /// State for a session that only wants records from `since` on.
    pub fn starting_at(since: DateTime<Utc>) -> Self {
        Self {
            since,
            last_emitted: String::new(),
        }
    }
}

/// Run one poll tick: walk pages until one overlaps with what was
/// already emitted, writing new records to `out` oldest page first.
pub(crate) async fn run_tick<S: ServerApi, W: Write>(
    server: &S,
    plugin_id: &str,
    state: &mut FollowState,
    out: &mut W,
) -> Result<(), Error> {
    let mut page = 0;

    loop {
        let raw = server.get_logs(page, LOGS_PER_PAGE).await?;
        let filtered = filter_entries(&raw, plugin_id, state.since)?;

        let (to_emit, last_emitted, all_new) = split_new_entries(filtered, &state.last_emitted);
        state.last_emitted = last_emitted;

        write_entries(out, &to_emit)?;

        if !all_new {
            // Reached a page that overlaps prior output (or was empty).
            return Ok(());
        }

        page += 1;
        if page >= MAX_PAGES_PER_TICK {
            tracing::warn!(
                pages = page,
                "giving up on page walk; no overlap with previously emitted records found"
            );
            return Ok(());
        }
    }
}

/// Write records to the sink, one per line, in the order given.
pub(crate) fn write_entries<W: Write>(out: &mut W, entries: &[String]) -> Result<(), Error> {
    for entry in entries {
        writeln!(out, "{entry}").map_err(Error::Sink)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use pluginctl_client::ClientError;
    use pluginctl_types::{LogSettings, ServerConfig};

    const PLUGIN_ID: &str = "some.plugin.id";

    /// Serves one scripted page per `get_logs` call, in order.
    struct ScriptedServer {
        pages: Mutex<VecDeque<Vec<String>>>,
    }

    impl ScriptedServer {
        fn new(pages: Vec<Vec<String>>) -> Self {
            Self {
                pages: Mutex::new(pages.into()),
            }
        }
    }

    impl ServerApi for ScriptedServer {
        async fn get_config(&self) -> Result<ServerConfig, ClientError> {
            Ok(ServerConfig {
                log_settings: LogSettings {
                    file_json: Some(true),
                },
            })
        }

        async fn get_logs(&self, _: usize, _: usize) -> Result<Vec<String>, ClientError> {
            Ok(self.pages.lock().unwrap().pop_front().unwrap_or_default())
        }
    }

    fn record(message: &str) -> String {
        format!(
            r#"{{"message":"{message}", "plugin_id": "{PLUGIN_ID}", "timestamp": "2023-12-18 10:58:53.091 +01:00"}}"#
        )
    }

    fn emitted(out: &[u8]) -> Vec<String> {
        String::from_utf8(out.to_vec())
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_two_page_session_emits_each_record_once() {
        let (a, b, c) = (record("A"), record("B"), record("C"));
        let (d, e) = (record("D"), record("E"));

        // Tick 1: page 0 is all new, so page 1 is fetched; it ends with
        // the already-seen C, so nothing more is emitted and paging
        // stops. Tick 2: page 0 is unchanged and fully overlapping.
        let server = ScriptedServer::new(vec![
            vec![a.clone(), b.clone(), c.clone()],
            vec![d.clone(), e.clone(), c.clone()],
            vec![a.clone(), b.clone(), c.clone()],
        ]);

        let mut state = FollowState::starting_at(DateTime::UNIX_EPOCH);
        let mut out = Vec::new();

        run_tick(&server, PLUGIN_ID, &mut state, &mut out)
            .await
            .unwrap();
        assert_eq!(emitted(&out), vec![a.clone(), b.clone(), c.clone()]);

        run_tick(&server, PLUGIN_ID, &mut state, &mut out)
            .await
            .unwrap();
        assert_eq!(emitted(&out), vec![a, b, c]);
    }

    #[tokio::test]
    async fn test_partial_overlap_emits_only_new_records() {
        let server = ScriptedServer::new(vec![
            vec![record("old1"), record("old2")],
            vec![record("old1"), record("old2"), record("new1"), record("new2")],
        ]);

        let mut state = FollowState::starting_at(DateTime::UNIX_EPOCH);
        let mut out = Vec::new();

        run_tick(&server, PLUGIN_ID, &mut state, &mut out)
            .await
            .unwrap();
        run_tick(&server, PLUGIN_ID, &mut state, &mut out)
            .await
            .unwrap();

        assert_eq!(
            emitted(&out),
            vec![record("old1"), record("old2"), record("new1"), record("new2")]
        );
    }

    #[tokio::test]
    async fn test_empty_page_ends_tick() {
        let server = ScriptedServer::new(vec![Vec::new()]);
        let mut state = FollowState::starting_at(DateTime::UNIX_EPOCH);
        let mut out = Vec::new();

        run_tick(&server, PLUGIN_ID, &mut state, &mut out)
            .await
            .unwrap();
        assert!(out.is_empty());
        assert_eq!(state.last_emitted, "");
    }

    #[tokio::test]
    async fn test_malformed_record_fails_tick() {
        let server = ScriptedServer::new(vec![vec![r#"{"foo"#.to_string()]]);
        let mut state = FollowState::starting_at(DateTime::UNIX_EPOCH);
        let mut out = Vec::new();

        let err = run_tick(&server, PLUGIN_ID, &mut state, &mut out)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadJson { .. }));
        assert!(out.is_empty());
    }
}
