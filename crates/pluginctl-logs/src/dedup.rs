/// Split a filtered page into the records that have not been emitted
/// yet.
///
/// `last_emitted` is the exact string of the record most recently
/// written to the sink. Identity is the full record string rather than
/// the parsed timestamp, which tolerates the frequent millisecond
/// collisions in server clocks. The page is assumed to be ordered
/// oldest first, with successive pages monotonically newer.
///
/// Returns the records to emit (in page order), the new `last_emitted`,
/// and whether the whole page was new. A fully-new page tells the pager
/// that unseen records may still sit on the next page.
pub fn split_new_entries(logs: Vec<String>, last_emitted: &str) -> (Vec<String>, String, bool) {
    let Some(newest) = logs.last().cloned() else {
        return (Vec::new(), last_emitted.to_string(), false);
    };

    match logs.iter().position(|l| l == last_emitted) {
        // Every record is new.
        None => (logs, newest, true),
        // No new records.
        Some(i) if i == logs.len() - 1 => (Vec::new(), last_emitted.to_string(), false),
        // Everything after the match is new.
        Some(i) => (logs[i + 1..].to_vec(), newest, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_page() {
        let (to_emit, last, all_new) = split_new_entries(Vec::new(), "oldest");
        assert!(to_emit.is_empty());
        assert_eq!(last, "oldest");
        assert!(!all_new);
    }

    #[test]
    fn test_one_old_entry() {
        let (to_emit, last, all_new) = split_new_entries(entries(&["old"]), "old");
        assert!(to_emit.is_empty());
        assert_eq!(last, "old");
        assert!(!all_new);
    }

    #[test]
    fn test_only_old_entries() {
        let (to_emit, last, all_new) =
            split_new_entries(entries(&["old1", "old2", "old3"]), "old3");
        assert!(to_emit.is_empty());
        assert_eq!(last, "old3");
        assert!(!all_new);
    }

    #[test]
    fn test_one_new_entry_no_old() {
        let (to_emit, last, all_new) = split_new_entries(entries(&["new"]), "old");
        assert_eq!(to_emit, entries(&["new"]));
        assert_eq!(last, "new");
        assert!(all_new);
    }

    #[test]
    fn test_all_new_entries() {
        let (to_emit, last, all_new) =
            split_new_entries(entries(&["new1", "new2", "new3"]), "old");
        assert_eq!(to_emit, entries(&["new1", "new2", "new3"]));
        assert_eq!(last, "new3");
        assert!(all_new);
    }

    #[test]
    fn test_one_new_after_one_old() {
        let (to_emit, last, all_new) = split_new_entries(entries(&["old", "new"]), "old");
        assert_eq!(to_emit, entries(&["new"]));
        assert_eq!(last, "new");
        assert!(!all_new);
    }

    #[test]
    fn test_one_new_after_many_old() {
        let (to_emit, last, all_new) =
            split_new_entries(entries(&["old1", "old2", "old3", "new"]), "old3");
        assert_eq!(to_emit, entries(&["new"]));
        assert_eq!(last, "new");
        assert!(!all_new);
    }

    #[test]
    fn test_partial_overlap() {
        let (to_emit, last, all_new) = split_new_entries(
            entries(&["old1", "old2", "old3", "new1", "new2", "new3"]),
            "old3",
        );
        assert_eq!(to_emit, entries(&["new1", "new2", "new3"]));
        assert_eq!(last, "new3");
        assert!(!all_new);
    }

    #[test]
    fn test_match_at_start_emits_rest_and_stops_paging() {
        let (to_emit, last, all_new) =
            split_new_entries(entries(&["old", "new1", "new2"]), "old");
        assert_eq!(to_emit, entries(&["new1", "new2"]));
        assert_eq!(last, "new2");
        assert!(!all_new);
    }
}
