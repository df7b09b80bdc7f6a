//! Replaying recorded JSON-lines event logs.

use super::test_utils::{recording_reconciler, root_names};
use dirmirror::error::ApiError;
use dirmirror::events::{read_event_log, Op};
use dirmirror::tree::Entry;

const LOG: &str = r#"
# recorded from the desktop watcher
{"op":0,"path":".","oldPath":"","file":"graph.json","dataType":"FILE","fileType":"GRAPH"}
{"op":0,"path":".","oldPath":"","file":"assets","dataType":"DIR","fileType":"UNSUPPORTED"}
{"op":3,"path":".","oldPath":"graph.json","file":"chart.json","dataType":"FILE","fileType":"GRAPH"}
{"op":1,"path":".","oldPath":"chart.json","file":"chart.json","dataType":"FILE"}
{"op":"MOVE","path":"assets","oldPath":"chart.json","file":"chart.json","dataType":"FILE"}
"#;

#[test]
fn test_read_event_log_skips_comments_and_blanks() {
    let events = read_event_log(LOG.as_bytes()).unwrap();
    assert_eq!(events.len(), 5);
    assert_eq!(events[0].op, Op::Create);
    assert_eq!(events[2].op, Op::Rename);
    assert_eq!(events[3].op, Op::Unknown);
    assert_eq!(events[4].op, Op::Move);
}

#[test]
fn test_replay_ignores_unknown_ops_and_unloaded_destinations() {
    let (mut r, notices) = recording_reconciler(Vec::<Entry>::new());
    for event in read_event_log(LOG.as_bytes()).unwrap() {
        r.dispatch(&event);
    }
    // The MOVE target "assets" was never expanded: the file leaves the root only.
    assert_eq!(root_names(&r), vec!["assets"]);
    assert!(notices.is_empty());
}

#[test]
fn test_bad_line_reports_line_number() {
    let log = "{\"op\":0,\"path\":\".\",\"file\":\"a.json\",\"dataType\":\"FILE\"}\nnot json\n";
    match read_event_log(log.as_bytes()) {
        Err(ApiError::InvalidEvent { line, .. }) => assert_eq!(line, 2),
        other => panic!("expected InvalidEvent, got {:?}", other),
    }
}
