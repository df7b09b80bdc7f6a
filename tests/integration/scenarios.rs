//! End-to-end reconcile scenarios over an in-memory cache.

use super::test_utils::{file_names, recording_reconciler, root_names};
use dirmirror::events::ChangeEvent;
use dirmirror::reconcile::Outcome;
use dirmirror::tree::{Entry, EntryKind, FileCategory};

fn graph() -> Entry {
    Entry::file("graph", ".json", FileCategory::Graph)
}

#[test]
fn test_create_into_empty_root() {
    let (mut r, notices) = recording_reconciler(vec![]);
    r.dispatch(&ChangeEvent::create(".", "graph.json", EntryKind::File));

    let root = r.cache().root();
    assert_eq!(root.len(), 1);
    assert_eq!(root[0].name, "graph");
    assert_eq!(root[0].extension, ".json");
    assert_eq!(root[0].category, FileCategory::Graph);
    assert!(notices.is_empty());
}

#[test]
fn test_create_sorts_alphabetically() {
    let (mut r, _) = recording_reconciler(vec![graph()]);
    r.dispatch(&ChangeEvent::create(".", "abc.json", EntryKind::File));
    assert_eq!(root_names(&r), vec!["abc.json", "graph.json"]);
}

#[test]
fn test_create_before_and_after_existing_entries() {
    let (mut r, _) = recording_reconciler(vec![
        graph(),
        Entry::file("abc", ".json", FileCategory::Graph),
    ]);
    r.dispatch(&ChangeEvent::create(".", "aac.json", EntryKind::File));
    r.dispatch(&ChangeEvent::create(".", "zoink.json", EntryKind::File));
    assert_eq!(
        root_names(&r),
        vec!["aac.json", "abc.json", "graph.json", "zoink.json"]
    );
}

#[test]
fn test_directory_precedes_files_regardless_of_name() {
    let (mut r, _) = recording_reconciler(vec![graph()]);
    r.dispatch(&ChangeEvent::create(".", "newDir", EntryKind::Dir));

    let root = r.cache().root();
    assert_eq!(root[0].name, "newDir");
    assert_eq!(root[0].kind, EntryKind::Dir);
    assert_eq!(root[1].file_name(), "graph.json");
}

#[test]
fn test_directories_sorted_among_themselves() {
    let (mut r, _) = recording_reconciler(vec![Entry::dir("newDir")]);
    r.dispatch(&ChangeEvent::create(".", "firstDir", EntryKind::Dir));
    assert_eq!(root_names(&r), vec!["firstDir", "newDir"]);
    assert_eq!(r.focus_queue().after_render(), vec!["firstDir".to_string()]);
}

#[test]
fn test_move_into_loaded_subdirectory() {
    let (mut r, notices) = recording_reconciler(vec![Entry::dir("subDir"), graph()]);
    r.cache_mut().add_dir("subDir", vec![]);

    r.dispatch(&ChangeEvent::moved("graph.json", "subDir", "graph.json", EntryKind::File));

    assert_eq!(root_names(&r), vec!["subDir"]);
    assert_eq!(
        file_names(r.cache().get_directory("subDir").unwrap()),
        vec!["graph.json"]
    );
    assert!(notices.is_empty());
}

#[test]
fn test_move_out_of_nested_directory_to_root() {
    let (mut r, _) = recording_reconciler(vec![Entry::dir("a")]);
    r.cache_mut().add_dir("a", vec![Entry::dir("b")]);
    r.cache_mut()
        .add_dir("a/b", vec![Entry::file("deep", ".csv", FileCategory::Sheet)]);

    let outcome = r
        .on_move(&ChangeEvent::moved("a/b/deep.csv", ".", "deep.csv", EntryKind::File))
        .unwrap();

    assert_eq!(
        outcome,
        Outcome::Relocated {
            from: "a/b".to_string(),
            to: Some((".".to_string(), 1)),
        }
    );
    assert_eq!(root_names(&r), vec!["a", "deep.csv"]);
    assert!(r.cache().get_directory("a/b").unwrap().is_empty());
}

#[test]
fn test_rename_then_remove_leaves_root_empty() {
    let (mut r, notices) = recording_reconciler(vec![graph()]);
    r.dispatch(&ChangeEvent::rename("graph.json", ".", "chart.json", EntryKind::File));
    assert_eq!(root_names(&r), vec!["chart.json"]);

    r.dispatch(&ChangeEvent::remove(".", "chart.json", EntryKind::File));
    assert!(r.cache().root().is_empty());
    assert!(notices.is_empty());
}

#[test]
fn test_remove_by_old_path_from_nested_directory() {
    let (mut r, _) = recording_reconciler(vec![Entry::dir("docs")]);
    r.cache_mut()
        .add_dir("docs", vec![Entry::file("clip", ".mp4", FileCategory::Video)]);

    let event = ChangeEvent::remove("docs", "clip.mp4", EntryKind::File);
    let outcome = r.on_remove_by_old_path(&event).unwrap();
    assert!(matches!(outcome, Outcome::Removed { ref dir, index: 0, .. } if dir == "docs"));
}

#[test]
fn test_removing_a_directory_drops_its_loaded_listings() {
    let (mut r, _) = recording_reconciler(vec![Entry::dir("docs")]);
    r.cache_mut().add_dir("docs", vec![Entry::dir("img")]);
    r.cache_mut().add_dir("docs/img", vec![]);

    r.dispatch(&ChangeEvent::remove(".", "docs", EntryKind::Dir));

    assert!(r.cache().root().is_empty());
    assert!(!r.cache().is_loaded("docs"));
    assert!(!r.cache().is_loaded("docs/img"));
}

#[test]
fn test_failed_lookup_is_reported_once_and_nothing_inserted() {
    let (mut r, notices) = recording_reconciler(vec![graph()]);
    r.dispatch(&ChangeEvent::rename("missing.json", ".", "found.json", EntryKind::File));

    assert_eq!(root_names(&r), vec!["graph.json"]);
    assert_eq!(notices.len(), 1);
    assert!(notices.messages()[0].contains("missing.json"));
}

#[test]
fn test_events_for_unloaded_directories_are_silent() {
    let (mut r, notices) = recording_reconciler(vec![Entry::dir("docs")]);
    r.dispatch(&ChangeEvent::create("docs", "a.json", EntryKind::File));
    r.dispatch(&ChangeEvent::remove("docs", "a.json", EntryKind::File));

    assert!(!r.cache().is_loaded("docs"));
    assert!(notices.is_empty());
}
