//! Lazy loading from disk combined with change events.

use super::test_utils::{file_names, recording_reconciler};
use dirmirror::events::ChangeEvent;
use dirmirror::tree::{DirectoryLoader, EntryKind, FsDirectoryLoader, LoaderConfig};
use std::fs;
use tempfile::TempDir;

fn fixture() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::create_dir(root.join("reports")).unwrap();
    fs::write(root.join("reports").join("q1.xlsx"), "").unwrap();
    fs::write(root.join("reports").join("q2.csv"), "").unwrap();
    fs::write(root.join("graph.json"), "{}").unwrap();
    fs::write(root.join(".hidden.json"), "{}").unwrap();
    fs::create_dir(root.join("node_modules")).unwrap();
    temp_dir
}

#[test]
fn test_root_listing_skips_hidden_and_ignored() {
    let temp_dir = fixture();
    let loader = FsDirectoryLoader::new(temp_dir.path().to_path_buf());
    let entries = loader.load_directory(".").unwrap();
    assert_eq!(file_names(&entries), vec!["reports", "graph.json"]);
}

#[test]
fn test_loader_config_can_show_hidden() {
    let temp_dir = fixture();
    let config = LoaderConfig {
        ignore_hidden: false,
        ignore_patterns: vec![],
        ..Default::default()
    };
    let loader = FsDirectoryLoader::with_config(temp_dir.path().to_path_buf(), config);
    let entries = loader.load_directory(".").unwrap();
    assert_eq!(
        file_names(&entries),
        vec!["node_modules", "reports", ".hidden.json", "graph.json"]
    );
}

#[test]
fn test_events_apply_only_after_expand() {
    let temp_dir = fixture();
    let loader = FsDirectoryLoader::new(temp_dir.path().to_path_buf());
    let (mut r, notices) = recording_reconciler(loader.load_directory(".").unwrap());

    let early = ChangeEvent::create("reports", "q0.csv", EntryKind::File);
    r.dispatch(&early);
    assert!(!r.cache().is_loaded("reports"));

    assert!(r.expand(&loader, "reports").unwrap());
    r.dispatch(&ChangeEvent::create("reports", "q3.csv", EntryKind::File));
    assert_eq!(
        file_names(r.cache().get_directory("reports").unwrap()),
        vec!["q1.xlsx", "q2.csv", "q3.csv"]
    );
    assert!(notices.is_empty());
}

#[test]
fn test_second_expand_keeps_applied_events() {
    let temp_dir = fixture();
    let loader = FsDirectoryLoader::new(temp_dir.path().to_path_buf());
    let (mut r, _) = recording_reconciler(loader.load_directory(".").unwrap());

    r.expand(&loader, "reports").unwrap();
    r.dispatch(&ChangeEvent::remove("reports", "q1.xlsx", EntryKind::File));
    assert!(!r.expand(&loader, "reports").unwrap());
    assert_eq!(
        file_names(r.cache().get_directory("reports").unwrap()),
        vec!["q2.csv"]
    );

    r.reload(&loader, "reports").unwrap();
    assert_eq!(r.cache().get_directory("reports").unwrap().len(), 2);
}

#[test]
fn test_expanding_a_file_fails() {
    let temp_dir = fixture();
    let loader = FsDirectoryLoader::new(temp_dir.path().to_path_buf());
    let (mut r, _) = recording_reconciler(vec![]);
    assert!(r.expand(&loader, "graph.json").is_err());
    assert!(!r.cache().is_loaded("graph.json"));
}

#[test]
fn test_decomposed_names_match_loaded_entries() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(root.join("cafe\u{301}.json"), "{}").unwrap();
    fs::create_dir(root.join("re\u{301}sume\u{301}")).unwrap();
    fs::write(root.join("re\u{301}sume\u{301}").join("cv.pdf"), "").unwrap();

    let loader = FsDirectoryLoader::new(root.to_path_buf());
    let (mut r, notices) = recording_reconciler(loader.load_directory(".").unwrap());
    assert_eq!(
        r.cache().root().iter().map(|e| e.name.as_str()).collect::<Vec<_>>(),
        vec!["re\u{301}sume\u{301}", "cafe\u{301}"]
    );

    assert!(r.expand(&loader, "re\u{301}sume\u{301}").unwrap());
    assert_eq!(
        file_names(r.cache().get_directory("re\u{301}sume\u{301}").unwrap()),
        vec!["cv.pdf"]
    );

    r.dispatch(&ChangeEvent::remove(".", "cafe\u{301}.json", EntryKind::File));
    assert_eq!(file_names(r.cache().root()), vec!["re\u{301}sume\u{301}"]);
    assert!(notices.is_empty());

    let create = ChangeEvent::create(".", "cafe\u{301}.json", EntryKind::File);
    r.dispatch(&create);
    r.dispatch(&create);
    assert_eq!(r.cache().root().len(), 2);
    assert!(notices.is_empty());
}
