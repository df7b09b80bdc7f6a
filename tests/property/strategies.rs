//! Generators shared by the property tests.

use dirmirror::tree::order::sort_entries;
use dirmirror::tree::{Entry, EntryKind, FileCategory};
use proptest::prelude::*;
use std::collections::HashSet;

/// Names mix case and a few non-ASCII letters so folding and normalization are
/// exercised. Some end in a decomposed `e\u{301}`, which sorts with the
/// precomposed `é` but is a different name.
pub fn name() -> impl Strategy<Value = String> {
    let base = "[a-zA-Zé_][a-zA-Z0-9é_ -]{0,7}";
    prop_oneof![
        3 => base,
        1 => base.prop_map(|s| format!("{}e\u{301}", s)),
    ]
}

pub fn extension() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(".json".to_string()),
        Just(".png".to_string()),
        Just(".csv".to_string()),
        Just(".mp4".to_string()),
        Just(".txt".to_string()),
    ]
}

pub fn entry() -> impl Strategy<Value = Entry> {
    (name(), extension(), any::<bool>()).prop_map(|(name, extension, is_dir)| {
        if is_dir {
            Entry::dir(name)
        } else {
            let category = FileCategory::from_extension(&extension);
            Entry::file(name, extension, category)
        }
    })
}

/// Sorted listing with distinct identities.
pub fn listing(max: usize) -> impl Strategy<Value = Vec<Entry>> {
    prop::collection::vec(entry(), 0..max).prop_map(|entries| {
        let mut seen = HashSet::new();
        let mut entries: Vec<Entry> = entries
            .into_iter()
            .filter(|e| seen.insert(identity(e)))
            .collect();
        sort_entries(&mut entries);
        entries
    })
}

pub fn identity(entry: &Entry) -> (String, EntryKind, String) {
    (entry.name.clone(), entry.kind, entry.extension.clone())
}
