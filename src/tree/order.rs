//! Ordering function for entries inside one directory listing.
//!
//! Directories sort before files. Within a kind, display names (`name` for
//! directories, `name + extension` for files) are compared after NFC
//! normalization, case-folded first and then exactly, so the order is total.

use crate::tree::entry::{Entry, EntryKind};
use std::cmp::Ordering;
use unicode_normalization::UnicodeNormalization;

/// Comparable key derived from an entry identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SortKey {
    kind_rank: u8,
    folded: String,
    normalized: String,
    raw: String,
}

impl SortKey {
    pub fn new(name: &str, kind: EntryKind, extension: &str) -> Self {
        let raw = match kind {
            EntryKind::Dir => name.to_string(),
            EntryKind::File => format!("{}{}", name, extension),
        };
        let normalized: String = raw.nfc().collect();
        let folded = normalized.to_lowercase();
        Self {
            kind_rank: kind_rank(kind),
            folded,
            normalized,
            raw,
        }
    }

    pub fn of(entry: &Entry) -> Self {
        Self::new(&entry.name, entry.kind, &entry.extension)
    }
}

fn kind_rank(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::Dir => 0,
        EntryKind::File => 1,
    }
}

/// Total order over entries of one listing.
pub fn compare(a: &Entry, b: &Entry) -> Ordering {
    if a.kind != b.kind {
        return kind_rank(a.kind).cmp(&kind_rank(b.kind));
    }
    SortKey::of(a).cmp(&SortKey::of(b))
}

/// True iff `a` must sort strictly before `b`.
pub fn less(a: &Entry, b: &Entry) -> bool {
    compare(a, b) == Ordering::Less
}

/// Sort a listing in place so it satisfies the directory order.
pub fn sort_entries(entries: &mut [Entry]) {
    entries.sort_by_cached_key(SortKey::of);
}

/// Check that every adjacent pair of a listing is strictly ordered.
pub fn is_sorted(entries: &[Entry]) -> bool {
    entries.windows(2).all(|pair| less(&pair[0], &pair[1]))
}
