//! Binary search over a sorted directory listing.
//!
//! Both searches use the same ordering as [`crate::tree::order`], so they are
//! only valid on listings that already satisfy it.

use crate::tree::entry::{Entry, EntryKind};
use crate::tree::order::SortKey;
use std::cmp::Ordering;

/// Where a new entry goes in a listing.
///
/// `Front` is kept distinct from `After(_)` so that "insert at index 0" can never
/// be confused with "insert after the first element".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Insert at index 0.
    Front,
    /// Insert right after the element at this index.
    After(usize),
}

impl InsertPosition {
    /// Index to pass to `Vec::insert`.
    pub fn index(self) -> usize {
        match self {
            InsertPosition::Front => 0,
            InsertPosition::After(i) => i + 1,
        }
    }
}

/// Find where `candidate` must be spliced into `list`, in O(log n) steps.
pub fn find_insertion_index(list: &[Entry], candidate: &Entry) -> InsertPosition {
    insertion_search(list, &SortKey::of(candidate)).0
}

/// Upper-bound search returning the position and the number of steps made.
fn insertion_search(list: &[Entry], key: &SortKey) -> (InsertPosition, usize) {
    let mut low = 0;
    let mut high = list.len();
    let mut steps = 0;

    // Invariant: everything before `low` sorts at or before the key, everything
    // from `high` on sorts strictly after it.
    while low < high {
        let mid = low + (high - low) / 2;
        steps += 1;
        if *key < SortKey::of(&list[mid]) {
            high = mid;
        } else {
            low = mid + 1;
        }
    }

    let position = match low {
        0 => InsertPosition::Front,
        n => InsertPosition::After(n - 1),
    };
    (position, steps)
}

/// Find the index of the entry with identity `(name, kind, extension)`.
///
/// Each step checks the midpoint for an exact match before narrowing, so the
/// search stops as soon as the entry is hit. Returns `None` once the window is
/// empty.
pub fn find_exact(list: &[Entry], name: &str, kind: EntryKind, extension: &str) -> Option<usize> {
    let key = SortKey::new(name, kind, extension);
    let mut low = 0;
    let mut high = list.len();

    while low < high {
        let mid = low + (high - low) / 2;
        let candidate = &list[mid];
        if candidate.matches(name, kind, extension) {
            return Some(mid);
        }
        match key.cmp(&SortKey::of(candidate)) {
            Ordering::Less => high = mid,
            Ordering::Greater => low = mid + 1,
            Ordering::Equal => return None,
        }
    }

    None
}

/// Insert `entry` at its ordered position and return the index it landed on.
pub fn insert_sorted(list: &mut Vec<Entry>, entry: Entry) -> usize {
    let index = find_insertion_index(list, &entry).index();
    list.insert(index, entry);
    index
}
