//! Shared fixtures for integration tests.

use dirmirror::reconcile::{Reconciler, RecordingNoticeSink};
use dirmirror::tree::{DirectoryCache, Entry};
use std::sync::Arc;

/// Reconciler over `root` that records its notices.
pub fn recording_reconciler(root: Vec<Entry>) -> (Reconciler, Arc<RecordingNoticeSink>) {
    let notices = Arc::new(RecordingNoticeSink::new());
    let reconciler =
        Reconciler::with_notice_sink(DirectoryCache::with_root(root), Box::new(Arc::clone(&notices)));
    (reconciler, notices)
}

/// `name + extension` of each entry, in listing order.
pub fn file_names(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(Entry::file_name).collect()
}

pub fn root_names(reconciler: &Reconciler) -> Vec<String> {
    file_names(reconciler.cache().root())
}
