//! Reconciliation
//!
//! Applies change events to the directory cache. Each event is handled to
//! completion on the caller's thread before the next one; handlers only touch
//! listings that are already loaded.

pub mod focus;
pub mod notice;
pub mod pump;

pub use focus::FocusQueue;
pub use notice::{FnNoticeSink, NoticeSink, RecordingNoticeSink, TracingNoticeSink};
pub use pump::EventPump;

use crate::error::{LoadError, ReconcileError};
use crate::events::{ChangeEvent, Op};
use crate::tree::cache::DirectoryCache;
use crate::tree::entry::{Entry, EntryKind, FileCategory};
use crate::tree::path::{self, EntryLocation};
use crate::tree::search::{find_exact, insert_sorted};
use crate::tree::walker::DirectoryLoader;
use tracing::{debug, trace, warn};

/// What a handler did to the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Entry spliced into `dir` at `index`
    Inserted { dir: String, index: usize },
    /// Entry with the same identity was already listed at `index`
    AlreadyPresent { dir: String, index: usize },
    /// Entry spliced out of `dir` from `index`
    Removed { dir: String, index: usize, entry: Entry },
    /// Entry removed from `from` and, when the destination is loaded,
    /// inserted at `to = (dir, index)`
    Relocated {
        from: String,
        to: Option<(String, usize)>,
    },
}

/// Owns the directory cache and keeps it in step with the event stream.
pub struct Reconciler {
    cache: DirectoryCache,
    notices: Box<dyn NoticeSink>,
    focus: FocusQueue,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new(DirectoryCache::new())
    }
}

impl Reconciler {
    /// Reconciler reporting notices to the log
    pub fn new(cache: DirectoryCache) -> Self {
        Self::with_notice_sink(cache, Box::new(TracingNoticeSink))
    }

    pub fn with_notice_sink(cache: DirectoryCache, notices: Box<dyn NoticeSink>) -> Self {
        Self {
            cache,
            notices,
            focus: FocusQueue::new(),
        }
    }

    pub fn cache(&self) -> &DirectoryCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DirectoryCache {
        &mut self.cache
    }

    pub fn focus_queue(&mut self) -> &mut FocusQueue {
        &mut self.focus
    }

    pub fn into_cache(self) -> DirectoryCache {
        self.cache
    }

    /// Load a directory the first time it is expanded.
    ///
    /// Returns `false` without touching the cache when the directory is already
    /// loaded, so events applied since the first load are kept.
    pub fn expand(&mut self, loader: &dyn DirectoryLoader, key: &str) -> Result<bool, LoadError> {
        if self.cache.is_loaded(key) {
            trace!(dir = %key, "Directory already loaded");
            return Ok(false);
        }
        let entries = loader.load_directory(key)?;
        self.cache.add_dir(key, entries);
        Ok(true)
    }

    /// Replace a loaded listing with a fresh snapshot.
    pub fn reload(&mut self, loader: &dyn DirectoryLoader, key: &str) -> Result<(), LoadError> {
        let entries = loader.load_directory(key)?;
        self.cache.add_dir(key, entries);
        Ok(())
    }

    /// Apply one event. Never fails: unloaded directories are skipped, other
    /// failures go to the notice sink, unknown operations are ignored.
    pub fn dispatch(&mut self, event: &ChangeEvent) {
        let result = match event.op {
            Op::Create => self.on_create(event),
            Op::Remove => self.on_remove(event),
            Op::Rename => self.on_rename(event),
            Op::Move => self.on_move(event),
            Op::Unknown => {
                trace!(event = %event, "Ignoring unknown operation");
                return;
            }
        };

        match result {
            Ok(outcome) => debug!(event = %event, outcome = ?outcome, "Applied change event"),
            Err(ReconcileError::DirectoryNotLoaded(dir)) => {
                debug!(event = %event, dir = %dir, "Skipped event for unloaded directory")
            }
            Err(e) => {
                warn!(event = %event, error = %e, "Could not apply change event");
                self.notices.notice(&e.to_string());
            }
        }
    }

    /// CREATE: insert `event.file` into the directory `event.path`.
    pub fn on_create(&mut self, event: &ChangeEvent) -> Result<Outcome, ReconcileError> {
        let dir = path::dir_key(&event.path);
        if !self.cache.is_loaded(&dir) {
            return Err(ReconcileError::DirectoryNotLoaded(dir));
        }
        let (name, extension) = path::split_name(&event.file, event.data_type)?;
        self.insert(&dir, build_entry(name, extension, event))
    }

    /// REMOVE by current path: `event.file` inside `event.path`.
    pub fn on_remove(&mut self, event: &ChangeEvent) -> Result<Outcome, ReconcileError> {
        let dir = path::dir_key(&event.path);
        if !self.cache.is_loaded(&dir) {
            return Err(ReconcileError::DirectoryNotLoaded(dir));
        }
        let location = path::resolve_current(&dir, &event.file, event.data_type)?;
        let (index, entry) = self.remove(&location, event.data_type)?;
        Ok(self.forget(location.dir, index, entry))
    }

    /// REMOVE by former path: the entry at `event.old_path`.
    pub fn on_remove_by_old_path(&mut self, event: &ChangeEvent) -> Result<Outcome, ReconcileError> {
        let (dir, index, entry) = self.remove_former(event)?;
        Ok(self.forget(dir, index, entry))
    }

    /// RENAME: remove the entry at `event.old_path` and insert it under its new
    /// name in the same listing.
    pub fn on_rename(&mut self, event: &ChangeEvent) -> Result<Outcome, ReconcileError> {
        let (name, extension) = path::split_name(&event.file, event.data_type)?;
        let (from, _, old_entry) = self.remove_former(event)?;

        let renamed = build_entry(name, extension, event);
        let old_key = path::join_key(&from, &old_entry.file_name());
        let new_key = path::join_key(&from, &renamed.file_name());
        let inserted = self.insert(&from, renamed)?;
        if old_entry.is_dir() {
            let target = matches!(inserted, Outcome::Inserted { .. }).then_some(new_key.as_str());
            self.cache.relocate_subtree(&old_key, target);
        }
        Ok(relocated(from, inserted))
    }

    /// MOVE: remove the entry at `event.old_path`, then insert `event.file` into
    /// `event.path` if that directory is loaded.
    pub fn on_move(&mut self, event: &ChangeEvent) -> Result<Outcome, ReconcileError> {
        let (name, extension) = path::split_name(&event.file, event.data_type)?;
        let (from, _, old_entry) = self.remove_former(event)?;

        let destination = path::dir_key(&event.path);
        let moved = build_entry(name, extension, event);
        let old_key = path::join_key(&from, &old_entry.file_name());
        let new_key = path::join_key(&destination, &moved.file_name());

        let inserted = if self.cache.is_loaded(&destination) {
            Some(self.insert(&destination, moved)?)
        } else {
            debug!(dir = %destination, "Move destination not loaded");
            None
        };

        // A destination that already existed keeps its own listing.
        if old_entry.is_dir() {
            let target = matches!(inserted, Some(Outcome::Inserted { .. })).then_some(new_key.as_str());
            self.cache.relocate_subtree(&old_key, target);
        }

        Ok(match inserted {
            Some(outcome) => relocated(from, outcome),
            None => Outcome::Relocated { from, to: None },
        })
    }

    fn insert(&mut self, dir: &str, entry: Entry) -> Result<Outcome, ReconcileError> {
        let list = self
            .cache
            .get_directory_mut(dir)
            .ok_or_else(|| ReconcileError::DirectoryNotLoaded(dir.to_string()))?;

        if let Some(index) = find_exact(list, &entry.name, entry.kind, &entry.extension) {
            return Ok(Outcome::AlreadyPresent {
                dir: dir.to_string(),
                index,
            });
        }

        let focus_key = entry.is_dir().then(|| path::join_key(dir, &entry.name));
        let index = insert_sorted(list, entry);
        if let Some(key) = focus_key {
            self.focus.request(key);
        }
        Ok(Outcome::Inserted {
            dir: dir.to_string(),
            index,
        })
    }

    fn remove_former(&mut self, event: &ChangeEvent) -> Result<(String, usize, Entry), ReconcileError> {
        let location = path::resolve_former(&event.old_path, event.data_type)?;
        if !self.cache.is_loaded(&location.dir) {
            return Err(ReconcileError::DirectoryNotLoaded(location.dir));
        }
        let (index, entry) = self.remove(&location, event.data_type)?;
        Ok((location.dir, index, entry))
    }

    fn remove(&mut self, location: &EntryLocation, kind: EntryKind) -> Result<(usize, Entry), ReconcileError> {
        let list = self
            .cache
            .get_directory_mut(&location.dir)
            .ok_or_else(|| ReconcileError::DirectoryNotLoaded(location.dir.clone()))?;

        let index = find_exact(list, &location.name, kind, &location.extension).ok_or_else(|| {
            ReconcileError::ElementNotFound {
                dir: location.dir.clone(),
                name: format!("{}{}", location.name, location.extension),
            }
        })?;
        Ok((index, list.remove(index)))
    }

    /// A removed directory takes its loaded listings with it.
    fn forget(&mut self, dir: String, index: usize, entry: Entry) -> Outcome {
        if entry.is_dir() {
            self.cache
                .relocate_subtree(&path::join_key(&dir, &entry.name), None);
        }
        Outcome::Removed { dir, index, entry }
    }
}

/// Entry for the new side of an event, stamped now.
fn build_entry(name: String, extension: String, event: &ChangeEvent) -> Entry {
    match event.data_type {
        EntryKind::Dir => Entry::dir(name),
        EntryKind::File => {
            let category = event
                .file_type
                .unwrap_or_else(|| FileCategory::from_extension(&extension));
            Entry::file(name, extension, category)
        }
    }
}

fn relocated(from: String, inserted: Outcome) -> Outcome {
    let to = match inserted {
        Outcome::Inserted { dir, index } | Outcome::AlreadyPresent { dir, index } => {
            Some((dir, index))
        }
        _ => None,
    };
    Outcome::Relocated { from, to }
}
