//! Watch Mode
//!
//! Keeps a [`Reconciler`] in sync with a live directory. [`EventTranslator`]
//! turns raw `notify` events into root-relative [`ChangeEvent`]s and
//! [`WatchSession`] runs the watcher loop, feeding the reconciler through an
//! [`EventPump`].

use crate::error::ApiError;
use crate::events::ChangeEvent;
use crate::reconcile::{EventPump, Reconciler};
use crate::tree::entry::EntryKind;
use crate::tree::path::{canonicalize_path, join_key, split_name, ROOT_KEY};
use crate::tree::walker::{FsDirectoryLoader, LoaderConfig};
use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace, warn};
use walkdir::WalkDir;

/// Watch mode configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Session loop interval in milliseconds
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    /// How long the source half of a rename waits for its destination before
    /// it is reported as a removal
    #[serde(default = "default_rename_pair_ms")]
    pub rename_pair_ms: u64,
}

fn default_tick_ms() -> u64 {
    100
}

fn default_rename_pair_ms() -> u64 {
    50
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            rename_pair_ms: default_rename_pair_ms(),
        }
    }
}

/// Source half of a rename still waiting for its destination.
#[derive(Debug, Clone)]
struct PendingRename {
    path: PathBuf,
    tracker: Option<usize>,
    since: Instant,
}

/// Converts `notify` events below a root into [`ChangeEvent`]s.
///
/// Deleted paths cannot be inspected, so the translator remembers the kind of
/// every path it has seen. Removals and renames read the kind from there.
pub struct EventTranslator {
    root: PathBuf,
    loader: LoaderConfig,
    pair_window: Duration,
    kinds: HashMap<PathBuf, EntryKind>,
    pending: Vec<PendingRename>,
    last_pair: Option<(PathBuf, PathBuf)>,
}

impl EventTranslator {
    /// `root` must be the canonical path being watched.
    pub fn new(root: PathBuf, loader: LoaderConfig) -> Self {
        Self {
            root,
            loader,
            pair_window: Duration::from_millis(default_rename_pair_ms()),
            kinds: HashMap::new(),
            pending: Vec::new(),
            last_pair: None,
        }
    }

    pub fn with_pair_window(mut self, window: Duration) -> Self {
        self.pair_window = window;
        self
    }

    /// Index every path currently below the root. Returns how many were indexed.
    pub fn seed(&mut self) -> usize {
        let root = self.root.clone();
        let indexed = self.index_tree(&root);
        debug!(root = %root.display(), indexed, "Seeded kind index");
        indexed
    }

    /// Kind last recorded for an absolute path.
    pub fn kind_of(&self, path: &Path) -> Option<EntryKind> {
        self.kinds.get(path).copied()
    }

    /// Rename sources not yet paired with a destination.
    pub fn pending_renames(&self) -> usize {
        self.pending.len()
    }

    /// Translate one raw event. Modifications of content or metadata carry no
    /// structural change and produce nothing.
    pub fn translate(&mut self, event: Event, now: Instant) -> Vec<ChangeEvent> {
        let tracker = event.attrs.tracker();
        match event.kind {
            EventKind::Create(kind) => {
                let hint = match kind {
                    CreateKind::File => Some(EntryKind::File),
                    CreateKind::Folder => Some(EntryKind::Dir),
                    _ => None,
                };
                event
                    .paths
                    .into_iter()
                    .filter_map(|path| self.created(path, hint))
                    .collect()
            }
            EventKind::Remove(kind) => {
                let hint = match kind {
                    RemoveKind::File => Some(EntryKind::File),
                    RemoveKind::Folder => Some(EntryKind::Dir),
                    _ => None,
                };
                event
                    .paths
                    .into_iter()
                    .filter_map(|path| self.removed(path, hint))
                    .collect()
            }
            EventKind::Modify(ModifyKind::Name(mode)) => {
                self.renamed(mode, event.paths, tracker, now)
            }
            _ => Vec::new(),
        }
    }

    /// Report rename sources whose destination never arrived as removals.
    pub fn flush_expired(&mut self, now: Instant) -> Vec<ChangeEvent> {
        let window = self.pair_window;
        let (expired, waiting): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|p| now.saturating_duration_since(p.since) >= window);
        self.pending = waiting;

        expired
            .into_iter()
            .filter_map(|p| self.removed(p.path, None))
            .collect()
    }

    fn renamed(
        &mut self,
        mode: RenameMode,
        paths: Vec<PathBuf>,
        tracker: Option<usize>,
        now: Instant,
    ) -> Vec<ChangeEvent> {
        match mode {
            RenameMode::From => {
                for path in paths {
                    self.pending.push(PendingRename {
                        path,
                        tracker,
                        since: now,
                    });
                }
                Vec::new()
            }
            RenameMode::To => {
                let Some(to) = paths.into_iter().next() else {
                    return Vec::new();
                };
                match self.take_pending(tracker) {
                    Some(from) => {
                        self.last_pair = Some((from.clone(), to.clone()));
                        self.relocate(from, to)
                    }
                    // Moved in from outside the root
                    None => self.created(to, None).into_iter().collect(),
                }
            }
            RenameMode::Both if paths.len() >= 2 => {
                let pair = (paths[0].clone(), paths[1].clone());
                // Backends that report both halves also report the pair once more
                if self.last_pair.as_ref() == Some(&pair) {
                    self.last_pair = None;
                    return Vec::new();
                }
                let (from, to) = pair;
                self.pending.retain(|p| p.path != from);
                self.relocate(from, to)
            }
            _ => paths
                .into_iter()
                .filter_map(|path| {
                    if path.exists() {
                        self.created(path, None)
                    } else {
                        self.removed(path, None)
                    }
                })
                .collect(),
        }
    }

    fn take_pending(&mut self, tracker: Option<usize>) -> Option<PathBuf> {
        let index = self.pending.iter().position(|p| p.tracker == tracker)?;
        Some(self.pending.remove(index).path)
    }

    fn created(&mut self, path: PathBuf, hint: Option<EntryKind>) -> Option<ChangeEvent> {
        let (dir, file) = self.relative(&path)?;
        let kind = hint
            .or_else(|| kind_on_disk(&path))
            .unwrap_or(EntryKind::File);
        self.remember(&path, kind);

        addressable(&file, kind).then(|| ChangeEvent::create(dir, file, kind))
    }

    fn removed(&mut self, path: PathBuf, hint: Option<EntryKind>) -> Option<ChangeEvent> {
        let kind = self.forget(&path).or(hint).unwrap_or(EntryKind::File);
        let (dir, file) = self.relative(&path)?;

        addressable(&file, kind).then(|| ChangeEvent::remove(dir, file, kind))
    }

    fn relocate(&mut self, from: PathBuf, to: PathBuf) -> Vec<ChangeEvent> {
        let kind = self
            .forget(&from)
            .or_else(|| kind_on_disk(&to))
            .unwrap_or(EntryKind::File);

        let old = self
            .relative(&from)
            .filter(|(_, file)| addressable(file, kind));
        let new = self.relative(&to).filter(|(_, file)| addressable(file, kind));
        if new.is_some() {
            self.remember(&to, kind);
        }

        let event = match (old, new) {
            (Some((old_dir, old_file)), Some((dir, file))) => {
                let old_path = join_key(&old_dir, &old_file);
                if old_dir == dir {
                    ChangeEvent::rename(old_path, dir, file, kind)
                } else {
                    ChangeEvent::moved(old_path, dir, file, kind)
                }
            }
            (Some((dir, file)), None) => ChangeEvent::remove(dir, file, kind),
            (None, Some((dir, file))) => ChangeEvent::create(dir, file, kind),
            (None, None) => return Vec::new(),
        };
        vec![event]
    }

    /// Root-relative `(directory key, base name)` of an absolute path, or
    /// `None` for the root itself, paths outside it and ignored paths.
    fn relative(&self, path: &Path) -> Option<(String, String)> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let mut parts = Vec::new();
        for component in rel.components() {
            match component {
                Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
                _ => return None,
            }
        }
        if parts.iter().any(|part| self.loader.is_ignored(part)) {
            trace!(path = %path.display(), "Ignoring event for skipped path");
            return None;
        }

        let file = parts.pop()?;
        let dir = if parts.is_empty() {
            ROOT_KEY.to_string()
        } else {
            parts.join("/")
        };
        Some((dir, file))
    }

    fn remember(&mut self, path: &Path, kind: EntryKind) {
        self.kinds.insert(path.to_path_buf(), kind);
        if kind == EntryKind::Dir {
            self.index_tree(path);
        }
    }

    fn forget(&mut self, path: &Path) -> Option<EntryKind> {
        let kind = self.kinds.remove(path);
        if kind == Some(EntryKind::Dir) {
            self.kinds.retain(|known, _| !known.starts_with(path));
        }
        kind
    }

    fn index_tree(&mut self, path: &Path) -> usize {
        let loader = &self.loader;
        let walker = WalkDir::new(path)
            .follow_links(loader.follow_symlinks)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !loader.is_ignored(&e.file_name().to_string_lossy()));

        let mut indexed = 0;
        for entry in walker.filter_map(Result::ok) {
            let kind = if entry.file_type().is_dir() {
                EntryKind::Dir
            } else {
                EntryKind::File
            };
            self.kinds.insert(entry.into_path(), kind);
            indexed += 1;
        }
        indexed
    }
}

fn kind_on_disk(path: &Path) -> Option<EntryKind> {
    std::fs::metadata(path).ok().map(|metadata| {
        if metadata.is_dir() {
            EntryKind::Dir
        } else {
            EntryKind::File
        }
    })
}

/// Files without an extension are never listed, so events about them are dropped.
fn addressable(file: &str, kind: EntryKind) -> bool {
    let ok = split_name(file, kind).is_ok();
    if !ok {
        trace!(file = %file, "Skipping event for unaddressable name");
    }
    ok
}

/// Live watch over one root directory.
pub struct WatchSession {
    root: PathBuf,
    loader: LoaderConfig,
    config: WatchConfig,
    running: Arc<RwLock<bool>>,
}

impl WatchSession {
    pub fn new(root: &Path, loader: LoaderConfig, config: WatchConfig) -> Result<Self, ApiError> {
        Ok(Self {
            root: canonicalize_path(root)?,
            loader,
            config,
            running: Arc::new(RwLock::new(true)),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Shared running flag, set from construction. Clearing it from any thread
    /// ends [`WatchSession::run`] within one tick.
    pub fn running_flag(&self) -> Arc<RwLock<bool>> {
        Arc::clone(&self.running)
    }

    pub fn stop(&self) {
        *self.running.write() = false;
    }

    /// Reload every loaded listing from disk. Listings that can no longer be
    /// read are dropped along with their subtree. Returns how many were
    /// reloaded.
    pub fn resync(&self, reconciler: &mut Reconciler) -> usize {
        let loader = FsDirectoryLoader::with_config(self.root.clone(), self.loader.clone());
        let keys: Vec<String> = reconciler
            .cache()
            .loaded_dirs()
            .into_iter()
            .map(str::to_string)
            .collect();

        let mut reloaded = 0;
        for key in keys {
            if !reconciler.cache().is_loaded(&key) {
                continue;
            }
            match reconciler.reload(&loader, &key) {
                Ok(()) => reloaded += 1,
                Err(e) => {
                    warn!(dir = %key, "Dropping listing that failed to reload: {}", e);
                    reconciler.cache_mut().relocate_subtree(&key, None);
                }
            }
        }
        debug!(reloaded, "Resynced loaded listings");
        reloaded
    }

    /// Watch the root until stopped, applying translated events to `reconciler`.
    ///
    /// Loaded listings are reloaded once the watcher is registered, so changes
    /// made before that are not lost. `on_applied` runs after that resync with
    /// a count of zero, then after each batch of applied events with the number
    /// applied; it is where a caller re-renders and drains focus requests.
    pub fn run<F>(&self, reconciler: &mut Reconciler, mut on_applied: F) -> Result<(), ApiError>
    where
        F: FnMut(&mut Reconciler, usize),
    {
        let (raw_tx, raw_rx) = mpsc::channel();
        let mut watcher = notify::recommended_watcher(move |res| {
            if let Err(e) = raw_tx.send(res) {
                error!("Error sending watch event: {}", e);
            }
        })?;
        watcher.watch(&self.root, RecursiveMode::Recursive)?;
        info!(root = %self.root.display(), "Watching directory");

        let mut translator = EventTranslator::new(self.root.clone(), self.loader.clone())
            .with_pair_window(Duration::from_millis(self.config.rename_pair_ms));
        translator.seed();
        self.resync(reconciler);
        on_applied(reconciler, 0);

        let (tx, pump) = EventPump::channel();
        let tick = Duration::from_millis(self.config.tick_ms);

        while *self.running.read() {
            let mut changes = match raw_rx.recv_timeout(tick) {
                Ok(Ok(event)) => translator.translate(event, Instant::now()),
                Ok(Err(e)) => {
                    warn!("Watch error: {}", e);
                    Vec::new()
                }
                Err(mpsc::RecvTimeoutError::Timeout) => Vec::new(),
                Err(mpsc::RecvTimeoutError::Disconnected) => {
                    error!("Watcher channel disconnected");
                    break;
                }
            };
            changes.extend(translator.flush_expired(Instant::now()));

            for change in changes {
                trace!(event = %change, "Queued change event");
                tx.send(change)
                    .map_err(|e| ApiError::WatchError(e.to_string()))?;
            }

            let applied = pump.drain(reconciler);
            if applied > 0 {
                debug!(applied, "Applied change events");
                on_applied(reconciler, applied);
            }
        }

        info!(root = %self.root.display(), "Watch stopped");
        Ok(())
    }
}
