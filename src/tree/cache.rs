//! Directory cache: directory key to ordered, lazily-loaded listing.

use crate::tree::entry::Entry;
use crate::tree::order::sort_entries;
use crate::tree::path::{dir_key, ROOT_KEY};
use std::collections::HashMap;
use tracing::debug;

/// Listings of every directory loaded so far.
///
/// The root listing exists from construction. Other directories appear only
/// once [`DirectoryCache::add_dir`] installs them. A directory that is absent
/// has either not been expanded yet or was removed from the tree.
#[derive(Debug, Clone)]
pub struct DirectoryCache {
    dirs: HashMap<String, Vec<Entry>>,
}

impl Default for DirectoryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryCache {
    /// Cache with an empty root listing
    pub fn new() -> Self {
        Self::with_root(Vec::new())
    }

    /// Cache with the given root listing
    pub fn with_root(entries: Vec<Entry>) -> Self {
        let mut cache = Self {
            dirs: HashMap::new(),
        };
        cache.add_dir(ROOT_KEY, entries);
        cache
    }

    /// Install or replace a directory listing.
    ///
    /// Entries are sorted on the way in. Replacing an existing listing drops any
    /// change applied to it since it was loaded.
    pub fn add_dir(&mut self, path: &str, mut entries: Vec<Entry>) {
        let key = dir_key(path);
        sort_entries(&mut entries);
        debug!(dir = %key, entries = entries.len(), "Installed directory listing");
        self.dirs.insert(key, entries);
    }

    pub fn get_directory(&self, path: &str) -> Option<&[Entry]> {
        self.dirs.get(&dir_key(path)).map(Vec::as_slice)
    }

    pub(crate) fn get_directory_mut(&mut self, path: &str) -> Option<&mut Vec<Entry>> {
        self.dirs.get_mut(&dir_key(path))
    }

    /// Move the listing at `from` and every loaded descendant under `to`, or
    /// drop them when `to` is `None`. Returns how many listings were touched.
    pub(crate) fn relocate_subtree(&mut self, from: &str, to: Option<&str>) -> usize {
        let from = dir_key(from);
        if from == ROOT_KEY {
            return 0;
        }
        let prefix = format!("{}/", from);
        let keys: Vec<String> = self
            .dirs
            .keys()
            .filter(|k| **k == from || k.starts_with(&prefix))
            .cloned()
            .collect();

        for key in &keys {
            if let Some(entries) = self.dirs.remove(key) {
                if let Some(to) = to {
                    let new_key = format!("{}{}", dir_key(to), &key[from.len()..]);
                    self.dirs.insert(new_key, entries);
                }
            }
        }
        if !keys.is_empty() {
            debug!(from = %from, to = ?to, listings = keys.len(), "Relocated cached subtree");
        }
        keys.len()
    }

    pub fn root(&self) -> &[Entry] {
        self.get_directory(ROOT_KEY).unwrap_or(&[])
    }

    pub fn is_loaded(&self, path: &str) -> bool {
        self.dirs.contains_key(&dir_key(path))
    }

    /// Keys of all loaded directories, sorted.
    pub fn loaded_dirs(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.dirs.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }
}
