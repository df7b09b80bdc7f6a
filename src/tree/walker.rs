//! Directory loader: lists one directory level from disk as ordered entries.

use crate::error::LoadError;
use crate::tree::entry::{Entry, FileCategory};
use crate::tree::order::sort_entries;
use crate::tree::path::{dir_key, ROOT_KEY};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Source of directory listings for the cache.
///
/// Called by whatever drives expansion (the UI, the CLI), never by the
/// reconciler on its own.
pub trait DirectoryLoader {
    fn load_directory(&self, key: &str) -> Result<Vec<Entry>, LoadError>;
}

/// Loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Whether to follow symbolic links
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Skip entries whose name starts with a dot
    #[serde(default = "default_true")]
    pub ignore_hidden: bool,
    /// Names to skip (e.g., "target", "node_modules")
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_ignore_patterns() -> Vec<String> {
    vec!["target".to_string(), "node_modules".to_string()]
}

impl LoaderConfig {
    /// Whether an entry name is skipped.
    pub fn is_ignored(&self, name: &str) -> bool {
        if self.ignore_hidden && name.starts_with('.') {
            return true;
        }
        self.ignore_patterns.iter().any(|pattern| pattern == name)
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            follow_symlinks: false,
            ignore_hidden: default_true(),
            ignore_patterns: default_ignore_patterns(),
        }
    }
}

/// Loads listings from the local filesystem below a root directory.
pub struct FsDirectoryLoader {
    root: PathBuf,
    config: LoaderConfig,
}

impl FsDirectoryLoader {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: LoaderConfig::default(),
        }
    }

    pub fn with_config(root: PathBuf, config: LoaderConfig) -> Self {
        Self { root, config }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of a directory key.
    pub fn resolve(&self, key: &str) -> PathBuf {
        let key = dir_key(key);
        if key == ROOT_KEY {
            self.root.clone()
        } else {
            key.split('/').fold(self.root.clone(), |path, part| path.join(part))
        }
    }

    /// Whether an entry name is skipped by this loader.
    pub fn is_ignored(&self, name: &str) -> bool {
        self.config.is_ignored(name)
    }

    fn to_entry(&self, dir_entry: &DirEntry) -> Result<Option<Entry>, LoadError> {
        let file_name = dir_entry.file_name().to_string_lossy().to_string();
        if self.is_ignored(&file_name) {
            trace!(name = %file_name, "Skipping ignored entry");
            return Ok(None);
        }

        let metadata = dir_entry.metadata().map_err(|e| LoadError::Listing {
            path: dir_entry.path().to_path_buf(),
            message: e.to_string(),
        })?;
        let updated_at: DateTime<Utc> = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        if metadata.is_dir() {
            return Ok(Some(Entry::dir(file_name).with_updated_at(updated_at)));
        }
        if !metadata.is_file() {
            return Ok(None);
        }

        // Files without an extension cannot be addressed by change events.
        match file_name.rfind('.') {
            Some(i) if i > 0 => {
                let (name, extension) = file_name.split_at(i);
                Ok(Some(
                    Entry::file(name, extension, FileCategory::from_extension(extension))
                        .with_updated_at(updated_at),
                ))
            }
            _ => {
                debug!(name = %file_name, "Skipping file without extension");
                Ok(None)
            }
        }
    }
}

impl DirectoryLoader for FsDirectoryLoader {
    fn load_directory(&self, key: &str) -> Result<Vec<Entry>, LoadError> {
        let path = self.resolve(key);
        if !path.is_dir() {
            return Err(LoadError::NotADirectory(path));
        }

        let walker = WalkDir::new(&path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(self.config.follow_symlinks);

        let mut entries = Vec::new();
        for dir_entry in walker {
            let dir_entry = dir_entry.map_err(|e| LoadError::Listing {
                path: path.clone(),
                message: e.to_string(),
            })?;
            if let Some(entry) = self.to_entry(&dir_entry)? {
                entries.push(entry);
            }
        }

        sort_entries(&mut entries);
        debug!(dir = %dir_key(key), entries = entries.len(), "Loaded directory");
        Ok(entries)
    }
}
