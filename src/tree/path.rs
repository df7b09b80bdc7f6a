//! Path resolution for change events.
//!
//! Cache keys are `/`-separated paths relative to the mirrored root, with no
//! leading `./` and no trailing slash. The root itself is keyed as
//! [`ROOT_KEY`]. Names are kept byte-for-byte as given; Unicode normalization
//! only happens inside the sort key.

use crate::error::{LoadError, ReconcileError};
use crate::tree::entry::EntryKind;
use std::path::{Path, PathBuf};

/// Cache key of the root listing
pub const ROOT_KEY: &str = ".";

/// Where an entry lives and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryLocation {
    /// Cache key of the parent directory
    pub dir: String,
    /// Bare name (without extension for files)
    pub name: String,
    /// Extension with its leading dot, empty for directories
    pub extension: String,
}

/// Canonicalize a root directory on disk.
pub fn canonicalize_path(path: &Path) -> Result<PathBuf, LoadError> {
    let canonical = dunce::canonicalize(path)?;
    if !canonical.is_dir() {
        return Err(LoadError::NotADirectory(canonical));
    }
    Ok(canonical)
}

/// Normalize a relative path string into a cache key.
pub fn dir_key(path: &str) -> String {
    let mut key = path.replace('\\', "/");

    while key.len() > 1 && key.ends_with('/') {
        key.pop();
    }
    while let Some(rest) = key.strip_prefix("./") {
        key = rest.to_string();
    }
    let key = key.trim_start_matches('/');

    if key.is_empty() || key == ROOT_KEY {
        ROOT_KEY.to_string()
    } else {
        key.to_string()
    }
}

/// True when `path` denotes the mirrored root.
pub fn is_root(path: &str) -> bool {
    dir_key(path) == ROOT_KEY
}

/// Cache key of a child directory.
pub fn join_key(dir: &str, name: &str) -> String {
    if is_root(dir) {
        dir_key(name)
    } else {
        format!("{}/{}", dir_key(dir), name)
    }
}

/// Split a bare file segment into name and extension.
///
/// Directories keep the whole segment. Files split at the last `.`; a file
/// segment with no `.` (or only a leading one) is rejected.
pub fn split_name(segment: &str, kind: EntryKind) -> Result<(String, String), ReconcileError> {
    let segment = segment.to_string();
    if segment.is_empty() || segment.contains('/') {
        return Err(ReconcileError::MalformedPath(segment));
    }

    match kind {
        EntryKind::Dir => Ok((segment, String::new())),
        EntryKind::File => match segment.rfind('.') {
            Some(i) if i > 0 => {
                let (name, extension) = segment.split_at(i);
                Ok((name.to_string(), extension.to_string()))
            }
            _ => Err(ReconcileError::MalformedPath(segment)),
        },
    }
}

/// Current-path rule: the entry `file` inside directory `path`.
pub fn resolve_current(path: &str, file: &str, kind: EntryKind) -> Result<EntryLocation, ReconcileError> {
    let (name, extension) = split_name(file, kind)?;
    Ok(EntryLocation {
        dir: dir_key(path),
        name,
        extension,
    })
}

/// Former-path rule: the directory is `old_path` truncated at its last
/// separator, the name is the last segment. Root-level paths have no separator
/// and resolve to the root.
pub fn resolve_former(old_path: &str, kind: EntryKind) -> Result<EntryLocation, ReconcileError> {
    let key = dir_key(old_path);
    if key == ROOT_KEY {
        return Err(ReconcileError::MalformedPath(old_path.to_string()));
    }

    let (dir, segment) = match key.rfind('/') {
        Some(i) => (dir_key(&key[..i]), &key[i + 1..]),
        None => (ROOT_KEY.to_string(), key.as_str()),
    };
    let (name, extension) = split_name(segment, kind)?;
    Ok(EntryLocation {
        dir,
        name,
        extension,
    })
}
