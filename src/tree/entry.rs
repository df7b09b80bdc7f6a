//! Entry model: one file or directory record inside a directory listing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// File or directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntryKind {
    File,
    Dir,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "FILE"),
            EntryKind::Dir => write!(f, "DIR"),
        }
    }
}

/// Semantic category of a file. Directories always carry `Unsupported`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileCategory {
    Graph,
    Sheet,
    Video,
    Image,
    #[default]
    Unsupported,
}

impl FileCategory {
    /// Category for an extension including its leading dot.
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            ".json" => FileCategory::Graph,
            ".png" | ".jpeg" | ".jpg" | ".gif" | ".webp" => FileCategory::Image,
            ".mp4" | ".mpeg" => FileCategory::Video,
            ".csv" | ".xlsx" => FileCategory::Sheet,
            _ => FileCategory::Unsupported,
        }
    }
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileCategory::Graph => "GRAPH",
            FileCategory::Sheet => "SHEET",
            FileCategory::Video => "VIDEO",
            FileCategory::Image => "IMAGE",
            FileCategory::Unsupported => "UNSUPPORTED",
        };
        write!(f, "{}", label)
    }
}

/// A single record in a directory's ordered entry list.
///
/// For files `name` excludes the extension and `extension` keeps its leading
/// dot (`graph` + `.json`). Directories hold their full segment in `name` and an
/// empty extension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub name: String,
    #[serde(default)]
    pub extension: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(rename = "fileType", default)]
    pub category: FileCategory,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    /// Create a file entry stamped with the current time
    pub fn file(
        name: impl Into<String>,
        extension: impl Into<String>,
        category: FileCategory,
    ) -> Self {
        Self {
            name: name.into(),
            extension: extension.into(),
            kind: EntryKind::File,
            category,
            updated_at: Utc::now(),
        }
    }

    /// Create a directory entry stamped with the current time
    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: String::new(),
            kind: EntryKind::Dir,
            category: FileCategory::Unsupported,
            updated_at: Utc::now(),
        }
    }

    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = updated_at;
        self
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Name as it appears on disk (`name` plus extension for files).
    pub fn file_name(&self) -> String {
        match self.kind {
            EntryKind::Dir => self.name.clone(),
            EntryKind::File => format!("{}{}", self.name, self.extension),
        }
    }

    /// True when this entry has the identity `(name, kind, extension)`.
    pub fn matches(&self, name: &str, kind: EntryKind, extension: &str) -> bool {
        self.kind == kind && self.name == name && self.extension == extension
    }
}
