//! Change event schema.
//!
//! Events carry root-relative, `/`-separated paths. `path` is the directory the
//! entry is in after the change; `old_path` is the full former path of the
//! entry for REMOVE, RENAME and MOVE.

use crate::error::ApiError;
use crate::tree::entry::{EntryKind, FileCategory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::BufRead;

/// Kind of filesystem change
///
/// Deserializes from either the operation name (`"CREATE"`) or the watcher's
/// numeric code (`0`, `2`, `3`, `5`). Anything else becomes `Unknown` and is
/// ignored by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawOp", into = "String")]
pub enum Op {
    Create,
    Remove,
    Rename,
    Move,
    Unknown,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOp {
    Code(u64),
    Name(String),
}

impl From<RawOp> for Op {
    fn from(raw: RawOp) -> Self {
        match raw {
            RawOp::Code(0) => Op::Create,
            RawOp::Code(2) => Op::Remove,
            RawOp::Code(3) => Op::Rename,
            RawOp::Code(5) => Op::Move,
            RawOp::Code(_) => Op::Unknown,
            RawOp::Name(name) => match name.to_uppercase().as_str() {
                "CREATE" => Op::Create,
                "REMOVE" => Op::Remove,
                "RENAME" => Op::Rename,
                "MOVE" => Op::Move,
                _ => Op::Unknown,
            },
        }
    }
}

impl From<Op> for String {
    fn from(op: Op) -> Self {
        op.to_string()
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Op::Create => "CREATE",
            Op::Remove => "REMOVE",
            Op::Rename => "RENAME",
            Op::Move => "MOVE",
            Op::Unknown => "???",
        };
        write!(f, "{}", label)
    }
}

/// One filesystem change to reconcile into the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub op: Op,
    pub path: String,
    #[serde(default)]
    pub old_path: String,
    pub file: String,
    pub data_type: EntryKind,
    /// Category sent with the event. When absent it is derived from the
    /// extension of `file`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<FileCategory>,
}

impl ChangeEvent {
    /// `file` created inside directory `path`
    pub fn create(path: impl Into<String>, file: impl Into<String>, data_type: EntryKind) -> Self {
        let file = file.into();
        Self {
            op: Op::Create,
            path: path.into(),
            old_path: String::new(),
            file_type: category_for(&file, data_type),
            file,
            data_type,
        }
    }

    /// `file` removed from directory `path`
    pub fn remove(path: impl Into<String>, file: impl Into<String>, data_type: EntryKind) -> Self {
        let file = file.into();
        let path = path.into();
        Self {
            op: Op::Remove,
            old_path: crate::tree::path::join_key(&path, &file),
            path,
            file_type: category_for(&file, data_type),
            file,
            data_type,
        }
    }

    /// Entry at `old_path` renamed to `file` inside directory `path`
    pub fn rename(
        old_path: impl Into<String>,
        path: impl Into<String>,
        file: impl Into<String>,
        data_type: EntryKind,
    ) -> Self {
        Self::relocated(Op::Rename, old_path.into(), path.into(), file.into(), data_type)
    }

    /// Entry at `old_path` moved to `file` inside directory `path`
    pub fn moved(
        old_path: impl Into<String>,
        path: impl Into<String>,
        file: impl Into<String>,
        data_type: EntryKind,
    ) -> Self {
        Self::relocated(Op::Move, old_path.into(), path.into(), file.into(), data_type)
    }

    fn relocated(op: Op, old_path: String, path: String, file: String, data_type: EntryKind) -> Self {
        Self {
            op,
            path,
            old_path,
            file_type: category_for(&file, data_type),
            file,
            data_type,
        }
    }
}

fn category_for(file: &str, data_type: EntryKind) -> Option<FileCategory> {
    match (data_type, file.rfind('.')) {
        (EntryKind::File, Some(i)) => Some(FileCategory::from_extension(&file[i..])),
        (EntryKind::File, None) => Some(FileCategory::Unsupported),
        (EntryKind::Dir, _) => None,
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {:?} [{}]", self.data_type, self.op, self.file, self.path)?;
        if !self.old_path.is_empty() {
            write!(f, " from {}", self.old_path)?;
        }
        Ok(())
    }
}

/// Read a JSON-lines event log. Blank lines and lines starting with `#` are
/// skipped.
pub fn read_event_log<R: BufRead>(reader: R) -> Result<Vec<ChangeEvent>, ApiError> {
    let mut events = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let event = serde_json::from_str(trimmed).map_err(|e| ApiError::InvalidEvent {
            line: i + 1,
            message: e.to_string(),
        })?;
        events.push(event);
    }
    Ok(events)
}
