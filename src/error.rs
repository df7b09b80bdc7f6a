//! Error types for the directory mirror.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised by a single reconciliation handler.
///
/// None of these cross the dispatcher: `DirectoryNotLoaded` is dropped silently,
/// the others are turned into notices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    #[error("Directory not loaded: {0}")]
    DirectoryNotLoaded(String),

    #[error("Element not found: {name} in {dir}")]
    ElementNotFound { dir: String, name: String },

    #[error("Malformed path: {0}")]
    MalformedPath(String),
}

/// Directory loader errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Not a directory: {0:?}")]
    NotADirectory(PathBuf),

    #[error("Failed to list {path:?}: {message}")]
    Listing { path: PathBuf, message: String },

    #[error("Loader I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors surfaced by the CLI, configuration and logging layers
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Load error: {0}")]
    LoadError(#[from] LoadError),

    #[error("Invalid event on line {line}: {message}")]
    InvalidEvent { line: usize, message: String },

    #[error("Watch error: {0}")]
    WatchError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<notify::Error> for ApiError {
    fn from(err: notify::Error) -> Self {
        ApiError::WatchError(err.to_string())
    }
}
