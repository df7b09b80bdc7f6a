//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, workspace
//! config files and `DIRMIRROR_*` environment variables, in increasing
//! precedence.

use crate::logging::LoggingConfig;
use crate::tooling::watch::WatchConfig;
use crate::tree::walker::LoaderConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// Directory to mirror (defaults to the workspace passed on the command line)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Directory listing settings
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Live watch settings
    #[serde(default)]
    pub watch: WatchConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Loader(String),
    Watch(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Loader(msg) => write!(f, "Loader: {}", msg),
            ValidationError::Watch(msg) => write!(f, "Watch: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl MirrorConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        for pattern in &self.loader.ignore_patterns {
            if pattern.is_empty() || pattern.contains('/') {
                errors.push(ValidationError::Loader(format!(
                    "Ignore pattern '{}' must be a single non-empty name",
                    pattern
                )));
            }
        }

        if self.watch.tick_ms == 0 {
            errors.push(ValidationError::Watch("tick_ms must be greater than 0".to_string()));
        }

        if !["json", "text"].contains(&self.logging.format.as_str()) {
            errors.push(ValidationError::Logging(format!(
                "Invalid format '{}'",
                self.logging.format
            )));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Render the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, crate::error::ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::error::ApiError::ConfigError(format!("Failed to render config: {}", e)))
    }
}
