//! Config loader facade: assembles sources in precedence order.

use super::merge;
use super::sources::{environment, global_file, workspace_file};
use super::MirrorConfig;
use crate::error::ApiError;
use config::File;
use std::path::Path;

/// Loads [`MirrorConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace.
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// `config/config.toml`, workspace `config/{DIRMIRROR_ENV}.toml`,
    /// environment.
    pub fn load(workspace_root: &Path) -> Result<MirrorConfig, ApiError> {
        let builder = merge::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);

        let config: MirrorConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Load configuration from a single file, still honoring defaults and the
    /// environment.
    pub fn load_from_file(path: &Path) -> Result<MirrorConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = merge::builder_with_defaults()?
            .add_source(File::from(path.to_path_buf()).required(true));
        let builder = environment::add_to_builder(builder);

        let config: MirrorConfig = builder.build()?.try_deserialize()?;
        Self::validated(config)
    }

    /// Built-in defaults only.
    pub fn default() -> MirrorConfig {
        MirrorConfig::default()
    }

    fn validated(config: MirrorConfig) -> Result<MirrorConfig, ApiError> {
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }
}
