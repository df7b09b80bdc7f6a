//! Merge rules: defaults and override order.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("loader.ignore_hidden", true)?
        .set_default("watch.tick_ms", 100)?
        .set_default("watch.rename_pair_ms", 50)
}
