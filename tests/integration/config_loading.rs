//! Layered configuration loading.

use dirmirror::config::ConfigLoader;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_environment_file_overrides_base_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_dir = temp_dir.path().join("config");
    fs::create_dir(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[watch]\ntick_ms = 300\n\n[loader]\nignore_patterns = [\"dist\"]\n",
    )
    .unwrap();
    fs::write(config_dir.join("development.toml"), "[watch]\ntick_ms = 20\n").unwrap();

    let config = ConfigLoader::load(temp_dir.path()).unwrap();
    assert_eq!(config.watch.tick_ms, 20);
    assert_eq!(config.loader.ignore_patterns, vec!["dist".to_string()]);
    assert!(config.loader.ignore_hidden);
}

#[test]
fn test_invalid_logging_format_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirror.toml");
    fs::write(&path, "[logging]\nformat = \"xml\"\n").unwrap();

    let err = ConfigLoader::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("Invalid format"));
}

#[test]
fn test_rendered_config_loads_back() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mirror.toml");
    let config = ConfigLoader::default();
    fs::write(&path, config.to_toml().unwrap()).unwrap();

    let loaded = ConfigLoader::load_from_file(&path).unwrap();
    assert_eq!(loaded.watch.tick_ms, config.watch.tick_ms);
    assert_eq!(loaded.loader.ignore_patterns, config.loader.ignore_patterns);
}
