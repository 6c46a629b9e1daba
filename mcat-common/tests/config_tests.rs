//! Configuration resolution tests
//!
//! Tests touching MCAT_ROOT_FOLDER run serially since the environment is process-wide.

use mcat_common::config::{
    load_toml_config, resolve_root_folder, CliOverrides, ServerConfig, TomlConfig,
    ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
#[serial]
fn test_env_beats_toml() {
    std::env::set_var(ROOT_FOLDER_ENV, "/from/env");
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, ROOT_FOLDER_ENV, &toml_config);
    std::env::remove_var(ROOT_FOLDER_ENV);

    assert_eq!(resolved, PathBuf::from("/from/env"));
}

#[test]
#[serial]
fn test_toml_used_without_cli_or_env() {
    std::env::remove_var(ROOT_FOLDER_ENV);
    let toml_config = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    assert_eq!(
        resolve_root_folder(None, ROOT_FOLDER_ENV, &toml_config),
        PathBuf::from("/from/toml")
    );
}

#[test]
#[serial]
fn test_default_root_folder_is_named_after_app() {
    std::env::remove_var(ROOT_FOLDER_ENV);
    let resolved = resolve_root_folder(None, ROOT_FOLDER_ENV, &TomlConfig::default());
    assert!(resolved.ends_with("mcat") || resolved.ends_with("mcat_data"));
}

#[test]
fn test_load_explicit_config_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/mcat"
bind_address = "0.0.0.0"
port = 8088
request_timeout_ms = 1500
busy_timeout_ms = 250
"#,
    )
    .unwrap();

    let toml_config = load_toml_config(Some(&path)).unwrap();
    let config = ServerConfig::resolve(&CliOverrides::default(), &toml_config);

    assert_eq!(config.bind_address, "0.0.0.0");
    assert_eq!(config.port, 8088);
    assert_eq!(config.request_timeout, Duration::from_millis(1500));
    assert_eq!(config.busy_timeout, Duration::from_millis(250));
}

#[test]
fn test_missing_explicit_config_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let result = load_toml_config(Some(&temp_dir.path().join("absent.toml")));
    assert!(matches!(result, Err(mcat_common::Error::Config(_))));
}
