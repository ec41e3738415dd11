//! Unit tests for bootstrap configuration
//!
//! Covers:
//! - Missing TOML files do not stop startup
//! - Malformed TOML is reported as a configuration error
//! - Root folder priority: CLI > environment > TOML > OS default
//!
//! Tests that touch DSM_ROOT_FOLDER are marked #[serial] so they do not
//! race each other on the process environment.

use dsm_common::config::{
    default_config_path, get_default_root_folder, resolve_root_folder, TomlConfig,
    ENV_ROOT_FOLDER,
};
use dsm_common::Error;
use serial_test::serial;
use std::env;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

#[test]
fn test_missing_toml_is_not_an_error() {
    let dir = TempDir::new().unwrap();
    let loaded = TomlConfig::load_optional(&dir.path().join("absent.toml")).unwrap();
    assert!(loaded.is_none());
}

#[test]
fn test_full_toml_parses() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drafts.toml");
    std::fs::write(
        &path,
        r#"
root_folder = "/srv/dsm"
database_path = "/srv/dsm/custom.db"
port = 6001

[logging]
level = "debug"
"#,
    )
    .unwrap();

    let config = TomlConfig::load_optional(&path).unwrap().unwrap();
    assert_eq!(config.root_folder, Some(PathBuf::from("/srv/dsm")));
    assert_eq!(config.database_path, Some(PathBuf::from("/srv/dsm/custom.db")));
    assert_eq!(config.port, Some(6001));
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = TomlConfig::from_toml_str("").unwrap();
    assert!(config.root_folder.is_none());
    assert!(config.port.is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_malformed_toml_is_config_error() {
    let err = TomlConfig::from_toml_str("port = \"not a number\"").unwrap_err();
    assert!(matches!(err, Error::Config(_)));
}

#[test]
fn test_default_config_path_is_per_module() {
    if let Some(path) = default_config_path("drafts") {
        assert!(path.ends_with(Path::new("dsm").join("drafts.toml")));
    }
}

#[test]
#[serial]
fn test_cli_root_folder_wins() {
    env::set_var(ENV_ROOT_FOLDER, "/from/env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(Some(Path::new("/from/cli")), Some(&toml));
    assert_eq!(resolved, PathBuf::from("/from/cli"));

    env::remove_var(ENV_ROOT_FOLDER);
}

#[test]
#[serial]
fn test_env_root_folder_beats_toml() {
    env::set_var(ENV_ROOT_FOLDER, "/from/env");
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    let resolved = resolve_root_folder(None, Some(&toml));
    assert_eq!(resolved, PathBuf::from("/from/env"));

    env::remove_var(ENV_ROOT_FOLDER);
}

#[test]
#[serial]
fn test_toml_root_folder_beats_default() {
    env::remove_var(ENV_ROOT_FOLDER);
    let toml = TomlConfig {
        root_folder: Some(PathBuf::from("/from/toml")),
        ..Default::default()
    };

    assert_eq!(resolve_root_folder(None, Some(&toml)), PathBuf::from("/from/toml"));
}

#[test]
#[serial]
fn test_no_overrides_uses_default() {
    env::remove_var(ENV_ROOT_FOLDER);
    let resolved = resolve_root_folder(None, None);
    assert_eq!(resolved, get_default_root_folder());
    assert!(!resolved.as_os_str().is_empty());
}
