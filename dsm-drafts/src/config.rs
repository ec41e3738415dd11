//! Server configuration resolution
//!
//! Command-line and environment values arrive together through clap
//! (`env = ...` on each argument); they win over the TOML file, which
//! wins over compiled defaults.

use dsm_common::config::{resolve_root_folder, TomlConfig};
use std::path::PathBuf;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5740;

/// Database file name inside the root folder
pub const DEFAULT_DATABASE_FILE: &str = "drafts.db";

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub database: Option<PathBuf>,
    pub root_folder: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved settings for one server run
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub root_folder: PathBuf,
    pub database_path: PathBuf,
    pub log_level: String,
}

impl ServerConfig {
    pub fn resolve(overrides: &Overrides, toml: Option<&TomlConfig>) -> Self {
        let root_folder = resolve_root_folder(overrides.root_folder.as_deref(), toml);

        let database_path = overrides
            .database
            .clone()
            .or_else(|| toml.and_then(|t| t.database_path.clone()))
            .unwrap_or_else(|| root_folder.join(DEFAULT_DATABASE_FILE));

        let port = overrides
            .port
            .or_else(|| toml.and_then(|t| t.port))
            .unwrap_or(DEFAULT_PORT);

        let log_level = overrides
            .log_level
            .clone()
            .or_else(|| toml.map(|t| t.logging.level.clone()))
            .unwrap_or_else(|| "info".to_string());

        Self {
            port,
            root_folder,
            database_path,
            log_level,
        }
    }
}
