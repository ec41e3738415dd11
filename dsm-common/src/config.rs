//! Bootstrap configuration and root folder resolution
//!
//! Priority order for every bootstrap setting:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. OS-dependent compiled default (fallback)
//!
//! A missing TOML file is not an error; a malformed one is.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the data root folder
pub const ENV_ROOT_FOLDER: &str = "DSM_ROOT_FOLDER";

/// Bootstrap settings read from `<config_dir>/dsm/<module>.toml`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database and other module data
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// SQLite database file (defaults to `<root_folder>/drafts.db`)
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// HTTP listen port
    #[serde(default)]
    pub port: Option<u16>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load `path` if it exists
    ///
    /// Returns `Ok(None)` (with a warning) when the file is absent so the
    /// module can start on defaults.
    pub fn load_optional(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            warn!("Config file {} not found, using defaults", path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded TOML configuration from {}", path.display());
        Ok(Some(config))
    }
}

/// Default config file location for a module: `<config_dir>/dsm/<module>.toml`
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dsm").join(format!("{}.toml", module_name)))
}

/// Resolve the data root folder (CLI > `DSM_ROOT_FOLDER` > TOML > OS default)
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml: Option<&TomlConfig>) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ENV_ROOT_FOLDER) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = toml.and_then(|t| t.root_folder.clone()) {
        return path;
    }

    get_default_root_folder()
}

/// OS-dependent default root folder
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/dsm
        dirs::data_local_dir()
            .map(|d| d.join("dsm"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/dsm"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/dsm
        dirs::data_dir()
            .map(|d| d.join("dsm"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/dsm"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\dsm
        dirs::data_local_dir()
            .map(|d| d.join("dsm"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\dsm"))
    } else {
        PathBuf::from("./dsm_data")
    }
}
