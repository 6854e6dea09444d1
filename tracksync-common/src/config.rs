//! Configuration loading and data folder resolution

use crate::logging::LoggingConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable overriding the data folder
pub const DATA_FOLDER_ENV: &str = "TRACKSYNC_DATA_FOLDER";

/// TOML configuration file schema
///
/// All sections are optional; a missing file yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TomlConfig {
    /// Data folder override (holds the SQLite database)
    pub data_folder: Option<PathBuf>,
    /// Logging levels (`[logging]` section)
    pub logging: LoggingConfig,
    /// Trakt application credentials (`[trakt]` section)
    pub trakt: TraktAppConfig,
}

/// `[trakt]` section: application credentials for the OAuth token endpoint
///
/// These identify the TrackSync installation to Trakt and are distinct from
/// the per-account OAuth credentials stored in the database.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TraktAppConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

/// Load the TOML config file, falling back to defaults when missing
///
/// A missing config file must not prevent startup: it logs a warning and
/// returns the defaults. An unreadable or malformed file is an error.
pub fn load_toml_config() -> Result<TomlConfig> {
    match config_file_path() {
        Some(path) => read_toml_config(&path),
        None => {
            warn!("No config file found, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Read and parse a specific TOML config file
pub fn read_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read config failed ({}): {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse config failed ({}): {}", path.display(), e)))
}

/// Locate the config file for the platform
///
/// The user config dir is checked first (`~/.config/tracksync/config.toml`
/// on Linux); on Linux `/etc/tracksync/config.toml` is the system fallback.
fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("tracksync").join("config.toml")) {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/tracksync/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Resolve the data folder following the priority order:
/// 1. Command-line argument (highest priority)
/// 2. `TRACKSYNC_DATA_FOLDER` environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_data_folder(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(DATA_FOLDER_ENV) {
        return PathBuf::from(path);
    }

    if let Some(path) = &config.data_folder {
        return path.clone();
    }

    default_data_folder()
}

/// OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/tracksync
        dirs::data_local_dir()
            .map(|d| d.join("tracksync"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/tracksync"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/tracksync
        dirs::data_dir()
            .map(|d| d.join("tracksync"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/tracksync"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\tracksync
        dirs::data_local_dir()
            .map(|d| d.join("tracksync"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\tracksync"))
    } else {
        PathBuf::from("./tracksync_data")
    }
}

/// Create the data folder if it does not exist yet
pub fn ensure_data_folder(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}
