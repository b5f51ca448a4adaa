//! Default paths for worksync components
//!
//! Paths are user-writable by default:
//! - Config: `$XDG_CONFIG_HOME/worksync/config.toml` or `~/.config/worksync/config.toml`
//! - Data: `$XDG_DATA_HOME/worksync` or `~/.local/share/worksync`

use std::path::PathBuf;

/// Environment variable for overriding the config file path
pub const WORKSYNC_CONFIG_ENV: &str = "WORKSYNC_CONFIG";

/// Environment variable for overriding the data directory
pub const WORKSYNC_DATA_DIR_ENV: &str = "WORKSYNC_DATA_DIR";

/// Application subdirectory name
const APP_DIR: &str = "worksync";

/// Config filename within the config directory
const CONFIG_FILENAME: &str = "config.toml";

/// Database filename within the data directory
pub const DATABASE_FILENAME: &str = "worksync.db";

/// Get the default config file path.
///
/// Order of precedence:
/// 1. `$XDG_CONFIG_HOME/worksync/config.toml` (if XDG_CONFIG_HOME is set)
/// 2. `~/.config/worksync/config.toml` (fallback)
pub fn default_config_path() -> PathBuf {
    if let Ok(config_home) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(config_home).join(APP_DIR).join(CONFIG_FILENAME);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".config")
            .join(APP_DIR)
            .join(CONFIG_FILENAME);
    }

    PathBuf::from("/etc").join(APP_DIR).join(CONFIG_FILENAME)
}

/// Get the default data directory.
///
/// Order of precedence:
/// 1. `$WORKSYNC_DATA_DIR` environment variable (if set)
/// 2. `$XDG_DATA_HOME/worksync` (if XDG_DATA_HOME is set)
/// 3. `~/.local/share/worksync` (fallback)
pub fn default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var(WORKSYNC_DATA_DIR_ENV) {
        return PathBuf::from(path);
    }

    data_dir_without_env()
}

/// Get the data directory without checking WORKSYNC_DATA_DIR env var.
/// Used for default values in configs where the env var is checked separately.
pub fn data_dir_without_env() -> PathBuf {
    if let Ok(data_home) = std::env::var("XDG_DATA_HOME") {
        return PathBuf::from(data_home).join(APP_DIR);
    }

    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(APP_DIR);
    }

    // Last resort
    PathBuf::from("/tmp").join(APP_DIR).join("data")
}
