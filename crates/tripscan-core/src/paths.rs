//! Filesystem locations.

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the tripscan home directory, or None if the user's home cannot be resolved.
pub fn try_tripscan_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("TRIPSCAN_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".tripscan"))
}

/// Default config file location: ~/.tripscan/config.toml
pub fn default_config_path() -> Option<PathBuf> {
    try_tripscan_home().map(|home| home.join("config.toml"))
}
