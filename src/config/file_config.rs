//! Configuration file support for manuscript-parser.
//!
//! # Configuration File Format
//!
//! ```toml
//! [parser]
//! extract_title = true
//! enhance_with_ai = false
//! max_file_size_mb = 50
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::path::{Path, PathBuf};

use super::Config;

/// File name searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "manuscript-parser.toml";

/// Write a configuration to a TOML file
pub fn save_config(config: &Config, path: &Path) -> Result<(), ConfigFileError> {
    let content =
        toml::to_string_pretty(config).map_err(|e| ConfigFileError::Serialize(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigFileError::Io(e.to_string()))
}

/// Locate a configuration file: `./manuscript-parser.toml` first, then
/// `<config dir>/manuscript-parser/config.toml`
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("manuscript-parser").join("config.toml"))
        .filter(|path| path.is_file())
}

/// Configuration file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}
