//! Configuration management.

mod file_config;

pub use file_config::{find_config_file, save_config, ConfigFileError, CONFIG_FILE_NAME};

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::ParserOptions;

/// Environment variable prefix for overrides, e.g. `MANUSCRIPT_PARSER_PARSER__EXTRACT_TITLE`
pub const ENV_PREFIX: &str = "MANUSCRIPT_PARSER";

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Parsing defaults
    #[serde(default)]
    pub parser: ParserConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Parser options seeded from the configured defaults
    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions::default()
            .extract_title(self.parser.extract_title)
            .enhance_with_ai(self.parser.enhance_with_ai)
    }
}

/// Parsing defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParserConfig {
    /// Take the first line (or PDF metadata) as the title
    #[serde(default = "default_true")]
    pub extract_title: bool,

    /// Request enhancement when an enhancer is available
    #[serde(default)]
    pub enhance_with_ai: bool,

    /// Maximum accepted upload size (in MB)
    #[serde(default = "default_max_file_size")]
    pub max_file_size_mb: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            extract_title: true,
            enhance_with_ai: false,
            max_file_size_mb: default_max_file_size(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `"json"` for structured output, anything else for plain text
    #[serde(default)]
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

fn default_true() -> bool {
    true
}

fn default_max_file_size() -> usize {
    crate::service::DEFAULT_MAX_FILE_SIZE_MB
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Load configuration from a file, with environment overrides
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(environment())
        .build()?;

    settings.try_deserialize()
}

/// Get the configuration from the default file location (if any) and
/// environment variables, falling back to defaults
pub fn get_config() -> Result<Config, config::ConfigError> {
    match find_config_file() {
        Some(path) => load_config(&path),
        None => config::Config::builder()
            .add_source(environment())
            .build()?
            .try_deserialize(),
    }
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.parser.extract_title);
        assert!(!config.parser.enhance_with_ai);
        assert_eq!(config.parser.max_file_size_mb, 50);
        assert_eq!(config.logging.level, "warn");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("manuscript-parser.toml");
        std::fs::write(
            &path,
            "[parser]\nextract_title = false\nmax_file_size_mb = 5\n\n[logging]\nformat = \"json\"\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert!(!config.parser.extract_title);
        assert_eq!(config.parser.max_file_size_mb, 5);
        assert!(config.logging.is_json());
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_parser_options_from_config() {
        let mut config = Config::default();
        config.parser.extract_title = false;
        config.parser.enhance_with_ai = true;

        let options = config.parser_options();
        assert!(!options.extract_title);
        assert!(options.enhance_with_ai);
    }
}
