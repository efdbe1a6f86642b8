//! Configuration handling for the invoice store
//!
//! Configuration is read from TOML, looked up in this order:
//! an explicit `--config` path, `invoices.toml` in the current directory,
//! then `~/.config/invoice-store/config.toml` (platform equivalent).
//! Missing files fall back to defaults.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Name of the per-directory configuration file
pub const LOCAL_CONFIG_FILE: &str = "invoices.toml";

/// Record file used when nothing else is configured
pub const DEFAULT_FILE_PATH: &str = "invoices.jsonl";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

/// Settings for the backing record file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the JSONL record file
    pub file_path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_FILE_PATH),
        }
    }
}

/// Output format for commands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings for command output
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format (text or json)
    pub default_format: OutputFormat,
}

/// Combined configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub output: OutputConfig,

    /// File the configuration was loaded from, if any
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

impl Config {
    /// Loads configuration from `explicit`, or from the default locations
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                let err = ConfigError::Invalid(format!("config file not found: {}", path.display()));
                return Err(anyhow::Error::new(err).context("Failed to load configuration"));
            }
            return Self::from_file(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::from_file(&local);
        }

        if let Some(global) = Self::global_config_dir().map(|dir| dir.join("config.toml")) {
            if global.is_file() {
                return Self::from_file(&global);
            }
        }

        Ok(Self::default())
    }

    /// Loads configuration from a specific file.
    ///
    /// A relative `file_path` is resolved against the config file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        let mut config = Self::parse(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;

        if config.database.file_path.is_relative() {
            if let Some(dir) = path.parent() {
                config.database.file_path = dir.join(&config.database.file_path);
            }
        }
        config.source = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parses configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        if config.database.file_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid(
                "database.file_path must not be empty".to_string(),
            ));
        }

        Ok(config)
    }

    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "invoice-store", "invoice-store")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Overrides the record file path
    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.database.file_path = path.into();
        self
    }

    /// Serializes the configuration back to TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = Config::default();

        assert_eq!(config.database.file_path, PathBuf::from("invoices.jsonl"));
        assert_eq!(config.output.default_format, OutputFormat::Text);
        assert!(config.source.is_none());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[database]
file_path = "/var/lib/invoices/data.jsonl"

[output]
default_format = "json"
"#;

        let config = Config::parse(toml).unwrap();
        assert_eq!(
            config.database.file_path,
            PathBuf::from("/var/lib/invoices/data.jsonl")
        );
        assert_eq!(config.output.default_format, OutputFormat::Json);
    }

    #[test]
    fn parse_partial_config_uses_defaults() {
        let config = Config::parse("[output]\ndefault_format = \"json\"\n").unwrap();
        assert_eq!(config.database.file_path, PathBuf::from(DEFAULT_FILE_PATH));
    }

    #[test]
    fn parse_rejects_bad_toml() {
        assert!(matches!(
            Config::parse("[database\nfile_path = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn parse_rejects_empty_path() {
        assert!(matches!(
            Config::parse("[database]\nfile_path = \"\"\n"),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn relative_path_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("invoices.toml");
        fs::write(&config_path, "[database]\nfile_path = \"data/invoices.jsonl\"\n").unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(
            config.database.file_path,
            dir.path().join("data/invoices.jsonl")
        );
        assert_eq!(config.source, Some(config_path));
    }

    #[test]
    fn explicit_missing_config_fails() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn with_file_path_overrides() {
        let config = Config::default().with_file_path("/tmp/other.jsonl");
        assert_eq!(config.database.file_path, PathBuf::from("/tmp/other.jsonl"));
    }

    #[test]
    fn toml_round_trip() {
        let config = Config::default().with_file_path("x.jsonl");
        let text = config.to_toml().unwrap();
        assert_eq!(Config::parse(&text).unwrap(), config);
    }
}
