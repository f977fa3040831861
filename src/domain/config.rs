//! # Configuration
//!
//! Manages the loading and parsing of the application's configuration file (`config.yaml`).
//! Every section is optional; a missing file means defaults throughout.
//!
//! Configuration and logs live in per-user directories only. The working directory is
//! the sandbox the tools write into, so nothing found there is trusted as configuration.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::paths;

/// Main application configuration structure.
/// Matches the layout of `<config dir>/fsgate/config.yaml`.
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    /// File the configuration was read from; `None` when running on defaults.
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_dir")]
    pub directory: PathBuf,
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
    /// Mirror log events to stderr.
    #[serde(default = "default_true")]
    pub console: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_log_dir(),
            file: default_log_file(),
            filter: default_log_filter(),
            console: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct LimitsConfig {
    /// Clamped to [`paths::MAX_FILE_SIZE`] on load.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(paths::APP_DIR)
}
fn default_log_file() -> String {
    paths::LOG_FILE.to_string()
}
fn default_log_filter() -> String {
    "info".to_string()
}
fn default_true() -> bool {
    true
}
fn default_max_file_size() -> u64 {
    paths::MAX_FILE_SIZE
}

impl AppConfig {
    /// Loads the configuration.
    ///
    /// An explicit path must exist. Otherwise `<config dir>/fsgate/config.yaml` is
    /// tried, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::candidates().into_iter().find(|p| p.is_file()) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config =
            Self::parse(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        // An empty YAML document deserializes to unit, not a map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let mut config: Self = serde_yaml::from_str(content)?;
        config.limits.max_file_size = config.limits.max_file_size.min(paths::MAX_FILE_SIZE);
        Ok(config)
    }

    fn candidates() -> Vec<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(paths::APP_DIR).join(paths::CONFIG_FILE_NAME))
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::parse("").unwrap();
        assert_eq!(config.limits.max_file_size, 1024 * 1024);
        assert!(config.logging.directory.is_absolute());
        assert!(config.logging.directory.ends_with("fsgate"));
        assert_eq!(config.logging.file, "session.log");
        assert!(config.logging.console);
    }

    #[test]
    fn test_working_directory_config_is_never_consulted() {
        let sandbox = TempDir::new().unwrap();
        std::fs::create_dir(sandbox.path().join("data")).unwrap();
        std::fs::write(
            sandbox.path().join("data/config.yaml"),
            "logging:\n  directory: /tmp/elsewhere\n",
        )
        .unwrap();

        for candidate in AppConfig::candidates() {
            assert!(candidate.is_absolute(), "{}", candidate.display());
            assert!(!candidate.starts_with(sandbox.path()));
            assert_ne!(candidate, PathBuf::from("data/config.yaml"));
        }
        // Relative defaults would land inside whatever directory fsgate serves
        assert!(AppConfig::default().logging.directory.is_absolute());
    }

    #[test]
    fn test_partial_sections() {
        let yaml = "logging:\n  filter: debug\n  console: false\n";
        let config = AppConfig::parse(yaml).unwrap();
        assert_eq!(config.logging.filter, "debug");
        assert!(!config.logging.console);
        assert_eq!(config.logging.file, "session.log");
        assert_eq!(config.limits.max_file_size, 1024 * 1024);
    }

    #[test]
    fn test_limits_override() {
        let config = AppConfig::parse("limits:\n  max_file_size: 4096\n").unwrap();
        assert_eq!(config.limits.max_file_size, 4096);
    }

    #[test]
    fn test_limits_cannot_exceed_ceiling() {
        let config = AppConfig::parse("limits:\n  max_file_size: 1073741824\n").unwrap();
        assert_eq!(config.limits.max_file_size, paths::MAX_FILE_SIZE);
    }

    #[test]
    fn test_from_file_records_source() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "limits:\n  max_file_size: 10\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.limits.max_file_size, 10);
        assert_eq!(config.source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        std::fs::write(&path, "limits: [not, a, map]\n").unwrap();
        assert!(AppConfig::from_file(&path).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp_dir.path().join("nope.yaml"))).is_err());
    }
}
