//! Persistent CLI Configuration Loader
//!
//! Configuration is loaded from `~/.config/formgen/config.toml` on Linux,
//! `~/Library/Application Support/formgen/config.toml` on macOS
//! or `%APPDATA%\formgen\config.toml` on Windows.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, warn};

use formgen::config::GeneratorConfig;
use formgen::types::FormgenError;

/// CLI Configuration structure loaded from TOML file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CliConfig {
    /// Templating endpoint used by `generate`.
    pub endpoint: Option<String>,
    /// Request timeout for `generate`, in seconds.
    pub timeout_seconds: Option<u64>,
    /// Where the template collection is kept.
    pub store_path: Option<PathBuf>,
    /// Enable file logging by default.
    pub enable_logging: Option<bool>,
}

impl CliConfig {
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("formgen"))
    }

    /// Returns the full path to the config file.
    pub fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Attempts to load configuration from the default config file location.
    /// Returns `CliConfig::default()` if the file doesn't exist or fails to parse.
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            debug!("Could not determine config directory");
            return Self::default();
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            debug!("No config file found at {:?}", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<CliConfig>(&content) {
                Ok(config) => {
                    debug!("Loaded configuration from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse config file {:?}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read config file {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Template collection path, falling back to the platform data directory.
    pub fn store_path(&self) -> PathBuf {
        self.store_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|p| p.join("formgen"))
                .unwrap_or_else(|| PathBuf::from("."))
                .join("templates.json")
        })
    }

    /// Generator settings with file values layered over the library defaults.
    /// `FORMGEN_ENDPOINT` takes precedence over the file when set.
    pub fn generator_config(&self) -> Result<GeneratorConfig, FormgenError> {
        if std::env::var("FORMGEN_ENDPOINT").is_ok() {
            return GeneratorConfig::from_env();
        }

        let mut builder = GeneratorConfig::builder();
        if let Some(endpoint) = &self.endpoint {
            builder = builder.endpoint(endpoint.clone());
        }
        if let Some(seconds) = self.timeout_seconds {
            builder = builder.timeout_seconds(seconds);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CliConfig::default();
        assert!(config.endpoint.is_none());
        assert!(config.store_path().ends_with("templates.json"));
    }

    #[test]
    fn test_config_serialization() {
        let config = CliConfig {
            endpoint: Some("https://scaffold.test/api/template".to_string()),
            timeout_seconds: Some(10),
            ..Default::default()
        };
        let toml_str = toml::to_string(&config).unwrap();
        assert!(toml_str.contains("timeout-seconds"));

        let back: CliConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "endpoint = [not toml").unwrap();
        assert_eq!(CliConfig::load_from(&path), CliConfig::default());
    }
}
