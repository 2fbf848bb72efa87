use serde::{Deserialize, Serialize};
use std::env;
use std::fs;

use crate::types::FormgenError;

/// Where and how scaffolding requests are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Templating endpoint receiving `{ "data": ... }` POSTs.
    pub endpoint: String,
    pub timeout_seconds: u64,

    // Route prefixes for the navigable base path of generated pages
    pub generate_prefix: String,
    pub dashboard_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            endpoint: "http://localhost:3000/api/template".to_string(),
            timeout_seconds: 30,
            generate_prefix: "/generate".to_string(),
            dashboard_prefix: "/dashboard".to_string(),
        }
    }
}

impl std::str::FromStr for GeneratorConfig {
    type Err = FormgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: GeneratorConfig = serde_json::from_str(s)
            .map_err(|e| FormgenError::Configuration(format!("Failed to parse config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

impl GeneratorConfig {
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::default()
    }

    pub fn new(endpoint: impl Into<String>) -> Result<Self, FormgenError> {
        let config = Self {
            endpoint: endpoint.into(),
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for logical consistency.
    pub fn validate(&self) -> Result<(), FormgenError> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(FormgenError::Configuration(format!(
                "Endpoint must be an http(s) URL, got \"{}\"",
                self.endpoint
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(FormgenError::Configuration("Timeout must be at least one second".to_string()));
        }
        for prefix in [&self.generate_prefix, &self.dashboard_prefix] {
            if !prefix.starts_with('/') {
                return Err(FormgenError::Configuration(format!(
                    "Route prefix must start with '/', got \"{}\"",
                    prefix
                )));
            }
        }
        Ok(())
    }

    /// Loads configuration from `FORMGEN_ENDPOINT` and, optionally,
    /// `FORMGEN_TIMEOUT_SECONDS`.
    pub fn from_env() -> Result<Self, FormgenError> {
        let endpoint = env::var("FORMGEN_ENDPOINT")
            .map_err(|_| FormgenError::Configuration("FORMGEN_ENDPOINT env var not set".to_string()))?;

        let mut builder = Self::builder().endpoint(endpoint);
        if let Ok(timeout) = env::var("FORMGEN_TIMEOUT_SECONDS") {
            let seconds = timeout
                .parse::<u64>()
                .map_err(|e| FormgenError::Configuration(format!("Invalid timeout format: {}", e)))?;
            builder = builder.timeout_seconds(seconds);
        }
        builder.build()
    }

    /// Attempts to load configuration from a JSON file.
    pub fn try_from_json(path: &str) -> Result<Self, FormgenError> {
        let content = fs::read_to_string(path)
            .map_err(|e| FormgenError::Configuration(format!("Failed to read config file: {}", e)))?;
        content.parse()
    }

    /// Route prefix for generated pages.
    pub fn route_prefix(&self, use_generate_folder: bool) -> &str {
        if use_generate_folder {
            &self.generate_prefix
        } else {
            &self.dashboard_prefix
        }
    }
}

// ========== GeneratorConfigBuilder ==========

#[derive(Default)]
pub struct GeneratorConfigBuilder {
    endpoint: Option<String>,
    timeout_seconds: Option<u64>,
    generate_prefix: Option<String>,
    dashboard_prefix: Option<String>,
}

impl GeneratorConfigBuilder {
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn timeout_seconds(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    pub fn generate_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.generate_prefix = Some(prefix.into());
        self
    }

    pub fn dashboard_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.dashboard_prefix = Some(prefix.into());
        self
    }

    pub fn build(self) -> Result<GeneratorConfig, FormgenError> {
        let defaults = GeneratorConfig::default();
        let config = GeneratorConfig {
            endpoint: self.endpoint.unwrap_or(defaults.endpoint),
            timeout_seconds: self.timeout_seconds.unwrap_or(defaults.timeout_seconds),
            generate_prefix: self.generate_prefix.unwrap_or(defaults.generate_prefix),
            dashboard_prefix: self.dashboard_prefix.unwrap_or(defaults.dashboard_prefix),
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
    }

    #[test]
    fn test_builder_validation() {
        let res = GeneratorConfig::builder()
            .endpoint("https://scaffold.example.com/api/template")
            .timeout_seconds(5)
            .build();
        assert!(res.is_ok());

        let res_fail = GeneratorConfig::builder().endpoint("ftp://nope").build();
        assert!(matches!(res_fail, Err(FormgenError::Configuration(_))));

        let res_fail = GeneratorConfig::builder().timeout_seconds(0).build();
        assert!(res_fail.is_err());

        let res_fail = GeneratorConfig::builder().generate_prefix("generate").build();
        assert!(res_fail.is_err());
    }

    #[test]
    fn test_from_str_fills_defaults() {
        let config: GeneratorConfig = r#"{ "endpoint": "https://x.test/gen" }"#.parse().unwrap();
        assert_eq!(config.endpoint, "https://x.test/gen");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.route_prefix(true), "/generate");
        assert_eq!(config.route_prefix(false), "/dashboard");
    }

    #[test]
    fn test_try_from_json_missing_file() {
        let res = GeneratorConfig::try_from_json("/definitely/not/here.json");
        assert!(matches!(res, Err(FormgenError::Configuration(_))));
    }
}
