//! Control configuration
//!
//! Loads the lookup control settings from YAML or from the environment.
//! Every field has a default, so a config file only needs to name what it
//! overrides:
//!
//! ```yaml
//! sub_key: 00000000-0000-0000-0000-000000000000
//! debounce_ms: 300
//! ```

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

/// Public ABR matching-names endpoint
pub const DEFAULT_ENDPOINT: &str = "https://abr.business.gov.au/json/MatchingNames.aspx";

/// Quiet period before a lookup fires
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const ENV_SUB_KEY: &str = "ABN_LOOKUP_GUID";
pub const ENV_ENDPOINT: &str = "ABN_LOOKUP_ENDPOINT";
pub const ENV_DEBOUNCE_MS: &str = "ABN_LOOKUP_DEBOUNCE_MS";
pub const ENV_TIMEOUT_SECS: &str = "ABN_LOOKUP_TIMEOUT_SECS";

/// Settings for one lookup control instance
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// ABR web services GUID. Lookups fail fast when this is unset.
    pub sub_key: Option<String>,
    /// Matching-names endpoint (without query string)
    pub endpoint: String,
    /// Debounce quiet period in milliseconds
    pub debounce_ms: u64,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            sub_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ControlConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load configuration from `ABN_LOOKUP_*` environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(key) = var(ENV_SUB_KEY) {
            config.sub_key = Some(key);
        }
        if let Some(endpoint) = var(ENV_ENDPOINT) {
            config.endpoint = endpoint;
        }
        if let Some(ms) = var(ENV_DEBOUNCE_MS) {
            config.debounce_ms = parse_u64(ENV_DEBOUNCE_MS, ms)?;
        }
        if let Some(secs) = var(ENV_TIMEOUT_SECS) {
            config.timeout_secs = parse_u64(ENV_TIMEOUT_SECS, secs)?;
        }

        Ok(config)
    }

    pub fn with_sub_key(mut self, sub_key: impl Into<String>) -> Self {
        self.sub_key = Some(sub_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    /// The credential, if one is actually set (blank counts as missing)
    pub fn credential(&self) -> Option<&str> {
        self.sub_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_u64(var: &'static str, value: String) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { var, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ControlConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.debounce(), Duration::from_millis(500));
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_blank_credential_is_missing() {
        let config = ControlConfig::default().with_sub_key("   ");
        assert!(config.credential().is_none());

        let config = ControlConfig::default().with_sub_key(" abc-123 ");
        assert_eq!(config.credential(), Some("abc-123"));
    }

    #[test]
    fn test_from_vars() {
        let vars: HashMap<&str, &str> = [
            (ENV_SUB_KEY, "guid-1"),
            (ENV_DEBOUNCE_MS, "250"),
            (ENV_ENDPOINT, "http://localhost:9000/names"),
        ]
        .into_iter()
        .collect();

        let config =
            ControlConfig::from_vars(|name| vars.get(name).map(|v| v.to_string())).unwrap();
        assert_eq!(config.credential(), Some("guid-1"));
        assert_eq!(config.debounce_ms, 250);
        assert_eq!(config.endpoint, "http://localhost:9000/names");
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_from_vars_rejects_bad_number() {
        let err = ControlConfig::from_vars(|name| {
            (name == ENV_TIMEOUT_SECS).then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidEnv { var: ENV_TIMEOUT_SECS, .. }
        ));
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sub_key: abc\ndebounce_ms: 300").unwrap();

        let config = ControlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.credential(), Some("abc"));
        assert_eq!(config.debounce_ms, 300);
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = ControlConfig::from_file(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/config/abn_lookup.yaml"
        ))
        .unwrap();
        assert_eq!(config, ControlConfig::default());
    }

    #[test]
    fn test_from_file_missing() {
        let err = ControlConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
