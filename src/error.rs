//! Error types for the lookup control
//!
//! `LookupError` is the lookup-time taxonomy. None of its variants ever reach
//! the host: the control turns every one of them into "no dropdown" and
//! reports the detail through `tracing`. `ConfigError` covers setup failures
//! (config files, environment, HTTP client construction).

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a single name lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("No ABN lookup credential configured (set subKey or ABN_LOOKUP_GUID)")]
    ConfigurationMissing,

    #[error("Malformed lookup response: {0}")]
    MalformedResponse(String),

    #[error("Lookup transport failure: {0}")]
    TransportFailure(String),

    #[error("Stale lookup response for session {seq} (latest session is {latest})")]
    StaleResponse { seq: u64, latest: u64 },
}

impl LookupError {
    /// Stable label used as the `kind` field on diagnostic events
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConfigurationMissing => "configuration_missing",
            Self::MalformedResponse(_) => "malformed_response",
            Self::TransportFailure(_) => "transport_failure",
            Self::StaleResponse { .. } => "stale_response",
        }
    }
}

impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if err.is_connect() {
            format!("connection failed: {}", err)
        } else {
            err.to_string()
        };
        Self::TransportFailure(detail)
    }
}

impl From<serde_json::Error> for LookupError {
    fn from(err: serde_json::Error) -> Self {
        Self::TransportFailure(format!(
            "JSON decode error at line {} col {}: {}",
            err.line(),
            err.column(),
            err
        ))
    }
}

/// Errors raised while building configuration or clients
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value '{value}' for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid lookup endpoint '{url}': {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to create HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
