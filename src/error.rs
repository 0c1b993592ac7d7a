use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Invalid config value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("Missing credential: {0}")]
    MissingCredential(String),
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{provider} returned HTTP {status}: {body}")]
    Http {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(&'static str),

    #[error("Could not parse plan: {0}")]
    InvalidPlan(String),

    #[error("Failed to obtain access token: {0}")]
    Token(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Audit record '{0}' already exists")]
    AlreadyExists(String),

    #[error("Audit record '{0}' not found")]
    NotFound(String),

    #[error("Audit store unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Internal failures inside a run. The public entry point turns these into a
/// failed `OrchestrationResult` instead of returning them.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Failed to serialize plan: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Quorum indices {0:?} do not reference a normalized plan")]
    InvalidQuorum(Vec<usize>),
}
