//! Error types for the fan-out client

use std::time::Duration;
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Failure of one outbound HTTP call, before it is attributed to a model
/// or a request identifier.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CallError {
    /// Connection, TLS or body-read failure
    #[error("Network error: {0}")]
    Network(String),

    /// The per-request deadline elapsed
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Gateway answered with a non-success status
    #[error("API error (status {status_code}): {message}")]
    Api { status_code: u16, message: String },

    /// Body was not the expected shape; the message names the field
    #[error("Failed to parse response: {0}")]
    Parsing(String),
}

impl CallError {
    /// Status code reported by the gateway, if the call got that far
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api { status_code, .. } => Some(*status_code),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for CallError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::Api {
                status_code: status.as_u16(),
                message: err.to_string(),
            }
        } else if err.is_decode() {
            Self::Parsing(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CallError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parsing(err.to_string())
    }
}

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum Error {
    /// The model directory could not be fetched or parsed
    #[error("Model catalog unavailable: {cause}")]
    CatalogUnavailable { cause: CallError },

    /// A completion call failed for one model
    #[error("Request to model '{model}' failed: {cause}")]
    RequestFailed { model: String, cause: CallError },

    /// The cost/stats lookup failed for one completed request
    #[error("Cost and stats unavailable for request '{request_id}': {cause}")]
    StatsUnavailable { request_id: String, cause: CallError },

    /// None of the configured credential sources is set
    #[error("API key not set: {0}")]
    CredentialMissing(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Caller supplied an unusable request
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The unit of work was cancelled before it settled
    #[error("Cancelled before completion")]
    Cancelled,

    /// A unit of work panicked or its task was lost
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    pub fn request_failed(model: impl Into<String>, cause: CallError) -> Self {
        Self::RequestFailed {
            model: model.into(),
            cause,
        }
    }

    pub fn stats_unavailable(request_id: impl Into<String>, cause: CallError) -> Self {
        Self::StatsUnavailable {
            request_id: request_id.into(),
            cause,
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Underlying call failure, for the variants that wrap one
    pub fn cause(&self) -> Option<&CallError> {
        match self {
            Self::CatalogUnavailable { cause }
            | Self::RequestFailed { cause, .. }
            | Self::StatsUnavailable { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Short machine-readable tag, used in logs and exports
    pub fn error_type(&self) -> &'static str {
        match self {
            Self::CatalogUnavailable { .. } => "catalog_unavailable",
            Self::RequestFailed { .. } => "request_failed",
            Self::StatsUnavailable { .. } => "stats_unavailable",
            Self::CredentialMissing(_) => "credential_missing",
            Self::Config(_) => "configuration",
            Self::InvalidRequest(_) => "invalid_request",
            Self::Cancelled => "cancelled",
            Self::Internal(_) => "internal",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
        }
    }
}
