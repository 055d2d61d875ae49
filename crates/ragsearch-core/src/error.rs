//! Error types for ragsearch

use thiserror::Error;

/// Result type alias using RagSearchError
pub type Result<T> = std::result::Result<T, RagSearchError>;

/// Error type alias for convenience
pub type Error = RagSearchError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const CONNECTION_ERROR: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for ragsearch
#[derive(Debug, Error)]
pub enum RagSearchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid search strategy: {0}")]
    InvalidStrategy(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RagSearchError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Http(_) | Self::Retrieval(_) => exit_codes::CONNECTION_ERROR,
            Self::InvalidStrategy(_) | Self::Config(_) => exit_codes::INVALID_INPUT,
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}

/// Failure classes for chat-completion calls.
///
/// Only `RateLimited` is retried; every other kind abandons the current
/// item and lets the pipeline move on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    RateLimited,
    Authentication,
    InvalidRequest,
    Connection,
    Timeout,
    ServiceUnavailable,
    Api,
    Other,
}

/// Error from the chat-completion service, classified for the retry boundary
#[derive(Debug, Error)]
#[error("{kind:?}: {message}")]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Classify a transport-level failure from the HTTP client
    pub fn from_transport(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            GenerationErrorKind::Timeout
        } else if err.is_connect() {
            GenerationErrorKind::Connection
        } else {
            GenerationErrorKind::Other
        };
        Self::new(kind, err.to_string())
    }

    /// Classify a non-success HTTP status from the completion service
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        use reqwest::StatusCode;

        let kind = match status {
            StatusCode::TOO_MANY_REQUESTS => GenerationErrorKind::RateLimited,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationErrorKind::Authentication,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                GenerationErrorKind::InvalidRequest
            }
            StatusCode::SERVICE_UNAVAILABLE => GenerationErrorKind::ServiceUnavailable,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                GenerationErrorKind::Timeout
            }
            _ => GenerationErrorKind::Api,
        };
        Self::new(kind, format!("HTTP {}: {}", status, body))
    }

    /// Whether the retry loop may attempt this call again
    pub fn is_retryable(&self) -> bool {
        self.kind == GenerationErrorKind::RateLimited
    }
}
