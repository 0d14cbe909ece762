//! Error types and the HTTP status mapping for the explorer service

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for the explorer service
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Client input that cannot be served
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// The requested thing does not exist (e.g. no route between two points)
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Transport failure, timeout or non-2xx status from a provider
    #[error("Upstream unavailable: {message}")]
    Upstream { message: String },

    /// A provider answered, but with a body we could not use
    #[error("Malformed upstream data: {message}")]
    UpstreamData { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    /// Anything else
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ExplorerError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new malformed-upstream-data error
    pub fn upstream_data<S: Into<String>>(message: S) -> Self {
        Self::UpstreamData {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// HTTP status this error is reported with
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExplorerError::Validation { .. } => StatusCode::BAD_REQUEST,
            ExplorerError::NotFound { .. } => StatusCode::NOT_FOUND,
            ExplorerError::Upstream { .. } | ExplorerError::UpstreamData { .. } => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ExplorerError::Config { .. }
            | ExplorerError::Io { .. }
            | ExplorerError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a user-friendly error message. Internal faults never leak their detail.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::Validation { message }
            | ExplorerError::NotFound { message }
            | ExplorerError::Upstream { message }
            | ExplorerError::UpstreamData { message } => message.clone(),
            ExplorerError::Config { .. }
            | ExplorerError::Io { .. }
            | ExplorerError::Internal { .. } => "Internal server error".to_string(),
        }
    }
}

impl From<reqwest::Error> for ExplorerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ExplorerError::upstream_data(err.to_string())
        } else {
            ExplorerError::upstream(err.to_string())
        }
    }
}

impl From<reqwest_middleware::Error> for ExplorerError {
    fn from(err: reqwest_middleware::Error) -> Self {
        match err {
            reqwest_middleware::Error::Reqwest(err) => err.into(),
            reqwest_middleware::Error::Middleware(err) => ExplorerError::upstream(err.to_string()),
        }
    }
}
