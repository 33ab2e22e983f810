//! Error types for the Monocle server

use hyper::StatusCode;
use std::net::SocketAddr;
use thiserror::Error;

/// Errors reported to API callers through the response envelope
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Method not allowed. Use {allowed}.")]
    MethodNotAllowed { allowed: &'static str },

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Validation(String),

    #[error("Request body too large (max {limit} bytes)")]
    PayloadTooLarge { limit: u64 },

    #[error("Failed to read request body: {0}")]
    BodyRead(String),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// HTTP status code carried by this error
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            Self::InvalidBody(_) | Self::Validation(_) | Self::BodyRead(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        }
    }
}

/// Startup and server loop failures
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid listen address '{addr}': {reason}")]
    InvalidAddress { addr: String, reason: String },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Logging setup failed: {0}")]
    Logging(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_not_allowed_message() {
        let err = ApiError::MethodNotAllowed { allowed: "POST" };
        assert_eq!(err.to_string(), "Method not allowed. Use POST.");
        assert_eq!(err.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::validation("amount must be greater than zero").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidBody("eof".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::PayloadTooLarge { limit: 16 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
    }

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = ApiError::validation("Missing required fields");
        assert_eq!(err.to_string(), "Missing required fields");
    }
}
