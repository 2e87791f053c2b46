//! # Service Error Types
//!
//! Error types for calls to the outside world.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Service Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │     Payload             │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Connection     │  │  Serialization          │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  Deserialization        │ │
//! │  │  ConfigLoad     │  │  HttpStatus     │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  None of these are retried. The cashier sees the message and decides.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Result type alias for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// A catalog, exporter or configuration failure.
#[derive(Debug, Error)]
pub enum ServiceError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid desk configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid backend URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// Could not reach the collaborator.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The collaborator did not answer in time.
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// The collaborator answered with a non-success status.
    #[error("{service} returned HTTP {status}: {body}")]
    HttpStatus {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// The collaborator refused the request.
    #[error("{0}")]
    Rejected(String),

    // =========================================================================
    // Payload Errors
    // =========================================================================
    /// Failed to encode a request body.
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Failed to decode a response body.
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::DeserializationFailed(err.to_string())
    }
}

impl From<url::ParseError> for ServiceError {
    fn from(err: url::ParseError) -> Self {
        ServiceError::InvalidUrl(err.to_string())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ServiceError::DeserializationFailed(err.to_string())
        } else if err.is_builder() {
            ServiceError::InvalidUrl(err.to_string())
        } else {
            ServiceError::ConnectionFailed(err.to_string())
        }
    }
}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for ServiceError {
    fn from(err: toml::de::Error) -> Self {
        ServiceError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ServiceError {
    fn from(err: toml::ser::Error) -> Self {
        ServiceError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl ServiceError {
    /// Returns true if the cashier can reasonably try the same action again.
    ///
    /// Nothing here retries automatically; this only shapes the message.
    pub fn is_transient(&self) -> bool {
        match self {
            ServiceError::ConnectionFailed(_) | ServiceError::Timeout(_) => true,
            ServiceError::HttpStatus { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ServiceError::InvalidConfig(_)
                | ServiceError::InvalidUrl(_)
                | ServiceError::ConfigLoadFailed(_)
                | ServiceError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_errors() {
        assert!(ServiceError::ConnectionFailed("refused".into()).is_transient());
        assert!(ServiceError::Timeout(10).is_transient());
        assert!(ServiceError::HttpStatus {
            service: "catalog",
            status: 503,
            body: String::new(),
        }
        .is_transient());

        assert!(!ServiceError::HttpStatus {
            service: "catalog",
            status: 404,
            body: String::new(),
        }
        .is_transient());
        assert!(!ServiceError::InvalidConfig("bad".into()).is_transient());
    }

    #[test]
    fn test_config_errors() {
        assert!(ServiceError::InvalidUrl("x".into()).is_config_error());
        assert!(!ServiceError::Timeout(5).is_config_error());
    }

    #[test]
    fn test_error_display() {
        let err = ServiceError::HttpStatus {
            service: "bill exporter",
            status: 500,
            body: "boom".into(),
        };
        assert_eq!(err.to_string(), "bill exporter returned HTTP 500: boom");
    }
}
