//! # API Error Type
//!
//! Unified error type for desk commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Desk                               │
//! │                                                                         │
//! │  Cashier types "remove 1" on a finalized bill                          │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function                                                │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Cart rule? ──── CoreError::InvalidState ───────┐               │  │
//! │  │         │                                       │               │  │
//! │  │         ▼                                       ▼               │  │
//! │  │  Collaborator? ─ ServiceError::Timeout ────── ApiError ────────►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Screen prints:  Error [INVALID_STATE]: Cannot remove a line while     │
//! │                  the bill is finalized                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use dukaan_core::{CoreError, ValidationError};
use dukaan_services::ServiceError;
use serde::Serialize;

/// API error returned from desk commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "INVALID_STATE",
///   "message": "Cannot remove a line while the bill is finalized"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Unknown line row or product id
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Operation not allowed in the current bill mode
    InvalidState,

    /// Cart capacity reached
    CartError,

    /// Catalog or exporter failed
    ExternalService,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::InvalidState => "INVALID_STATE",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::ExternalService => "EXTERNAL_SERVICE",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::LineNotFound(id) => ApiError::not_found("Line", &id.to_string()),
            err @ CoreError::InvalidState { .. } => {
                ApiError::new(ErrorCode::InvalidState, err.to_string())
            }
            err @ CoreError::CartTooLarge { .. } => {
                ApiError::new(ErrorCode::CartError, err.to_string())
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts collaborator errors to API errors.
impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        if err.is_config_error() {
            return ApiError::new(ErrorCode::ConfigError, err.to_string());
        }

        match err {
            ServiceError::SerializationFailed(e) => {
                // Our own payload failed to encode; the cashier cannot fix that.
                tracing::error!("Bill serialization failed: {}", e);
                ApiError::internal("Could not prepare the bill for sending")
            }
            other => {
                let hint = if other.is_transient() {
                    " (try again)"
                } else {
                    ""
                };
                tracing::warn!(error = %other, "Collaborator call failed");
                ApiError::new(ErrorCode::ExternalService, format!("{}{}", other, hint))
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use dukaan_core::CartMode;

    #[test]
    fn test_core_error_codes() {
        let err: ApiError = CoreError::InvalidState {
            operation: "edit a line",
            mode: CartMode::Finalized,
        }
        .into();
        assert_eq!(err.code, ErrorCode::InvalidState);
        assert_eq!(err.message, "Cannot edit a line while the bill is finalized");

        let err: ApiError = CoreError::CartTooLarge { max: 100 }.into();
        assert_eq!(err.code, ErrorCode::CartError);

        let err: ApiError = ValidationError::Negative {
            field: "bargain".into(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_service_error_codes() {
        let err: ApiError = ServiceError::Timeout(10).into();
        assert_eq!(err.code, ErrorCode::ExternalService);
        assert!(err.message.ends_with("(try again)"));

        let err: ApiError = ServiceError::InvalidUrl("nope".into()).into();
        assert_eq!(err.code, ErrorCode::ConfigError);
    }

    #[test]
    fn test_json_shape() {
        let err = ApiError::not_found("Product", "42");
        let json = serde_json::to_string(&err).unwrap();
        assert_eq!(json, r#"{"code":"NOT_FOUND","message":"Product not found: 42"}"#);
    }

    #[test]
    fn test_display() {
        let err = ApiError::validation("quantity must be between 1 and 999");
        assert_eq!(
            err.to_string(),
            "[VALIDATION_ERROR] quantity must be between 1 and 999"
        );
    }
}
