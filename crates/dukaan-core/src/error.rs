//! # Error Types
//!
//! Domain-specific error types for dukaan-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  dukaan-core errors (this file)                                        │
//! │  ├── CoreError        - Cart rule violations, mode gating              │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  dukaan-services errors (separate crate)                               │
//! │  └── ServiceError     - Catalog / exporter / config failures           │
//! │                                                                         │
//! │  desk app errors                                                       │
//! │  └── ApiError         - What the screen sees (code + message)          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → Screen                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line id, field, operation)
//! 3. Errors are enum variants, never String
//! 4. A rejected operation never leaves the cart half-updated

use thiserror::Error;
use uuid::Uuid;

use crate::types::CartMode;

// =============================================================================
// Core Error
// =============================================================================

/// Cart engine errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No committed line carries this id.
    #[error("Line not found: {0}")]
    LineNotFound(Uuid),

    /// Operation is not allowed in the cart's current mode.
    ///
    /// ## When This Occurs
    /// - Adding, editing or removing lines on a finalized bill
    /// - Changing customer details or bargain on a finalized bill
    /// - Asking for the bill snapshot while still drafting
    ///
    /// ## User Workflow
    /// ```text
    /// Finalize Bill
    ///      │
    ///      ▼
    /// remove_line(...)
    ///      │
    ///      ▼
    /// InvalidState { operation: "remove a line", mode: Finalized }
    ///      │
    ///      ▼
    /// UI shows: "Cannot remove a line while the bill is finalized"
    /// ```
    #[error("Cannot {operation} while the bill is {mode}")]
    InvalidState {
        operation: &'static str,
        mode: CartMode,
    },

    /// Cart has reached the maximum number of lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any cart state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required value is missing (e.g. no product staged).
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be zero or greater.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g. unparsable amount, short phone number).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message() {
        let err = CoreError::InvalidState {
            operation: "remove a line",
            mode: CartMode::Finalized,
        };
        assert_eq!(
            err.to_string(),
            "Cannot remove a line while the bill is finalized"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "product".to_string(),
        };
        assert_eq!(err.to_string(), "product is required");

        let err = ValidationError::Negative {
            field: "bargain".to_string(),
        };
        assert_eq!(err.to_string(), "bargain cannot be negative");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "product".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
