//! # Validation Module
//!
//! Input validation utilities for the billing desk.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Screen                                                       │
//! │  ├── Digits-only phone input, min="1" on quantity                      │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantities, amounts, customer fields                              │
//! │  └── Runs before any cart state is touched                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Cart engine                                                  │
//! │  └── Clamping and mode gating                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use dukaan_core::validation::{normalize_phone, validate_quantity};
//!
//! validate_quantity(2).unwrap();
//! assert_eq!(normalize_phone("98765-43210").unwrap(), "9876543210");
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{
    MAX_CART_LINES, MAX_CUSTOMER_NAME_LEN, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE, PHONE_DIGITS,
};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1 (never floored silently)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Add Product Row                                                        │
/// │                                                                         │
/// │  Cashier types Qty: 0                                                   │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(0) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty < 1?   → Error: "quantity must be between 1 and 999"     │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       └── OK → pending quantity updated                                │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&qty) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates that an amount is zero or greater.
///
/// ## Example
/// ```rust
/// use dukaan_core::{validation::validate_amount, Money};
///
/// assert!(validate_amount("bargain", Money::from_rupees(200)).is_ok());
/// assert!(validate_amount("bargain", Money::zero()).is_ok());
/// assert!(validate_amount("bargain", Money::from_rupees(-1)).is_err());
/// ```
pub fn validate_amount(field: &str, amount: Money) -> ValidationResult<()> {
    if amount.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog unit price.
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_UNIT_PRICE (₹1 crore)
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    validate_amount("unit price", price)?;

    if price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "unit price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE.rupees(),
        });
    }

    Ok(())
}

// =============================================================================
// Customer Validators
// =============================================================================

/// Validates and trims a customer name.
///
/// ## Rules
/// - May be empty (walk-in customer)
/// - At most 100 characters after trimming
pub fn validate_customer_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.chars().count() > MAX_CUSTOMER_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "customer name".to_string(),
            max: MAX_CUSTOMER_NAME_LEN,
        });
    }

    Ok(name.to_string())
}

/// Normalizes a mobile number to its digits.
///
/// The mobile field only ever holds digits, so separators and spaces are
/// dropped rather than rejected. More than 10 digits is an error.
pub fn normalize_phone(phone: &str) -> ValidationResult<String> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.len() > PHONE_DIGITS {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max: PHONE_DIGITS,
        });
    }

    Ok(digits)
}

/// Validates that a (normalized) phone number can receive a bill.
///
/// ## Rules
/// - Exactly 10 digits
pub fn validate_phone_for_delivery(phone: &str) -> ValidationResult<()> {
    if phone.len() != PHONE_DIGITS || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: format!("must be exactly {} digits", PHONE_DIGITS),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates that one more line fits on the bill.
pub fn validate_cart_size(current_lines: usize) -> ValidationResult<()> {
    if current_lines >= MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
