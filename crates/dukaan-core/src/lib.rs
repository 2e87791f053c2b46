//! # dukaan-core: Pure Billing Logic for the Dukaan Desk
//!
//! This crate is the **heart** of the billing desk. It holds the cart engine
//! and every rule about how a bill adds up, with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Dukaan Desk Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Billing Screen / CLI                         │   │
//! │  │    Product row ──► Bill table ──► Totals ──► Finalize / Send   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    Desk Commands (apps/desk)                    │   │
//! │  │    select_product, commit_line, edit_line, finalize_bill, ...  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ dukaan-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ LineItem  │  │   Money   │  │   Cart    │  │   rules   │  │   │
//! │  │   │   Bill    │  │  (paise)  │  │  Totals   │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO FILES                               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              dukaan-services (Collaborator Layer)               │   │
//! │  │           Catalog lookup, bill exporter, configuration          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (CatalogItem, LineItem, FinalizedBill, etc.)
//! - [`money`] - Money type with integer arithmetic (paise, no floats)
//! - [`cart`] - The cart engine and its totals
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//! - [`receipt`] - Plain-text rendering of a finalized bill
//!
//! ## Example Usage
//!
//! ```rust
//! use dukaan_core::{Cart, CatalogItem, Money};
//!
//! let kurta = CatalogItem::new(2, "Cotton Kurta", Money::from_rupees(799));
//!
//! let mut cart = Cart::new();
//! cart.select_candidate(&kurta).unwrap();
//! cart.set_pending_quantity(2).unwrap();
//! cart.set_pending_discount(Money::from_rupees(99)).unwrap();
//! cart.commit_pending_line().unwrap();
//! cart.set_bargain(Money::from_rupees(200)).unwrap();
//!
//! assert_eq!(cart.subtotal(), Money::from_rupees(1_400));
//! assert_eq!(cart.grand_total(), Money::from_rupees(1_200));
//!
//! let bill = cart.finalize().unwrap();
//! assert_eq!(bill.final_total, Money::from_rupees(1_200));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::render_receipt;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed on a single bill.
pub const MAX_CART_LINES: usize = 100;

/// Highest unit price a product may carry (₹1 crore).
///
/// A full bill at this price (100 lines × 999 pieces) stays far inside
/// `i64` paise, so line totals and aggregates never overflow.
pub const MAX_UNIT_PRICE: Money = Money::from_rupees(10_000_000);

/// Maximum quantity on a single line.
///
/// ## Business Reason
/// Catches a slipped finger (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Maximum customer name length, in characters.
pub const MAX_CUSTOMER_NAME_LEN: usize = 100;

/// Digits in an Indian mobile number.
pub const PHONE_DIGITS: usize = 10;
