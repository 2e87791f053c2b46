//! # Domain Types
//!
//! Core domain types used throughout Dukaan billing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  CatalogItem    │   │    LineItem     │   │  FinalizedBill  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  id (UUID)      │──►│  customer       │       │
//! │  │  name           │   │  name snapshot  │   │  lines          │       │
//! │  │  unit_price     │   │  price snapshot │   │  totals         │       │
//! │  └─────────────────┘   │  qty / discount │   │  timestamp      │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   PendingLine   │   │    CartMode     │   │ DeliveryResult  │       │
//! │  │  staged, not    │   │  Draft          │   │  success        │       │
//! │  │  yet committed  │   │  Finalized      │   │  reference      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `LineItem` copies name and unit price from its `CatalogItem` when it is
//! committed. Later catalog changes never reach lines already on the bill.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Catalog Item
// =============================================================================

/// A product that can be billed, as supplied by the catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CatalogItem {
    /// Catalog identifier.
    pub id: i64,

    /// Display name shown in the product dropdown and on the bill.
    pub name: String,

    /// Maximum retail price.
    pub unit_price: Money,
}

impl CatalogItem {
    /// Creates a catalog item.
    pub fn new(id: i64, name: impl Into<String>, unit_price: Money) -> Self {
        CatalogItem {
            id,
            name: name.into(),
            unit_price,
        }
    }
}

// =============================================================================
// Cart Mode
// =============================================================================

/// Whether the bill is still being composed or has been frozen.
///
/// ```text
/// Draft ──finalize()──► Finalized
///   ▲                       │
///   └────unfinalize()───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CartMode {
    /// Lines, customer details and bargain can change.
    #[default]
    Draft,
    /// Frozen for export; only `unfinalize` is accepted.
    Finalized,
}

impl CartMode {
    /// Returns true if lines and customer fields may be mutated.
    pub fn is_editable(&self) -> bool {
        matches!(self, CartMode::Draft)
    }

    /// Returns the mode name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            CartMode::Draft => "draft",
            CartMode::Finalized => "finalized",
        }
    }
}

impl fmt::Display for CartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Pending Line
// =============================================================================

/// The candidate line being configured in the "add product" row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PendingLine {
    pub product_id: i64,
    pub product_name: String,
    pub unit_price: Money,
    pub quantity: i64,
    pub discount: Money,
    pub final_price: Money,
}

impl PendingLine {
    /// Stages a catalog item with quantity 1 and no discount.
    pub fn from_catalog(item: &CatalogItem) -> Self {
        PendingLine {
            product_id: item.id,
            product_name: item.name.clone(),
            unit_price: item.unit_price,
            quantity: 1,
            discount: Money::zero(),
            final_price: item.unit_price,
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A committed line on the bill.
///
/// ## Invariants
/// - `discount + final_price == unit_price`
/// - `0 <= discount <= unit_price`
/// - `total == final_price × quantity`
/// - `quantity >= 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Unique within the cart.
    #[ts(as = "String")]
    pub id: Uuid,

    /// Catalog reference (not owned).
    pub product_id: i64,

    /// Name at time of adding; the cashier may override it for display.
    pub product_name: String,

    /// Unit price at time of adding (frozen).
    pub unit_price: Money,

    pub quantity: i64,
    pub discount: Money,
    pub final_price: Money,
    pub total: Money,
}

impl LineItem {
    /// Commits a staged candidate as a new line.
    ///
    /// The discount is clamped into `[0, unit_price]` again here so a line
    /// can never be committed with an inconsistent price pair.
    pub fn from_pending(pending: &PendingLine) -> Self {
        let discount = pending.discount.clamp_to(pending.unit_price);
        let final_price = pending.unit_price - discount;
        LineItem {
            id: Uuid::new_v4(),
            product_id: pending.product_id,
            product_name: pending.product_name.clone(),
            unit_price: pending.unit_price,
            quantity: pending.quantity,
            discount,
            final_price,
            total: final_price.multiply_quantity(pending.quantity),
        }
    }

    /// Price before any discount, for the "Actual" column.
    #[inline]
    pub fn actual_amount(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Recomputes `total` from `final_price` and `quantity`.
    #[inline]
    pub(crate) fn recompute_total(&mut self) {
        self.total = self.final_price.multiply_quantity(self.quantity);
    }
}

// =============================================================================
// Line Edits
// =============================================================================

/// An edit to one field of a committed line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
#[ts(export)]
pub enum LineEdit {
    /// New quantity; only `total` is recomputed.
    Quantity(i64),
    /// New discount; `final_price` follows.
    Discount(Money),
    /// New final price; `discount` follows.
    FinalPrice(Money),
    /// Display-only rename.
    ProductName(String),
}

impl LineEdit {
    /// Builds an edit from a field name and the raw text typed into it.
    ///
    /// ## Field Names
    /// `quantity` / `qty`, `discount`, `finalPrice` / `final_price` / `final`,
    /// `productName` / `product_name` / `name`.
    ///
    /// ## Example
    /// ```rust
    /// use dukaan_core::{LineEdit, Money};
    ///
    /// let edit = LineEdit::parse("finalPrice", "650").unwrap();
    /// assert_eq!(edit, LineEdit::FinalPrice(Money::from_rupees(650)));
    /// assert!(LineEdit::parse("colour", "red").is_err());
    /// ```
    pub fn parse(field: &str, value: &str) -> Result<Self, ValidationError> {
        match field {
            "quantity" | "qty" => {
                let qty = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| ValidationError::InvalidFormat {
                        field: "quantity".to_string(),
                        reason: "must be a whole number".to_string(),
                    })?;
                Ok(LineEdit::Quantity(qty))
            }
            "discount" => Ok(LineEdit::Discount(value.parse()?)),
            "finalPrice" | "final_price" | "final" => Ok(LineEdit::FinalPrice(value.parse()?)),
            "productName" | "product_name" | "name" => {
                Ok(LineEdit::ProductName(value.to_string()))
            }
            other => Err(ValidationError::InvalidFormat {
                field: "field".to_string(),
                reason: format!(
                    "unknown field '{}'; expected quantity, discount, finalPrice or productName",
                    other
                ),
            }),
        }
    }
}

// =============================================================================
// Finalized Bill
// =============================================================================

/// The frozen snapshot handed to the bill exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct FinalizedBill {
    pub customer_name: String,
    pub customer_phone: String,
    pub lines: Vec<LineItem>,
    pub bargain: Money,
    pub actual_amount: Money,
    pub subtotal: Money,
    pub after_bargain: Money,
    pub grand_total: Money,
    /// What the customer pays; equals `grand_total` unless the cashier
    /// rounded it by hand.
    pub final_total: Money,
    #[ts(as = "String")]
    pub timestamp: DateTime<Utc>,
}

impl FinalizedBill {
    /// Checks if the bill has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// =============================================================================
// Delivery Result
// =============================================================================

/// Outcome reported by the bill exporter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DeliveryResult {
    pub success: bool,
    /// Where the exporter put the bill (file path, URL, message id).
    pub reference: Option<String>,
    pub error: Option<String>,
}

impl DeliveryResult {
    /// A successful delivery.
    pub fn delivered(reference: impl Into<String>) -> Self {
        DeliveryResult {
            success: true,
            reference: Some(reference.into()),
            error: None,
        }
    }

    /// A delivery the collaborator refused.
    pub fn failed(error: impl Into<String>) -> Self {
        DeliveryResult {
            success: false,
            reference: None,
            error: Some(error.into()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn kurta() -> CatalogItem {
        CatalogItem::new(2, "Cotton Kurta", Money::from_rupees(799))
    }

    #[test]
    fn test_cart_mode_default() {
        assert_eq!(CartMode::default(), CartMode::Draft);
        assert!(CartMode::Draft.is_editable());
        assert!(!CartMode::Finalized.is_editable());
    }

    #[test]
    fn test_pending_from_catalog() {
        let pending = PendingLine::from_catalog(&kurta());
        assert_eq!(pending.quantity, 1);
        assert_eq!(pending.discount, Money::zero());
        assert_eq!(pending.final_price, Money::from_rupees(799));
    }

    #[test]
    fn test_line_from_pending_reclamps_discount() {
        let mut pending = PendingLine::from_catalog(&kurta());
        pending.discount = Money::from_rupees(5_000);
        pending.quantity = 2;

        let line = LineItem::from_pending(&pending);
        assert_eq!(line.discount, Money::from_rupees(799));
        assert_eq!(line.final_price, Money::zero());
        assert_eq!(line.total, Money::zero());
        assert_eq!(line.actual_amount(), Money::from_rupees(1_598));
    }

    #[test]
    fn test_line_edit_parse() {
        assert_eq!(LineEdit::parse("qty", "3").unwrap(), LineEdit::Quantity(3));
        assert_eq!(
            LineEdit::parse("discount", "99.50").unwrap(),
            LineEdit::Discount(Money::from_paise(9_950))
        );
        assert_eq!(
            LineEdit::parse("name", "Kurta (L)").unwrap(),
            LineEdit::ProductName("Kurta (L)".to_string())
        );
        assert!(LineEdit::parse("quantity", "two").is_err());
        assert!(LineEdit::parse("discount", "1.234").is_err());
    }

    #[test]
    fn test_line_edit_json_shape() {
        let json = serde_json::to_string(&LineEdit::Quantity(4)).unwrap();
        assert_eq!(json, r#"{"field":"quantity","value":4}"#);
    }

    #[test]
    fn test_delivery_result_constructors() {
        let ok = DeliveryResult::delivered("bills/42.png");
        assert!(ok.success);
        assert_eq!(ok.reference.as_deref(), Some("bills/42.png"));

        let failed = DeliveryResult::failed("upload rejected");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("upload rejected"));
    }
}
