//! # Cart Commands
//!
//! Commands for composing the bill.
//!
//! ## Bill Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Bill Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  Empty   │────►│ Staged   │────►│  Lines   │────►│ Finalized│       │
//! │  │  Bill    │     │ product  │     │ on bill  │     │   Bill   │       │
//! │  └──────────┘     └──────────┘     └──────────┘     └──────────┘       │
//! │                        │                │                 │             │
//! │                 set_pending_*      edit_line        send_bill          │
//! │                 commit_line        remove_line      (bill.rs)          │
//! │                                    set_bargain                         │
//! │                                         │                              │
//! │                                         ▼                              │
//! │                                    new_bill ──────► (back to empty)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use dukaan_core::{Cart, CartMode, CartTotals, LineEdit, LineItem, Money, PendingLine};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{line_at, CartState};

/// Cart response including lines and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub mode: CartMode,
    pub customer_name: String,
    pub customer_phone: String,
    pub pending: Option<PendingLine>,
    pub lines: Vec<LineItem>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            mode: cart.mode(),
            customer_name: cart.customer_name().to_string(),
            customer_phone: cart.customer_phone().to_string(),
            pending: cart.pending().cloned(),
            lines: cart.lines().to_vec(),
            totals: cart.totals(),
        }
    }
}

/// Gets the current bill.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Bill table (always visible on the billing screen)                      │
/// │                                                                         │
/// │  #  Qty  Product          Rate     Discount   Final     Total           │
/// │  1    2  Cotton Kurta     ₹799.00  ₹99.00     ₹700.00   ₹1400.00        │
/// │  ─────────────────────────────────────────────────────────────          │
/// │                               Subtotal              ₹1400.00            │
/// │                               Bargain               ₹200.00             │
/// │                               Total                 ₹1200.00            │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Sets the quantity on the staged product.
pub fn set_pending_quantity(cart: &CartState, quantity: i64) -> Result<CartResponse, ApiError> {
    debug!(quantity, "set_pending_quantity command");
    cart.with_cart_mut(|c| {
        c.set_pending_quantity(quantity)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Sets the per-piece discount on the staged product.
pub fn set_pending_discount(cart: &CartState, discount: Money) -> Result<CartResponse, ApiError> {
    debug!(%discount, "set_pending_discount command");
    cart.with_cart_mut(|c| {
        c.set_pending_discount(discount)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Adds the staged product to the bill (the ➕ button).
pub fn commit_line(cart: &CartState) -> Result<CartResponse, ApiError> {
    debug!("commit_line command");
    cart.with_cart_mut(|c| {
        c.commit_pending_line()?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Drops the staged product.
pub fn clear_pending(cart: &CartState) -> Result<CartResponse, ApiError> {
    debug!("clear_pending command");
    cart.with_cart_mut(|c| {
        c.clear_pending()?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Edits one field of the line at `row` (1-based).
///
/// ## Arguments
/// * `row` - Position in the bill table, starting at 1
/// * `edit` - Field and new value
pub fn edit_line(cart: &CartState, row: usize, edit: LineEdit) -> Result<CartResponse, ApiError> {
    debug!(row, ?edit, "edit_line command");
    cart.with_cart_mut(|c| {
        let line_id = line_at(c, row)?.id;
        c.edit_line(line_id, edit)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Removes the line at `row` (1-based).
pub fn remove_line(cart: &CartState, row: usize) -> Result<CartResponse, ApiError> {
    debug!(row, "remove_line command");
    cart.with_cart_mut(|c| {
        let line_id = line_at(c, row)?.id;
        c.remove_line(line_id)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Sets the bargain taken off the subtotal.
pub fn set_bargain(cart: &CartState, bargain: Money) -> Result<CartResponse, ApiError> {
    debug!(%bargain, "set_bargain command");
    cart.with_cart_mut(|c| {
        c.set_bargain(bargain)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Overrides the amount due by hand.
pub fn set_final_total(cart: &CartState, amount: Money) -> Result<CartResponse, ApiError> {
    debug!(%amount, "set_final_total command");
    cart.with_cart_mut(|c| {
        c.set_final_total(amount)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

pub fn set_customer_name(cart: &CartState, name: &str) -> Result<CartResponse, ApiError> {
    debug!("set_customer_name command");
    cart.with_cart_mut(|c| {
        c.set_customer_name(name)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

pub fn set_customer_phone(cart: &CartState, phone: &str) -> Result<CartResponse, ApiError> {
    debug!("set_customer_phone command");
    cart.with_cart_mut(|c| {
        c.set_customer_phone(phone)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Starts a fresh bill for the next customer.
///
/// Only a draft bill can be discarded; a finalized one must be reopened
/// first so it is not thrown away by accident.
pub fn new_bill(cart: &CartState) -> Result<CartResponse, ApiError> {
    cart.with_cart_mut(|c| {
        c.reset()?;
        info!("New bill started");
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use dukaan_core::CatalogItem;

    fn staged(cart: &CartState, price: i64) {
        let item = CatalogItem::new(1, "Silk Blouse", Money::from_rupees(price));
        cart.with_cart_mut(|c| c.select_candidate(&item).map(|_| ()))
            .unwrap();
    }

    #[test]
    fn test_commit_and_edit_by_row() {
        let cart = CartState::new();
        staged(&cart, 1_200);
        set_pending_quantity(&cart, 2).unwrap();
        let response = commit_line(&cart).unwrap();
        assert_eq!(response.lines.len(), 1);
        assert!(response.pending.is_none());
        assert_eq!(response.totals.subtotal, Money::from_rupees(2_400));

        let response = edit_line(&cart, 1, LineEdit::FinalPrice(Money::from_rupees(1_000))).unwrap();
        assert_eq!(response.lines[0].discount, Money::from_rupees(200));
        assert_eq!(response.totals.grand_total, Money::from_rupees(2_000));
    }

    #[test]
    fn test_unknown_row_is_not_found() {
        let cart = CartState::new();
        let err = remove_line(&cart, 1).unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[test]
    fn test_commit_without_product_is_validation_error() {
        let cart = CartState::new();
        let err = commit_line(&cart).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "product is required");
    }

    #[test]
    fn test_clear_pending_only_in_draft() {
        let cart = CartState::new();
        staged(&cart, 800);
        assert!(clear_pending(&cart).unwrap().pending.is_none());

        cart.with_cart_mut(|c| c.finalize().map(|_| ())).unwrap();
        let err = clear_pending(&cart).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
    }

    #[test]
    fn test_new_bill_clears_everything() {
        let cart = CartState::new();
        staged(&cart, 500);
        commit_line(&cart).unwrap();
        set_customer_name(&cart, "Meena").unwrap();

        let response = new_bill(&cart).unwrap();
        assert!(response.lines.is_empty());
        assert_eq!(response.customer_name, "");
        assert_eq!(response.mode, CartMode::Draft);
    }

    #[test]
    fn test_response_json_is_camel_case() {
        let cart = CartState::new();
        let json = serde_json::to_value(get_cart(&cart)).unwrap();
        assert_eq!(json["mode"], "draft");
        assert!(json["totals"].get("grandTotal").is_some());
        assert!(json.get("customerPhone").is_some());
    }
}
