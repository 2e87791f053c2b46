//! # Cart Engine
//!
//! The state machine behind the billing screen.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Engine Operations                               │
//! │                                                                         │
//! │  Screen Action            Engine Call              State Change         │
//! │  ─────────────            ───────────              ────────────         │
//! │                                                                         │
//! │  Pick product ──────────► select_candidate() ────► pending = Some(..)   │
//! │  Type Qty ──────────────► set_pending_quantity() ► pending.quantity     │
//! │  Type Discount ─────────► set_pending_discount() ► pending.discount     │
//! │  Click ➕ ──────────────► commit_pending_line() ─► lines.push(line)     │
//! │                                                                         │
//! │  Edit row ──────────────► edit_line() ───────────► line fields          │
//! │  Click 🗑️ ──────────────► remove_line() ─────────► lines.remove(i)      │
//! │  Type Bargain ──────────► set_bargain() ─────────► bargain              │
//! │  Type Total ────────────► set_final_total() ─────► final_total          │
//! │                                                                         │
//! │  Finalize Bill ─────────► finalize() ────────────► Draft → Finalized    │
//! │  ← Edit ────────────────► unfinalize() ──────────► Finalized → Draft    │
//! │                                                                         │
//! │  Every successful mutation ends in recompute(), which refreshes         │
//! │  final_total whenever grand_total moved.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Final Total Override
//! `final_total` starts equal to `grand_total`. The cashier may type over it
//! (rounding ₹1203 down to ₹1200, say). The override survives until a
//! mutation changes `grand_total`, at which point it is reset to the new
//! grand total.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{CartMode, CatalogItem, FinalizedBill, LineEdit, LineItem, PendingLine};
use crate::validation::{
    normalize_phone, validate_amount, validate_cart_size, validate_customer_name,
    validate_quantity, validate_unit_price,
};
use crate::MAX_CART_LINES;

// =============================================================================
// Cart
// =============================================================================

/// The bill being composed at the counter.
///
/// ## Invariants
/// - Every line satisfies `discount + final_price == unit_price`
/// - Every line satisfies `total == final_price × quantity`
/// - Lines keep insertion order; the same product may appear twice
/// - In `Finalized` mode nothing but `unfinalize` changes the cart
#[derive(Debug, Clone)]
pub struct Cart {
    customer_name: String,
    customer_phone: String,
    lines: Vec<LineItem>,
    bargain: Money,
    mode: CartMode,
    pending: Option<PendingLine>,
    final_total: Money,
    /// Grand total observed by the last recompute.
    last_grand_total: Money,
    finalized_at: Option<DateTime<Utc>>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates an empty cart in Draft mode.
    pub fn new() -> Self {
        Cart {
            customer_name: String::new(),
            customer_phone: String::new(),
            lines: Vec::new(),
            bargain: Money::zero(),
            mode: CartMode::Draft,
            pending: None,
            final_total: Money::zero(),
            last_grand_total: Money::zero(),
            finalized_at: None,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn mode(&self) -> CartMode {
        self.mode
    }

    pub fn is_finalized(&self) -> bool {
        self.mode == CartMode::Finalized
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn customer_phone(&self) -> &str {
        &self.customer_phone
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.lines
    }

    /// Looks up a committed line.
    pub fn line(&self, line_id: Uuid) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.id == line_id)
    }

    pub fn bargain(&self) -> Money {
        self.bargain
    }

    /// The staged candidate, if any.
    pub fn pending(&self) -> Option<&PendingLine> {
        self.pending.as_ref()
    }

    pub fn final_total(&self) -> Money {
        self.final_total
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    // =========================================================================
    // Derived Totals
    // =========================================================================

    /// Σ unit_price × quantity, before any discount.
    pub fn actual_amount(&self) -> Money {
        self.lines.iter().map(LineItem::actual_amount).sum()
    }

    /// Σ line totals.
    pub fn subtotal(&self) -> Money {
        self.lines.iter().map(|l| l.total).sum()
    }

    /// Subtotal less bargain, floored at zero.
    pub fn after_bargain(&self) -> Money {
        (self.subtotal() - self.bargain).non_negative()
    }

    /// Amount due before any manual override.
    pub fn grand_total(&self) -> Money {
        self.after_bargain().non_negative()
    }

    /// Total number of pieces across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// All derived values at once.
    pub fn totals(&self) -> CartTotals {
        CartTotals::from(self)
    }

    // =========================================================================
    // Staged Candidate
    // =========================================================================

    /// Stages a catalog item as the pending line.
    ///
    /// Quantity resets to 1 and discount to 0; `lines` is not touched.
    pub fn select_candidate(&mut self, item: &CatalogItem) -> CoreResult<&PendingLine> {
        self.ensure_draft("select a product")?;
        validate_unit_price(item.unit_price)?;
        Ok(self.pending.insert(PendingLine::from_catalog(item)))
    }

    /// Sets the pending quantity. Values outside `1..=999` are rejected.
    pub fn set_pending_quantity(&mut self, quantity: i64) -> CoreResult<()> {
        self.ensure_draft("change the quantity")?;
        validate_quantity(quantity)?;
        let pending = self.pending_mut()?;
        pending.quantity = quantity;
        Ok(())
    }

    /// Sets the pending discount, clamped into `[0, unit_price]`.
    pub fn set_pending_discount(&mut self, discount: Money) -> CoreResult<()> {
        self.ensure_draft("change the discount")?;
        let pending = self.pending_mut()?;
        pending.discount = discount.clamp_to(pending.unit_price);
        pending.final_price = pending.unit_price - pending.discount;
        Ok(())
    }

    /// Drops the staged candidate without committing it.
    pub fn clear_pending(&mut self) -> CoreResult<()> {
        self.ensure_draft("drop the staged product")?;
        self.pending = None;
        Ok(())
    }

    /// Appends the staged candidate to the bill and clears it.
    ///
    /// ## Returns
    /// The id of the new line.
    pub fn commit_pending_line(&mut self) -> CoreResult<Uuid> {
        self.ensure_draft("add a line")?;
        let pending = self.pending.as_ref().ok_or_else(|| ValidationError::Required {
            field: "product".to_string(),
        })?;
        validate_quantity(pending.quantity)?;
        if validate_cart_size(self.lines.len()).is_err() {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_LINES,
            });
        }

        let line = LineItem::from_pending(pending);
        let id = line.id;
        debug!(line_id = %id, product_id = line.product_id, total = %line.total, "Line committed");
        self.lines.push(line);
        self.pending = None;
        self.recompute();
        Ok(id)
    }

    // =========================================================================
    // Committed Lines
    // =========================================================================

    /// Edits one field of a committed line and recomputes what depends on it.
    ///
    /// ## Field Rules
    /// ```text
    /// quantity     → total = final_price × quantity          (1..=999)
    /// discount     → final_price = unit_price − discount      (clamped)
    /// finalPrice   → discount = unit_price − final_price      (clamped)
    /// productName  → display only
    /// ```
    /// Negative money values are rejected; values beyond the unit price are
    /// clamped so the discount/final-price pair always sums to the unit price.
    pub fn edit_line(&mut self, line_id: Uuid, edit: LineEdit) -> CoreResult<&LineItem> {
        self.ensure_draft("edit a line")?;

        // Validate before touching anything.
        match &edit {
            LineEdit::Quantity(qty) => validate_quantity(*qty)?,
            LineEdit::Discount(amount) => validate_amount("discount", *amount)?,
            LineEdit::FinalPrice(amount) => validate_amount("final price", *amount)?,
            LineEdit::ProductName(name) if name.trim().is_empty() => {
                return Err(ValidationError::Required {
                    field: "product name".to_string(),
                }
                .into());
            }
            LineEdit::ProductName(_) => {}
        }

        let index = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or(CoreError::LineNotFound(line_id))?;

        {
            let line = &mut self.lines[index];
            match edit {
                LineEdit::Quantity(qty) => line.quantity = qty,
                LineEdit::Discount(discount) => {
                    line.discount = discount.clamp_to(line.unit_price);
                    line.final_price = line.unit_price - line.discount;
                }
                LineEdit::FinalPrice(final_price) => {
                    line.final_price = final_price.clamp_to(line.unit_price);
                    line.discount = line.unit_price - line.final_price;
                }
                LineEdit::ProductName(name) => line.product_name = name.trim().to_string(),
            }
            line.recompute_total();
        }

        self.recompute();
        Ok(&self.lines[index])
    }

    /// Removes a committed line.
    pub fn remove_line(&mut self, line_id: Uuid) -> CoreResult<LineItem> {
        self.ensure_draft("remove a line")?;
        let index = self
            .lines
            .iter()
            .position(|l| l.id == line_id)
            .ok_or(CoreError::LineNotFound(line_id))?;
        let removed = self.lines.remove(index);
        self.recompute();
        Ok(removed)
    }

    // =========================================================================
    // Bill-Level Fields
    // =========================================================================

    /// Sets the subtotal-level bargain. Only negatives are rejected; a
    /// bargain larger than the subtotal simply floors `after_bargain` at 0.
    pub fn set_bargain(&mut self, bargain: Money) -> CoreResult<()> {
        self.ensure_draft("change the bargain")?;
        validate_amount("bargain", bargain)?;
        self.bargain = bargain;
        self.recompute();
        Ok(())
    }

    /// Overrides the amount due by hand.
    pub fn set_final_total(&mut self, amount: Money) -> CoreResult<()> {
        self.ensure_draft("change the total")?;
        validate_amount("total", amount)?;
        self.final_total = amount;
        Ok(())
    }

    pub fn set_customer_name(&mut self, name: &str) -> CoreResult<()> {
        self.ensure_draft("change the customer name")?;
        self.customer_name = validate_customer_name(name)?;
        Ok(())
    }

    /// Stores the digits of a mobile number (at most 10).
    pub fn set_customer_phone(&mut self, phone: &str) -> CoreResult<()> {
        self.ensure_draft("change the customer phone")?;
        self.customer_phone = normalize_phone(phone)?;
        Ok(())
    }

    /// Empties the cart for the next customer.
    pub fn reset(&mut self) -> CoreResult<()> {
        self.ensure_draft("start a new bill")?;
        *self = Cart::new();
        Ok(())
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    /// Freezes the cart and returns the bill snapshot for the exporter.
    ///
    /// An empty cart may be finalized; it yields a zero bill.
    pub fn finalize(&mut self) -> CoreResult<FinalizedBill> {
        self.ensure_draft("finalize the bill")?;
        self.mode = CartMode::Finalized;
        self.finalized_at = Some(Utc::now());
        self.pending = None;
        debug!(
            lines = self.lines.len(),
            grand_total = %self.grand_total(),
            final_total = %self.final_total,
            "Bill finalized"
        );
        self.bill()
    }

    /// Returns to Draft mode. Nothing is lost.
    pub fn unfinalize(&mut self) -> CoreResult<()> {
        if self.mode != CartMode::Finalized {
            return Err(CoreError::InvalidState {
                operation: "reopen the bill",
                mode: self.mode,
            });
        }
        self.mode = CartMode::Draft;
        self.finalized_at = None;
        debug!("Bill reopened for editing");
        Ok(())
    }

    /// The frozen bill. Only available while Finalized.
    pub fn bill(&self) -> CoreResult<FinalizedBill> {
        let timestamp = match (self.mode, self.finalized_at) {
            (CartMode::Finalized, Some(at)) => at,
            _ => {
                return Err(CoreError::InvalidState {
                    operation: "export the bill",
                    mode: self.mode,
                })
            }
        };

        Ok(FinalizedBill {
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            lines: self.lines.clone(),
            bargain: self.bargain,
            actual_amount: self.actual_amount(),
            subtotal: self.subtotal(),
            after_bargain: self.after_bargain(),
            grand_total: self.grand_total(),
            final_total: self.final_total,
            timestamp,
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_draft(&self, operation: &'static str) -> CoreResult<()> {
        if self.mode.is_editable() {
            Ok(())
        } else {
            Err(CoreError::InvalidState {
                operation,
                mode: self.mode,
            })
        }
    }

    fn pending_mut(&mut self) -> CoreResult<&mut PendingLine> {
        self.pending.as_mut().ok_or_else(|| {
            ValidationError::Required {
                field: "product".to_string(),
            }
            .into()
        })
    }

    /// Runs after every aggregate-affecting mutation.
    fn recompute(&mut self) {
        let grand_total = self.grand_total();
        if grand_total != self.last_grand_total {
            self.final_total = grand_total;
            self.last_grand_total = grand_total;
        }
    }
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Cart totals summary for the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub actual_amount: Money,
    pub subtotal: Money,
    pub bargain: Money,
    pub after_bargain: Money,
    pub grand_total: Money,
    pub final_total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.lines.len(),
            total_quantity: cart.total_quantity(),
            actual_amount: cart.actual_amount(),
            subtotal: cart.subtotal(),
            bargain: cart.bargain,
            after_bargain: cart.after_bargain(),
            grand_total: cart.grand_total(),
            final_total: cart.final_total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
