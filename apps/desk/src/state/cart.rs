//! # Cart State
//!
//! Holds the one cart the desk is working on.
//!
//! ## Thread Safety
//! The cart is wrapped in `Arc<Mutex<T>>` because:
//! 1. Several commands read and modify the same cart
//! 2. Only one command may modify it at a time
//!
//! The lock is never held across an `.await`. Commands that talk to a
//! collaborator copy what they need out of the cart first.
//!
//! ```text
//! send_bill()
//!    │
//!    ├── with_cart(|c| c.bill())      lock, snapshot, unlock
//!    │
//!    └── exporter.export(&bill).await no lock held
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dukaan_core::{Cart, LineItem};

use crate::error::ApiError;

/// Shared cart state.
#[derive(Debug, Clone)]
pub struct CartState {
    cart: Arc<Mutex<Cart>>,
}

impl CartState {
    /// Creates a new empty cart state.
    pub fn new() -> Self {
        CartState {
            cart: Arc::new(Mutex::new(Cart::new())),
        }
    }

    /// Executes a function with read access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|cart| cart.totals());
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    /// Executes a function with write access to the cart.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// cart_state.with_cart_mut(|cart| cart.set_bargain(amount))?;
    /// ```
    pub fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.lock();
        f(&mut cart)
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        // Every cart operation validates before mutating, so a panic
        // mid-command cannot leave a half-applied change behind.
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CartState {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolves a 1-based row number from the bill table to its line.
pub fn line_at(cart: &Cart, row: usize) -> Result<&LineItem, ApiError> {
    row.checked_sub(1)
        .and_then(|index| cart.lines().get(index))
        .ok_or_else(|| {
            ApiError::not_found(
                "Row",
                &format!("{} (bill has {} rows)", row, cart.lines().len()),
            )
        })
}
