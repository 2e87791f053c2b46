//! # Desk Commands
//!
//! Each command is a plain function over the state it needs, returning
//! `Result<T, ApiError>`. The CLI calls them; so would any other front end.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  catalog.rs  list_catalog, select_product          (async, catalog)     │
//! │  cart.rs     get_cart, set_pending_*, commit_line, edit_line,           │
//! │              remove_line, set_bargain, set_final_total,                 │
//! │              set_customer_*, clear_pending, new_bill                    │
//! │  bill.rs     finalize_bill, unfinalize_bill, print_receipt,             │
//! │              send_bill                             (async, exporter)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## State Injection
//! ```rust,ignore
//! // Only needs the cart
//! fn commit_line(cart: &CartState) -> Result<CartResponse, ApiError>
//!
//! // Needs cart and collaborators
//! async fn send_bill(cart: &CartState, services: &ServiceState) -> ...
//! ```

pub mod bill;
pub mod cart;
pub mod catalog;
