//! # State Module
//!
//! Application state for the desk, split by concern so each command takes
//! only what it needs.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────┐  ┌────────────────────┐  ┌──────────────────┐        │
//! │  │  CartState   │  │   ServiceState     │  │   DeskConfig     │        │
//! │  │              │  │                    │  │                  │        │
//! │  │  Arc<Mutex<  │  │  Arc<dyn Catalog>  │  │  store name      │        │
//! │  │    Cart      │  │  Arc<dyn Exporter> │  │  backend URLs    │        │
//! │  │  >>          │  │                    │  │                  │        │
//! │  └──────────────┘  └────────────────────┘  └──────────────────┘        │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartState: Protected by Arc<Mutex<T>> for exclusive access          │
//! │  • ServiceState: Collaborators are Send + Sync                         │
//! │  • DeskConfig: Read-only after startup                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod services;

pub use cart::{line_at, CartState};
pub use services::ServiceState;
