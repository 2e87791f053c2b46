//! # Catalog Commands
//!
//! Product dropdown: list, search, and stage a product for the bill.

use dukaan_core::CatalogItem;
use dukaan_services::filter_by_name;
use tracing::debug;

use crate::commands::cart::CartResponse;
use crate::error::ApiError;
use crate::state::{CartState, ServiceState};

/// Lists catalog products, optionally filtered by a name fragment.
///
/// ## Arguments
/// * `query` - Case-insensitive substring of the product name
pub async fn list_catalog(
    services: &ServiceState,
    query: Option<&str>,
) -> Result<Vec<CatalogItem>, ApiError> {
    debug!(?query, "list_catalog command");
    let items = services.catalog.list_catalog().await?;
    Ok(match query {
        Some(query) => filter_by_name(items, query),
        None => items,
    })
}

/// Stages a catalog product in the "add product" row.
///
/// ## User Workflow
/// ```text
/// Pick "Cotton Kurta" in the dropdown
///      │
///      ▼
/// select_product(2)
///      │
///      ├── catalog lookup (no cart lock held)
///      │
///      └── cart.select_candidate(item)  → Qty 1, Discount 0, Final ₹799.00
/// ```
pub async fn select_product(
    cart: &CartState,
    services: &ServiceState,
    product_id: i64,
) -> Result<CartResponse, ApiError> {
    debug!(product_id, "select_product command");

    let item = services
        .catalog
        .find(product_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &product_id.to_string()))?;

    cart.with_cart_mut(|c| {
        c.select_candidate(&item)?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}
