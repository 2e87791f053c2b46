//! # Catalog Lookup
//!
//! The product list behind the billing screen's dropdown.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Catalog Lookup                                    │
//! │                                                                         │
//! │   desk command                                                          │
//! │        │ list_catalog() / find(id)                                      │
//! │        ▼                                                                │
//! │   ┌──────────────────┐        ┌──────────────────────────────────────┐ │
//! │   │  StaticCatalog   │   or   │  HttpCatalog                         │ │
//! │   │  in memory       │        │  GET {base_url}{catalog_path}        │ │
//! │   └──────────────────┘        │  → [{ "id", "name", "price" }]       │ │
//! │                               └──────────────────────────────────────┘ │
//! │                                                                         │
//! │   The cart engine never sees this module; it receives CatalogItems.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use dukaan_core::validation::validate_unit_price;
use dukaan_core::{CatalogItem, Money};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Lookup Trait
// =============================================================================

/// Read-only source of billable products.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Returns every product that can be billed.
    async fn list_catalog(&self) -> ServiceResult<Vec<CatalogItem>>;

    /// Finds one product by id.
    async fn find(&self, product_id: i64) -> ServiceResult<Option<CatalogItem>> {
        Ok(self
            .list_catalog()
            .await?
            .into_iter()
            .find(|item| item.id == product_id))
    }
}

/// Case-insensitive substring match on the product name, as the dropdown's
/// search box does. A blank query matches everything.
pub fn filter_by_name(items: Vec<CatalogItem>, query: &str) -> Vec<CatalogItem> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return items;
    }
    items
        .into_iter()
        .filter(|item| item.name.to_lowercase().contains(&needle))
        .collect()
}

// =============================================================================
// Static Catalog
// =============================================================================

/// A fixed, in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        StaticCatalog { items }
    }

    /// The garments the billing screen ships with.
    pub fn shop_default() -> Self {
        let rs = Money::from_rupees;
        StaticCatalog::new(vec![
            CatalogItem::new(1, "Banarasi Silk Saree", rs(3_800)),
            CatalogItem::new(2, "Cotton Kurta", rs(799)),
            CatalogItem::new(3, "Fancy Dupatta", rs(599)),
            CatalogItem::new(4, "Designer Lehenga", rs(8_500)),
            CatalogItem::new(5, "Silk Blouse", rs(1_200)),
            CatalogItem::new(6, "Party Wear Dress", rs(2_300)),
        ])
    }

    pub fn items(&self) -> &[CatalogItem] {
        &self.items
    }

    pub fn search(&self, query: &str) -> Vec<CatalogItem> {
        filter_by_name(self.items.clone(), query)
    }
}

#[async_trait]
impl CatalogLookup for StaticCatalog {
    async fn list_catalog(&self) -> ServiceResult<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }
}

// =============================================================================
// HTTP Catalog
// =============================================================================

/// Catalog entry as the backend sends it. `price` is in rupees.
#[derive(Debug, Deserialize)]
struct CatalogEntry {
    id: i64,
    name: String,
    price: serde_json::Number,
}

impl TryFrom<CatalogEntry> for CatalogItem {
    type Error = ServiceError;

    fn try_from(entry: CatalogEntry) -> Result<Self, Self::Error> {
        let price: Money = entry.price.to_string().parse().map_err(|e| {
            ServiceError::DeserializationFailed(format!("product {}: {}", entry.id, e))
        })?;
        validate_unit_price(price).map_err(|e| {
            ServiceError::DeserializationFailed(format!("product {}: {}", entry.id, e))
        })?;
        Ok(CatalogItem::new(entry.id, entry.name, price))
    }
}

/// Catalog fetched from the backend on every call.
#[derive(Debug, Clone)]
pub struct HttpCatalog {
    http: Client,
    url: String,
    timeout: Duration,
}

impl HttpCatalog {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        HttpCatalog {
            http: Client::new(),
            url: url.into(),
            timeout,
        }
    }

    async fn fetch(&self) -> ServiceResult<Vec<CatalogEntry>> {
        let response = self.http.get(&self.url).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::HttpStatus {
                service: "catalog",
                status,
                body,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogLookup for HttpCatalog {
    async fn list_catalog(&self) -> ServiceResult<Vec<CatalogItem>> {
        debug!(url = %self.url, "Fetching catalog");

        let entries = tokio::time::timeout(self.timeout, self.fetch())
            .await
            .map_err(|_| ServiceError::Timeout(self.timeout.as_secs()))?
            .map_err(|e| {
                warn!(error = %e, "Catalog fetch failed");
                e
            })?;

        entries.into_iter().map(CatalogItem::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_shop_default_catalog() {
        let catalog = StaticCatalog::shop_default();
        let items = catalog.list_catalog().await.unwrap();
        assert_eq!(items.len(), 6);

        let kurta = catalog.find(2).await.unwrap().unwrap();
        assert_eq!(kurta.name, "Cotton Kurta");
        assert_eq!(kurta.unit_price, Money::from_rupees(799));

        assert!(catalog.find(99).await.unwrap().is_none());
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = StaticCatalog::shop_default();

        let silk: Vec<i64> = catalog.search("SILK").iter().map(|i| i.id).collect();
        assert_eq!(silk, vec![1, 5]);

        assert_eq!(catalog.search("  ").len(), 6);
        assert!(catalog.search("jeans").is_empty());
    }

    #[test]
    fn test_catalog_entry_conversion() {
        let entries: Vec<CatalogEntry> = serde_json::from_str(
            r#"[{"id":7,"name":"Stole","price":450},{"id":8,"name":"Shawl","price":1299.5}]"#,
        )
        .unwrap();
        let items: Vec<CatalogItem> = entries
            .into_iter()
            .map(CatalogItem::try_from)
            .collect::<ServiceResult<_>>()
            .unwrap();

        assert_eq!(items[0].unit_price, Money::from_rupees(450));
        assert_eq!(items[1].unit_price, Money::from_paise(129_950));
    }

    #[test]
    fn test_catalog_entry_rejects_negative_price() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"id":9,"name":"Refund","price":-10}"#).unwrap();
        assert!(CatalogItem::try_from(entry).is_err());
    }

    #[test]
    fn test_catalog_entry_rejects_price_above_ceiling() {
        let entry: CatalogEntry =
            serde_json::from_str(r#"{"id":10,"name":"Heirloom","price":500000000000000}"#)
                .unwrap();
        let err = CatalogItem::try_from(entry).unwrap_err();
        assert!(matches!(err, ServiceError::DeserializationFailed(_)));
    }

    #[tokio::test]
    async fn test_http_catalog_unreachable() {
        // Port 9 (discard) on localhost is closed in test environments.
        let catalog = HttpCatalog::new("http://127.0.0.1:9/api/Product/List", Duration::from_secs(2));
        let err = catalog.list_catalog().await.unwrap_err();
        assert!(err.is_transient());
    }
}
