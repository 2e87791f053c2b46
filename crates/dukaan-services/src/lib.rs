//! # dukaan-services: Collaborators for the Billing Desk
//!
//! Everything the desk needs from outside the cart engine: the product
//! catalog, somewhere to send finalized bills, and the configuration that
//! says where those live.
//!
//! ## Module Organization
//! - [`catalog`] - `CatalogLookup` trait, static and HTTP catalogs
//! - [`exporter`] - `BillExporter` trait, HTTP and in-memory exporters
//! - [`config`] - `DeskConfig` (defaults, desk.toml, `DUKAAN_*` env)
//! - [`error`] - `ServiceError`
//!
//! ## Wiring
//! ```text
//! DeskConfig ──► build_catalog()  ──► Arc<dyn CatalogLookup>
//!            └─► build_exporter() ──► Arc<dyn BillExporter>
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod exporter;

use std::sync::Arc;

use tracing::info;

pub use catalog::{filter_by_name, CatalogLookup, HttpCatalog, StaticCatalog};
pub use config::{CatalogSource, DeskConfig, ExportMode};
pub use error::{ServiceError, ServiceResult};
pub use exporter::{BillExporter, HttpBillExporter, RecordingExporter};

/// Builds the catalog lookup selected by `config.catalog.source`.
pub fn build_catalog(config: &DeskConfig) -> Arc<dyn CatalogLookup> {
    info!(source = %config.catalog.source, "Catalog source selected");
    match config.catalog.source {
        CatalogSource::Static => Arc::new(StaticCatalog::shop_default()),
        CatalogSource::Http => Arc::new(HttpCatalog::new(config.catalog_url(), config.timeout())),
    }
}

/// Builds the bill exporter selected by `config.export.mode`.
pub fn build_exporter(config: &DeskConfig) -> Arc<dyn BillExporter> {
    info!(mode = %config.export.mode, "Export mode selected");
    match config.export.mode {
        ExportMode::Http => Arc::new(HttpBillExporter::new(config.bill_url(), config.timeout())),
        ExportMode::Offline => Arc::new(RecordingExporter::new()),
    }
}
