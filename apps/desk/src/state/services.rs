//! # Service State
//!
//! The collaborators the desk talks to, behind their traits so tests can
//! swap in in-memory versions.

use std::sync::Arc;

use dukaan_services::{build_catalog, build_exporter, BillExporter, CatalogLookup, DeskConfig};

#[derive(Clone)]
pub struct ServiceState {
    pub catalog: Arc<dyn CatalogLookup>,
    pub exporter: Arc<dyn BillExporter>,
}

impl ServiceState {
    pub fn new(catalog: Arc<dyn CatalogLookup>, exporter: Arc<dyn BillExporter>) -> Self {
        ServiceState { catalog, exporter }
    }

    /// Wires the catalog and exporter selected in the configuration.
    pub fn from_config(config: &DeskConfig) -> Self {
        ServiceState::new(build_catalog(config), build_exporter(config))
    }
}

impl std::fmt::Debug for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState").finish_non_exhaustive()
    }
}
