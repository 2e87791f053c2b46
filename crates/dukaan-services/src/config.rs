//! # Desk Configuration
//!
//! Configuration management for the billing desk.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     DUKAAN_BACKEND_URL=https://billing.local:7012                      │
//! │     DUKAAN_EXPORT_MODE=offline                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/dukaan/desk.toml (Linux)                                 │
//! │     ~/Library/Application Support/in.dukaan.desk/desk.toml (macOS)     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Built-in catalog, offline export                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # desk.toml
//! [store]
//! name = "Dukaan Garments"
//! currency_symbol = "₹"
//!
//! [backend]
//! base_url = "https://localhost:7012"
//! catalog_path = "/api/Product/List"
//! bill_path = "/api/Bill/SaveBill"
//! timeout_secs = 10
//!
//! [catalog]
//! source = "static"   # static | http
//!
//! [export]
//! mode = "offline"    # http | offline
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Catalog Source
// =============================================================================

/// Where the product dropdown gets its items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSource {
    /// The garments the shop ships with, held in memory.
    #[default]
    Static,

    /// Fetched from the backend on demand.
    Http,
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::Static => write!(f, "static"),
            CatalogSource::Http => write!(f, "http"),
        }
    }
}

impl std::str::FromStr for CatalogSource {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "static" | "builtin" => Ok(CatalogSource::Static),
            "http" | "backend" => Ok(CatalogSource::Http),
            other => Err(ServiceError::InvalidConfig(format!(
                "Unknown catalog source: '{}'. Valid options: static, http",
                other
            ))),
        }
    }
}

// =============================================================================
// Export Mode
// =============================================================================

/// Where finalized bills go when the cashier presses "send".
///
/// ```text
/// HTTP     POST the bill to the backend, which renders and delivers it
/// OFFLINE  keep bills in memory; nothing leaves the machine
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportMode {
    Http,

    #[default]
    Offline,
}

impl std::fmt::Display for ExportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportMode::Http => write!(f, "http"),
            ExportMode::Offline => write!(f, "offline"),
        }
    }
}

impl std::str::FromStr for ExportMode {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" | "backend" => Ok(ExportMode::Http),
            "offline" | "disabled" | "local" => Ok(ExportMode::Offline),
            other => Err(ServiceError::InvalidConfig(format!(
                "Unknown export mode: '{}'. Valid options: http, offline",
                other
            ))),
        }
    }
}

// =============================================================================
// Store Settings
// =============================================================================

/// The shop printed at the top of every bill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_name")]
    pub name: String,

    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
}

fn default_store_name() -> String {
    "Dukaan Garments".to_string()
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

impl Default for StoreSettings {
    fn default() -> Self {
        StoreSettings {
            name: default_store_name(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

// =============================================================================
// Backend Settings
// =============================================================================

/// The backend that serves the catalog and accepts finalized bills.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Scheme, host and port, e.g. `https://localhost:7012`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    #[serde(default = "default_bill_path")]
    pub bill_path: String,

    /// Applied to every request. Must be non-zero.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://localhost:7012".to_string()
}

fn default_catalog_path() -> String {
    "/api/Product/List".to_string()
}

fn default_bill_path() -> String {
    "/api/Bill/SaveBill".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for BackendSettings {
    fn default() -> Self {
        BackendSettings {
            base_url: default_base_url(),
            catalog_path: default_catalog_path(),
            bill_path: default_bill_path(),
            timeout_secs: default_timeout(),
        }
    }
}

impl BackendSettings {
    /// Joins the base URL and an endpoint path.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogSettings {
    #[serde(default)]
    pub source: CatalogSource,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExportSettings {
    #[serde(default)]
    pub mode: ExportMode,
}

// =============================================================================
// Main Desk Configuration
// =============================================================================

/// Complete desk configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeskConfig {
    #[serde(default)]
    pub store: StoreSettings,

    #[serde(default)]
    pub backend: BackendSettings,

    #[serde(default)]
    pub catalog: CatalogSettings,

    #[serde(default)]
    pub export: ExportSettings,
}

impl DeskConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (desk.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ServiceResult<Self> {
        Self::load_with_env(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`DeskConfig::load`] with an explicit environment lookup.
    pub fn load_with_env<F>(config_path: Option<PathBuf>, env: F) -> ServiceResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading desk config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides(env);
        config.validate()?;

        Ok(config)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ServiceResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ServiceError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Desk config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ServiceResult<()> {
        let url = Url::parse(&self.backend.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ServiceError::InvalidUrl(format!(
                "Backend URL must start with http:// or https://, got: {}",
                self.backend.base_url
            )));
        }

        if self.backend.timeout_secs == 0 {
            return Err(ServiceError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.store.name.trim().is_empty() {
            return Err(ServiceError::InvalidConfig(
                "store name must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Applies `DUKAAN_*` overrides.
    fn apply_env_overrides<F>(&mut self, env: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = env("DUKAAN_STORE_NAME") {
            self.store.name = name;
        }

        if let Some(url) = env("DUKAAN_BACKEND_URL") {
            debug!(url = %url, "Overriding backend URL from environment");
            self.backend.base_url = url;
        }

        if let Some(timeout) = env("DUKAAN_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.backend.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring non-numeric DUKAAN_TIMEOUT_SECS"),
            }
        }

        if let Some(source) = env("DUKAAN_CATALOG_SOURCE") {
            match source.parse() {
                Ok(parsed) => {
                    debug!(source = %source, "Overriding catalog source from environment");
                    self.catalog.source = parsed;
                }
                Err(e) => warn!("{}", e),
            }
        }

        if let Some(mode) = env("DUKAAN_EXPORT_MODE") {
            match mode.parse() {
                Ok(parsed) => {
                    debug!(mode = %mode, "Overriding export mode from environment");
                    self.export.mode = parsed;
                }
                Err(e) => warn!("{}", e),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("in", "dukaan", "desk")
            .map(|dirs| dirs.config_dir().join("desk.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn store_name(&self) -> &str {
        &self.store.name
    }

    pub fn currency_symbol(&self) -> &str {
        &self.store.currency_symbol
    }

    pub fn catalog_url(&self) -> String {
        self.backend.endpoint(&self.backend.catalog_path)
    }

    pub fn bill_url(&self) -> String {
        self.backend.endpoint(&self.backend.bill_path)
    }

    pub fn timeout(&self) -> Duration {
        self.backend.timeout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("static".parse::<CatalogSource>().unwrap(), CatalogSource::Static);
        assert_eq!("HTTP".parse::<CatalogSource>().unwrap(), CatalogSource::Http);
        assert!("ftp".parse::<CatalogSource>().is_err());

        assert_eq!("offline".parse::<ExportMode>().unwrap(), ExportMode::Offline);
        assert_eq!("http".parse::<ExportMode>().unwrap(), ExportMode::Http);
        assert!("carrier-pigeon".parse::<ExportMode>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = DeskConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog.source, CatalogSource::Static);
        assert_eq!(config.export.mode, ExportMode::Offline);
        assert_eq!(config.bill_url(), "https://localhost:7012/api/Bill/SaveBill");
        assert_eq!(config.timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_validation() {
        let mut config = DeskConfig::default();

        config.backend.base_url = "ws://localhost:7012".to_string();
        assert!(config.validate().is_err());

        config.backend.base_url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.backend.base_url = "http://127.0.0.1:8080/".to_string();
        assert!(config.validate().is_ok());
        assert_eq!(config.catalog_url(), "http://127.0.0.1:8080/api/Product/List");

        config.backend.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config =
            DeskConfig::load_with_env(Some(dir.path().join("absent.toml")), no_env).unwrap();
        assert_eq!(config.store_name(), "Dukaan Garments");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        std::fs::write(
            &path,
            r#"
[store]
name = "Lakshmi Silks"

[backend]
base_url = "http://10.0.0.5:7012"
timeout_secs = 3

[export]
mode = "http"
"#,
        )
        .unwrap();

        let config = DeskConfig::load_with_env(Some(path), no_env).unwrap();
        assert_eq!(config.store_name(), "Lakshmi Silks");
        assert_eq!(config.store.currency_symbol, "₹");
        assert_eq!(config.backend.timeout_secs, 3);
        assert_eq!(config.backend.bill_path, "/api/Bill/SaveBill");
        assert_eq!(config.export.mode, ExportMode::Http);
        assert_eq!(config.catalog.source, CatalogSource::Static);
    }

    #[test]
    fn test_env_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        std::fs::write(&path, "[store]\nname = \"From File\"\n").unwrap();

        let env = env_from(&[
            ("DUKAAN_STORE_NAME", "From Env"),
            ("DUKAAN_BACKEND_URL", "http://billing.local"),
            ("DUKAAN_TIMEOUT_SECS", "4"),
            ("DUKAAN_CATALOG_SOURCE", "http"),
            ("DUKAAN_EXPORT_MODE", "http"),
        ]);
        let config = DeskConfig::load_with_env(Some(path), env).unwrap();

        assert_eq!(config.store_name(), "From Env");
        assert_eq!(config.backend.base_url, "http://billing.local");
        assert_eq!(config.backend.timeout_secs, 4);
        assert_eq!(config.catalog.source, CatalogSource::Http);
        assert_eq!(config.export.mode, ExportMode::Http);
    }

    #[test]
    fn test_bad_env_values_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let env = env_from(&[
            ("DUKAAN_TIMEOUT_SECS", "soon"),
            ("DUKAAN_EXPORT_MODE", "fax"),
        ]);
        let config =
            DeskConfig::load_with_env(Some(dir.path().join("none.toml")), env).unwrap();
        assert_eq!(config.backend.timeout_secs, 10);
        assert_eq!(config.export.mode, ExportMode::Offline);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("desk.toml");
        std::fs::write(&path, "[backend\nbase_url = ").unwrap();

        let err = DeskConfig::load_with_env(Some(path), no_env).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("desk.toml");

        let mut config = DeskConfig::default();
        config.store.name = "Saved Store".to_string();
        config.save(Some(path.clone())).unwrap();

        let loaded = DeskConfig::load_with_env(Some(path), no_env).unwrap();
        assert_eq!(loaded.store_name(), "Saved Store");
    }
}
