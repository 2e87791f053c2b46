//! # Bill Exporter
//!
//! Hands a finalized bill to whatever renders and delivers it.
//!
//! ## Export Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Bill Export                                    │
//! │                                                                         │
//! │  Cart (Finalized) ──bill()──► FinalizedBill ──► BillExporter::export()  │
//! │                                                        │                │
//! │               ┌────────────────────────────────────────┤                │
//! │               ▼                                        ▼                │
//! │  ┌──────────────────────────┐          ┌──────────────────────────────┐ │
//! │  │ HttpBillExporter         │          │ RecordingExporter            │ │
//! │  │ POST {base}{bill_path}   │          │ keeps bills in memory        │ │
//! │  │ 2xx  → { filePath }      │          │ offline mode and tests       │ │
//! │  │ else → failed result     │          └──────────────────────────────┘ │
//! │  └──────────────────────────┘                                           │
//! │                                                                         │
//! │  Ok(DeliveryResult)  the collaborator answered (possibly "no")          │
//! │  Err(ServiceError)   it could not be reached or made no sense           │
//! │                                                                         │
//! │  No retries. The cart stays Finalized whatever happens here.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use dukaan_core::{DeliveryResult, FinalizedBill};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{ServiceError, ServiceResult};

// =============================================================================
// Exporter Trait
// =============================================================================

/// Renders and delivers finalized bills.
#[async_trait]
pub trait BillExporter: Send + Sync {
    async fn export(&self, bill: &FinalizedBill) -> ServiceResult<DeliveryResult>;
}

// =============================================================================
// HTTP Exporter
// =============================================================================

/// Success body of the bill endpoint.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SaveBillResponse {
    #[serde(default)]
    file_path: Option<String>,
}

/// POSTs bills to the backend as JSON.
#[derive(Debug, Clone)]
pub struct HttpBillExporter {
    http: Client,
    url: String,
    timeout: Duration,
}

impl HttpBillExporter {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        HttpBillExporter {
            http: Client::new(),
            url: url.into(),
            timeout,
        }
    }

    async fn post(&self, bill: &FinalizedBill) -> ServiceResult<DeliveryResult> {
        let response = self.http.post(&self.url).json(bill).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Ok(DeliveryResult::failed(format!(
                "bill upload failed with HTTP {}: {}",
                status.as_u16(),
                body.trim()
            )));
        }

        // An empty or non-JSON success body still counts as delivered.
        let parsed: SaveBillResponse = serde_json::from_str(&body).unwrap_or_default();
        Ok(DeliveryResult {
            success: true,
            reference: parsed.file_path,
            error: None,
        })
    }
}

#[async_trait]
impl BillExporter for HttpBillExporter {
    async fn export(&self, bill: &FinalizedBill) -> ServiceResult<DeliveryResult> {
        debug!(url = %self.url, lines = bill.lines.len(), "Uploading bill");

        let result = tokio::time::timeout(self.timeout, self.post(bill))
            .await
            .map_err(|_| ServiceError::Timeout(self.timeout.as_secs()))??;

        if result.success {
            info!(reference = ?result.reference, "Bill delivered");
        } else {
            warn!(error = ?result.error, "Bill export refused");
        }
        Ok(result)
    }
}

// =============================================================================
// Recording Exporter
// =============================================================================

#[derive(Debug, Default)]
struct RecordingState {
    bills: Vec<FinalizedBill>,
    fail_on_export: bool,
}

/// In-memory exporter for offline mode and tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingExporter {
    state: Arc<Mutex<RecordingState>>,
}

impl RecordingExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following export fail with [`ServiceError::Rejected`].
    pub fn set_fail_on_export(&self, fail: bool) {
        self.lock().fail_on_export = fail;
    }

    /// Number of bills exported so far.
    pub fn export_count(&self) -> usize {
        self.lock().bills.len()
    }

    /// Copies of every bill exported so far, oldest first.
    pub fn exported(&self) -> Vec<FinalizedBill> {
        self.lock().bills.clone()
    }

    fn lock(&self) -> MutexGuard<'_, RecordingState> {
        // The state stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl BillExporter for RecordingExporter {
    async fn export(&self, bill: &FinalizedBill) -> ServiceResult<DeliveryResult> {
        let mut state = self.lock();

        if state.fail_on_export {
            return Err(ServiceError::Rejected("Bill export declined".to_string()));
        }

        state.bills.push(bill.clone());
        let reference = format!("offline/BILL-{:04}", state.bills.len());
        debug!(reference = %reference, "Bill recorded");
        Ok(DeliveryResult::delivered(reference))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dukaan_core::Money;

    fn empty_bill() -> FinalizedBill {
        FinalizedBill {
            customer_name: "Asha".to_string(),
            customer_phone: "9876543210".to_string(),
            lines: Vec::new(),
            bargain: Money::zero(),
            actual_amount: Money::zero(),
            subtotal: Money::zero(),
            after_bargain: Money::zero(),
            grand_total: Money::zero(),
            final_total: Money::zero(),
            timestamp: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_recording_exporter_records() {
        let exporter = RecordingExporter::new();

        let first = exporter.export(&empty_bill()).await.unwrap();
        let second = exporter.export(&empty_bill()).await.unwrap();

        assert!(first.success);
        assert_eq!(first.reference.as_deref(), Some("offline/BILL-0001"));
        assert_eq!(second.reference.as_deref(), Some("offline/BILL-0002"));
        assert_eq!(exporter.export_count(), 2);
        assert_eq!(exporter.exported()[0].customer_name, "Asha");
    }

    #[tokio::test]
    async fn test_recording_exporter_failure() {
        let exporter = RecordingExporter::new();
        exporter.set_fail_on_export(true);

        let err = exporter.export(&empty_bill()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Rejected(_)));
        assert_eq!(exporter.export_count(), 0);

        exporter.set_fail_on_export(false);
        assert!(exporter.export(&empty_bill()).await.is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let exporter = RecordingExporter::new();
        let handle = exporter.clone();
        exporter.export(&empty_bill()).await.unwrap();
        assert_eq!(handle.export_count(), 1);
    }

    #[test]
    fn test_save_bill_response_shape() {
        let parsed: SaveBillResponse =
            serde_json::from_str(r#"{"filePath":"Bills/bill_42.png"}"#).unwrap();
        assert_eq!(parsed.file_path.as_deref(), Some("Bills/bill_42.png"));

        let parsed: SaveBillResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.file_path.is_none());
    }

    #[tokio::test]
    async fn test_http_exporter_unreachable() {
        let exporter = HttpBillExporter::new(
            "http://127.0.0.1:9/api/Bill/SaveBill",
            Duration::from_secs(2),
        );
        let err = exporter.export(&empty_bill()).await.unwrap_err();
        assert!(err.is_transient());
    }
}
