//! # Bill Commands
//!
//! Finalizing, reopening, printing and sending the bill.
//!
//! ## Send Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier presses "Send Bill"                                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. Snapshot the finalized bill (lock held only for the copy)           │
//! │       │   Draft? ──► INVALID_STATE                                      │
//! │       ▼                                                                 │
//! │  2. Mobile number has 10 digits?                                        │
//! │       │   No ──► VALIDATION_ERROR                                       │
//! │       ▼                                                                 │
//! │  3. exporter.export(&bill).await                                        │
//! │       │   unreachable / timed out ──► EXTERNAL_SERVICE                  │
//! │       ▼                                                                 │
//! │  4. DeliveryResult { success, reference, error }                        │
//! │                                                                         │
//! │  The cart stays Finalized whatever the outcome.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use dukaan_core::validation::validate_phone_for_delivery;
use dukaan_core::{render_receipt, DeliveryResult, FinalizedBill};
use dukaan_services::DeskConfig;
use tracing::{debug, info, warn};

use crate::commands::cart::CartResponse;
use crate::error::ApiError;
use crate::state::{CartState, ServiceState};

/// Freezes the bill (the "Finalize Bill" button).
pub fn finalize_bill(cart: &CartState) -> Result<FinalizedBill, ApiError> {
    debug!("finalize_bill command");
    let bill = cart.with_cart_mut(|c| c.finalize())?;
    info!(
        lines = bill.lines.len(),
        final_total = %bill.final_total,
        "Bill finalized"
    );
    Ok(bill)
}

/// Reopens a finalized bill for editing (the "← Edit" button).
pub fn unfinalize_bill(cart: &CartState) -> Result<CartResponse, ApiError> {
    debug!("unfinalize_bill command");
    cart.with_cart_mut(|c| {
        c.unfinalize()?;
        Ok::<_, ApiError>(CartResponse::from(&*c))
    })
}

/// Renders the finalized bill as text for the counter printer.
pub fn print_receipt(cart: &CartState, config: &DeskConfig) -> Result<String, ApiError> {
    debug!("print_receipt command");
    let bill = cart.with_cart(|c| c.bill())?;
    Ok(render_receipt(
        &bill,
        config.store_name(),
        config.currency_symbol(),
    ))
}

/// Sends the finalized bill to the customer through the exporter.
pub async fn send_bill(
    cart: &CartState,
    services: &ServiceState,
) -> Result<DeliveryResult, ApiError> {
    debug!("send_bill command");

    let bill = cart.with_cart(|c| c.bill())?;
    validate_phone_for_delivery(&bill.customer_phone)
        .map_err(|_| ApiError::validation("Enter a valid 10-digit mobile number"))?;

    let result = services.exporter.export(&bill).await?;
    if result.success {
        info!(reference = ?result.reference, "Bill sent");
    } else {
        warn!(error = ?result.error, "Bill was not accepted");
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use dukaan_core::{CartMode, CatalogItem, Money};
    use dukaan_services::{RecordingExporter, StaticCatalog};
    use std::sync::Arc;

    fn one_line_cart(phone: &str) -> CartState {
        let cart = CartState::new();
        let item = CatalogItem::new(3, "Fancy Dupatta", Money::from_rupees(599));
        cart.with_cart_mut(|c| {
            c.select_candidate(&item).unwrap();
            c.commit_pending_line().unwrap();
            c.set_customer_phone(phone).unwrap();
        });
        cart
    }

    fn services_with(exporter: &RecordingExporter) -> ServiceState {
        ServiceState::new(
            Arc::new(StaticCatalog::shop_default()),
            Arc::new(exporter.clone()),
        )
    }

    #[tokio::test]
    async fn test_send_requires_finalized_bill() {
        let exporter = RecordingExporter::new();
        let cart = one_line_cart("9876543210");

        let err = send_bill(&cart, &services_with(&exporter)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidState);
        assert_eq!(exporter.export_count(), 0);
    }

    #[tokio::test]
    async fn test_send_requires_ten_digit_phone() {
        let exporter = RecordingExporter::new();
        let cart = one_line_cart("98765");
        finalize_bill(&cart).unwrap();

        let err = send_bill(&cart, &services_with(&exporter)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(exporter.export_count(), 0);
    }

    #[tokio::test]
    async fn test_send_delivers_snapshot() {
        let exporter = RecordingExporter::new();
        let cart = one_line_cart("9876543210");
        let finalized = finalize_bill(&cart).unwrap();

        let result = send_bill(&cart, &services_with(&exporter)).await.unwrap();
        assert!(result.success);
        assert_eq!(exporter.exported(), vec![finalized]);
    }

    #[tokio::test]
    async fn test_failed_export_keeps_bill_finalized() {
        let exporter = RecordingExporter::new();
        exporter.set_fail_on_export(true);
        let cart = one_line_cart("9876543210");
        finalize_bill(&cart).unwrap();

        let err = send_bill(&cart, &services_with(&exporter)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ExternalService);
        assert_eq!(cart.with_cart(|c| c.mode()), CartMode::Finalized);
    }

    #[test]
    fn test_receipt_uses_store_name() {
        let cart = one_line_cart("9876543210");
        assert!(print_receipt(&cart, &DeskConfig::default()).is_err());

        finalize_bill(&cart).unwrap();
        let text = print_receipt(&cart, &DeskConfig::default()).unwrap();
        assert!(text.contains("Dukaan Garments"));
        assert!(text.contains("Fancy Dupatta"));
    }

    #[test]
    fn test_receipt_uses_configured_currency_symbol() {
        let cart = one_line_cart("9876543210");
        finalize_bill(&cart).unwrap();

        let mut config = DeskConfig::default();
        config.store.currency_symbol = "Rs. ".to_string();
        let text = print_receipt(&cart, &config).unwrap();
        assert!(text.contains("Rs. 599.00"));
        assert!(!text.contains('₹'));
    }
}
