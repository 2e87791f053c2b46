//! End-to-end billing flows driven through the desk commands and the
//! line-mode screen, with the in-memory catalog and exporter.

use std::sync::Arc;

use dukaan_core::{CartMode, LineEdit, Money};
use dukaan_desk_lib::commands::{bill, cart, catalog};
use dukaan_desk_lib::error::ErrorCode;
use dukaan_desk_lib::repl::{Desk, Outcome};
use dukaan_desk_lib::state::{CartState, ServiceState};
use dukaan_services::{DeskConfig, RecordingExporter, StaticCatalog};

fn rs(rupees: i64) -> Money {
    Money::from_rupees(rupees)
}

fn services(exporter: &RecordingExporter) -> ServiceState {
    ServiceState::new(
        Arc::new(StaticCatalog::shop_default()),
        Arc::new(exporter.clone()),
    )
}

#[tokio::test]
async fn kurta_bill_from_selection_to_delivery() {
    let exporter = RecordingExporter::new();
    let services = services(&exporter);
    let state = CartState::new();

    // Two kurtas at ₹700 after a ₹99 discount each
    catalog::select_product(&state, &services, 2).await.unwrap();
    cart::set_pending_quantity(&state, 2).unwrap();
    let staged = cart::set_pending_discount(&state, rs(99)).unwrap();
    assert_eq!(staged.pending.as_ref().unwrap().final_price, rs(700));

    let response = cart::commit_line(&state).unwrap();
    assert_eq!(response.lines[0].total, rs(1_400));
    assert_eq!(response.totals.actual_amount, rs(1_598));

    // One dupatta at list price
    catalog::select_product(&state, &services, 3).await.unwrap();
    cart::commit_line(&state).unwrap();

    let response = cart::set_bargain(&state, rs(200)).unwrap();
    assert_eq!(response.totals.subtotal, rs(1_999));
    assert_eq!(response.totals.grand_total, rs(1_799));
    assert_eq!(response.totals.final_total, rs(1_799));

    // Cashier rounds the amount due
    let response = cart::set_final_total(&state, rs(1_750)).unwrap();
    assert_eq!(response.totals.final_total, rs(1_750));
    assert_eq!(response.totals.grand_total, rs(1_799));

    cart::set_customer_name(&state, "Asha Rao").unwrap();
    cart::set_customer_phone(&state, "9876543210").unwrap();

    let finalized = bill::finalize_bill(&state).unwrap();
    assert_eq!(finalized.lines.len(), 2);
    assert_eq!(finalized.final_total, rs(1_750));

    let result = bill::send_bill(&state, &services).await.unwrap();
    assert!(result.success);
    assert_eq!(exporter.export_count(), 1);
    assert_eq!(exporter.exported()[0], finalized);
}

#[tokio::test]
async fn finalized_bill_is_frozen_until_reopened() {
    let exporter = RecordingExporter::new();
    let services = services(&exporter);
    let state = CartState::new();

    catalog::select_product(&state, &services, 5).await.unwrap();
    cart::commit_line(&state).unwrap();
    bill::finalize_bill(&state).unwrap();

    let err = cart::edit_line(&state, 1, LineEdit::Quantity(3)).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    let err = catalog::select_product(&state, &services, 1).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);
    let err = cart::new_bill(&state).unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);

    let response = bill::unfinalize_bill(&state).unwrap();
    assert_eq!(response.mode, CartMode::Draft);

    let response = cart::edit_line(&state, 1, LineEdit::Quantity(3)).unwrap();
    assert_eq!(response.totals.grand_total, rs(3_600));
}

#[tokio::test]
async fn failed_delivery_leaves_bill_finalized() {
    let exporter = RecordingExporter::new();
    exporter.set_fail_on_export(true);
    let services = services(&exporter);
    let state = CartState::new();

    catalog::select_product(&state, &services, 1).await.unwrap();
    cart::commit_line(&state).unwrap();
    cart::set_customer_phone(&state, "9876543210").unwrap();
    bill::finalize_bill(&state).unwrap();

    let err = bill::send_bill(&state, &services).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::ExternalService);
    assert_eq!(cart::get_cart(&state).mode, CartMode::Finalized);

    // Retry once the exporter recovers
    exporter.set_fail_on_export(false);
    let result = bill::send_bill(&state, &services).await.unwrap();
    assert!(result.success);
}

#[tokio::test]
async fn screen_session_prints_bill_and_receipt() {
    let exporter = RecordingExporter::new();
    let desk = Desk::new(DeskConfig::default(), services(&exporter));

    for line in [
        "select 2",
        "qty 2",
        "discount 99",
        "add",
        "bargain 200",
        "customer Asha Rao",
        "phone 9876543210",
    ] {
        desk.handle_line(line).await.unwrap();
    }

    let Outcome::Continue(text) = desk.handle_line("show").await.unwrap() else {
        panic!("expected output");
    };
    assert!(text.contains("Cotton Kurta"));
    assert!(text.contains("Grand total: ₹1200.00"));

    desk.handle_line("finalize").await.unwrap();

    let Outcome::Continue(receipt) = desk.handle_line("receipt").await.unwrap() else {
        panic!("expected output");
    };
    assert!(receipt.contains("Dukaan Garments"));
    assert!(receipt.contains("Asha Rao"));

    let Outcome::Continue(sent) = desk.handle_line("send").await.unwrap() else {
        panic!("expected output");
    };
    assert!(sent.starts_with("Bill sent"));

    let err = desk.handle_line("edit 1 qty 5").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::InvalidState);

    desk.handle_line("unfinalize").await.unwrap();
    let Outcome::Continue(text) = desk.handle_line("new").await.unwrap() else {
        panic!("expected output");
    };
    assert!(text.contains("No products"));
}
