//! # Receipt Rendering
//!
//! Plain-text rendering of a finalized bill, laid out like the bill table on
//! the billing screen.
//!
//! ```text
//!                        Dukaan Garments
//!   Date: 19-10-2026 14:05
//!   Customer: Asha Rao            Mobile: 9876543210
//!   ----------------------------------------------------------------
//!   Qty  Product                 Rate   Discount      Final      Total
//!   ----------------------------------------------------------------
//!     2  Cotton Kurta         ₹799.00    ₹99.00    ₹700.00  ₹1400.00
//!   ----------------------------------------------------------------
//!                                      Actual Amount:  ₹1598.00
//!                                           Subtotal:  ₹1400.00
//!                                            Bargain:   ₹200.00
//!                                        Grand Total:  ₹1200.00
//! ```
//!
//! A hand-typed final total gets its own row when it differs from the grand
//! total.

use std::fmt::Write;

use crate::money::Money;
use crate::types::FinalizedBill;

const WIDTH: usize = 72;
const NAME_WIDTH: usize = 20;

/// Renders `bill` as a fixed-width text receipt headed by `store_name`,
/// with every amount behind `currency_symbol`.
pub fn render_receipt(bill: &FinalizedBill, store_name: &str, currency_symbol: &str) -> String {
    let rule = "-".repeat(WIDTH);
    let mut out = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{:^width$}", store_name, width = WIDTH);
    let _ = writeln!(out, "Date: {}", bill.timestamp.format("%d-%m-%Y %H:%M"));
    let _ = writeln!(
        out,
        "Customer: {:<30} Mobile: {}",
        display_or_dash(&bill.customer_name),
        display_or_dash(&bill.customer_phone)
    );
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "{:>4}  {:<name$} {:>10} {:>10} {:>10} {:>11}",
        "Qty",
        "Product",
        "Rate",
        "Discount",
        "Final",
        "Total",
        name = NAME_WIDTH
    );
    let _ = writeln!(out, "{}", rule);

    if bill.lines.is_empty() {
        let _ = writeln!(out, "{:^width$}", "No products", width = WIDTH);
    }

    for line in &bill.lines {
        let _ = writeln!(
            out,
            "{:>4}  {:<name$} {:>10} {:>10} {:>10} {:>11}",
            line.quantity,
            truncate(&line.product_name, NAME_WIDTH),
            line.unit_price.format_with(currency_symbol),
            line.discount.format_with(currency_symbol),
            line.final_price.format_with(currency_symbol),
            line.total.format_with(currency_symbol),
            name = NAME_WIDTH
        );
    }

    let _ = writeln!(out, "{}", rule);
    let mut summary = |label: &str, amount: Money| {
        let _ = writeln!(
            out,
            "{:>58} {:>13}",
            format!("{}:", label),
            amount.format_with(currency_symbol)
        );
    };
    summary("Actual Amount", bill.actual_amount);
    summary("Subtotal", bill.subtotal);
    if bill.bargain.is_positive() {
        summary("Bargain", bill.bargain);
    }
    summary("Grand Total", bill.grand_total);
    if bill.final_total != bill.grand_total {
        summary("Final Total", bill.final_total);
    }
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{:^width$}", "Thank you! Visit again.", width = WIDTH);

    out
}

fn display_or_dash(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(max - 1).collect();
        short.push('…');
        short
    }
}
