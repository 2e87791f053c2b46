//! # Billing Screen (line mode)
//!
//! A text stand-in for the billing screen. Each input line is one action.
//!
//! ```text
//! dukaan> select 2
//! dukaan> qty 2
//! dukaan> discount 99
//! dukaan> add
//! dukaan> bargain 200
//! dukaan> phone 9876543210
//! dukaan> finalize
//! dukaan> send
//! ```

use std::fmt::Write;
use std::str::FromStr;

use dukaan_core::{CatalogItem, LineEdit, Money};
use dukaan_services::DeskConfig;

use crate::commands::{bill, cart, catalog};
use crate::commands::cart::CartResponse;
use crate::error::ApiError;
use crate::state::{CartState, ServiceState};

pub const HELP: &str = "\
Commands:
  catalog [query]            list products (optionally filtered by name)
  select <id>                stage a product in the add row
  qty <n>                    quantity for the staged product
  discount <amount>          per-piece discount for the staged product
  add                        add the staged product to the bill
  cancel                     drop the staged product
  edit <row> <field> <value> field: quantity | discount | finalPrice | productName
  remove <row>               remove a line from the bill
  bargain <amount>           discount on the whole bill
  total <amount>             type the amount due by hand
  customer <name>            customer name
  phone <digits>             customer mobile number
  show                       show the bill
  finalize                   freeze the bill
  unfinalize                 reopen the bill for editing
  receipt                    print the finalized bill
  send                       send the finalized bill to the customer
  new                        start a new bill
  help                       this text
  quit                       leave";

// =============================================================================
// Parsing
// =============================================================================

/// One line of cashier input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeskCommand {
    Catalog(Option<String>),
    Select(i64),
    Quantity(i64),
    Discount(Money),
    Add,
    Cancel,
    Edit { row: usize, edit: LineEdit },
    Remove(usize),
    Bargain(Money),
    Total(Money),
    Customer(String),
    Phone(String),
    Show,
    Finalize,
    Unfinalize,
    Receipt,
    Send,
    New,
    Help,
    Quit,
}

impl FromStr for DeskCommand {
    type Err = ApiError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "catalog" | "products" | "ls" => {
                DeskCommand::Catalog((!rest.is_empty()).then(|| rest.to_string()))
            }
            "select" | "pick" => DeskCommand::Select(parse_int(rest, "product id")?),
            "qty" | "quantity" => DeskCommand::Quantity(parse_int(rest, "quantity")?),
            "discount" => DeskCommand::Discount(parse_money(rest)?),
            "add" | "+" => DeskCommand::Add,
            "cancel" => DeskCommand::Cancel,
            "edit" => {
                let mut parts = rest.splitn(3, char::is_whitespace);
                let row = parse_row(parts.next().unwrap_or(""))?;
                let field = parts.next().unwrap_or("");
                let value = parts.next().unwrap_or("").trim();
                if field.is_empty() || value.is_empty() {
                    return Err(ApiError::validation("usage: edit <row> <field> <value>"));
                }
                DeskCommand::Edit {
                    row,
                    edit: LineEdit::parse(field, value)?,
                }
            }
            "remove" | "rm" | "delete" => DeskCommand::Remove(parse_row(rest)?),
            "bargain" => DeskCommand::Bargain(parse_money(rest)?),
            "total" => DeskCommand::Total(parse_money(rest)?),
            "customer" | "name" => DeskCommand::Customer(rest.to_string()),
            "phone" | "mobile" => DeskCommand::Phone(rest.to_string()),
            "show" | "bill" => DeskCommand::Show,
            "finalize" => DeskCommand::Finalize,
            "unfinalize" | "reopen" => DeskCommand::Unfinalize,
            "receipt" | "print" => DeskCommand::Receipt,
            "send" => DeskCommand::Send,
            "new" => DeskCommand::New,
            "help" | "?" => DeskCommand::Help,
            "quit" | "exit" | "q" => DeskCommand::Quit,
            "" => return Err(ApiError::validation("type a command, or 'help'")),
            other => {
                return Err(ApiError::validation(format!(
                    "unknown command '{}', type 'help'",
                    other
                )))
            }
        };

        Ok(command)
    }
}

fn parse_int(value: &str, field: &str) -> Result<i64, ApiError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| ApiError::validation(format!("{} must be a whole number", field)))
}

fn parse_row(value: &str) -> Result<usize, ApiError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| ApiError::validation("row must be a positive number"))
}

fn parse_money(value: &str) -> Result<Money, ApiError> {
    Ok(value.parse::<Money>()?)
}

// =============================================================================
// Execution
// =============================================================================

/// What the desk should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this and wait for the next line.
    Continue(String),
    Quit,
}

/// Everything a command may touch.
#[derive(Debug, Clone)]
pub struct Desk {
    pub cart: CartState,
    pub services: ServiceState,
    pub config: DeskConfig,
}

impl Desk {
    pub fn new(config: DeskConfig, services: ServiceState) -> Self {
        Desk {
            cart: CartState::new(),
            services,
            config,
        }
    }

    /// Parses and runs one line of input.
    pub async fn handle_line(&self, line: &str) -> Result<Outcome, ApiError> {
        let command = line.parse::<DeskCommand>()?;
        self.execute(command).await
    }

    pub async fn execute(&self, command: DeskCommand) -> Result<Outcome, ApiError> {
        let text = match command {
            DeskCommand::Catalog(query) => {
                let items = catalog::list_catalog(&self.services, query.as_deref()).await?;
                render_catalog(&items, self.config.currency_symbol())
            }
            DeskCommand::Select(id) => {
                self.show(&catalog::select_product(&self.cart, &self.services, id).await?)
            }
            DeskCommand::Quantity(qty) => self.show(&cart::set_pending_quantity(&self.cart, qty)?),
            DeskCommand::Discount(amount) => {
                self.show(&cart::set_pending_discount(&self.cart, amount)?)
            }
            DeskCommand::Add => self.show(&cart::commit_line(&self.cart)?),
            DeskCommand::Cancel => self.show(&cart::clear_pending(&self.cart)?),
            DeskCommand::Edit { row, edit } => self.show(&cart::edit_line(&self.cart, row, edit)?),
            DeskCommand::Remove(row) => self.show(&cart::remove_line(&self.cart, row)?),
            DeskCommand::Bargain(amount) => self.show(&cart::set_bargain(&self.cart, amount)?),
            DeskCommand::Total(amount) => self.show(&cart::set_final_total(&self.cart, amount)?),
            DeskCommand::Customer(name) => {
                self.show(&cart::set_customer_name(&self.cart, &name)?)
            }
            DeskCommand::Phone(phone) => {
                self.show(&cart::set_customer_phone(&self.cart, &phone)?)
            }
            DeskCommand::Show => self.show(&cart::get_cart(&self.cart)),
            DeskCommand::Finalize => {
                let finalized = bill::finalize_bill(&self.cart)?;
                format!(
                    "Bill finalized. Amount due {}. Type 'receipt' to print or 'send' to deliver.",
                    finalized.final_total.format_with(self.config.currency_symbol())
                )
            }
            DeskCommand::Unfinalize => self.show(&bill::unfinalize_bill(&self.cart)?),
            DeskCommand::Receipt => bill::print_receipt(&self.cart, &self.config)?,
            DeskCommand::Send => {
                let result = bill::send_bill(&self.cart, &self.services).await?;
                match (result.success, result.reference, result.error) {
                    (true, Some(reference), _) => format!("Bill sent ({})", reference),
                    (true, None, _) => "Bill sent".to_string(),
                    (false, _, error) => format!(
                        "Bill was not sent: {}",
                        error.unwrap_or_else(|| "no reason given".to_string())
                    ),
                }
            }
            DeskCommand::New => self.show(&cart::new_bill(&self.cart)?),
            DeskCommand::Help => HELP.to_string(),
            DeskCommand::Quit => return Ok(Outcome::Quit),
        };

        Ok(Outcome::Continue(text))
    }

    fn show(&self, cart: &CartResponse) -> String {
        render_cart(cart, self.config.currency_symbol())
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn render_catalog(items: &[CatalogItem], symbol: &str) -> String {
    if items.is_empty() {
        return "No products".to_string();
    }
    let mut out = String::new();
    for item in items {
        let _ = writeln!(out, "{:>4}  {:<24} {:>11}", item.id, item.name, item.unit_price.format_with(symbol));
    }
    out.trim_end().to_string()
}

/// The bill table with row numbers, the staged product and the totals.
pub fn render_cart(cart: &CartResponse, symbol: &str) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Bill ({})", cart.mode);
    if !cart.customer_name.is_empty() || !cart.customer_phone.is_empty() {
        let _ = writeln!(out, "Customer: {}  Mobile: {}", cart.customer_name, cart.customer_phone);
    }

    if cart.lines.is_empty() {
        let _ = writeln!(out, "  No products");
    } else {
        let _ = writeln!(
            out,
            "{:>3}  {:>4}  {:<20} {:>10} {:>10} {:>10} {:>11}",
            "#", "Qty", "Product", "Rate", "Discount", "Final", "Total"
        );
        for (index, line) in cart.lines.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}  {:>4}  {:<20} {:>10} {:>10} {:>10} {:>11}",
                index + 1,
                line.quantity,
                line.product_name,
                line.unit_price.format_with(symbol),
                line.discount.format_with(symbol),
                line.final_price.format_with(symbol),
                line.total.format_with(symbol)
            );
        }
    }

    if let Some(pending) = &cart.pending {
        let _ = writeln!(
            out,
            "Adding: {} × {} at {} (discount {})",
            pending.quantity,
            pending.product_name,
            pending.final_price.format_with(symbol),
            pending.discount.format_with(symbol)
        );
    }

    let totals = &cart.totals;
    let _ = writeln!(out, "Actual:  {}", totals.actual_amount.format_with(symbol));
    let _ = writeln!(out, "Subtotal: {}", totals.subtotal.format_with(symbol));
    let _ = writeln!(out, "Bargain: {}", totals.bargain.format_with(symbol));
    let _ = writeln!(out, "Grand total: {}", totals.grand_total.format_with(symbol));
    let _ = write!(out, "Total due: {}", totals.final_total.format_with(symbol));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use dukaan_services::{RecordingExporter, StaticCatalog};
    use std::sync::Arc;

    fn desk() -> Desk {
        Desk::new(
            DeskConfig::default(),
            ServiceState::new(
                Arc::new(StaticCatalog::shop_default()),
                Arc::new(RecordingExporter::new()),
            ),
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!("select 2".parse::<DeskCommand>().unwrap(), DeskCommand::Select(2));
        assert_eq!(
            "discount 99.50".parse::<DeskCommand>().unwrap(),
            DeskCommand::Discount(Money::from_paise(9_950))
        );
        assert_eq!(
            "edit 1 finalPrice 650".parse::<DeskCommand>().unwrap(),
            DeskCommand::Edit {
                row: 1,
                edit: LineEdit::FinalPrice(Money::from_rupees(650))
            }
        );
        assert_eq!(
            "edit 2 name Kurta (XL)".parse::<DeskCommand>().unwrap(),
            DeskCommand::Edit {
                row: 2,
                edit: LineEdit::ProductName("Kurta (XL)".to_string())
            }
        );
        assert_eq!(
            "customer  Asha Rao ".parse::<DeskCommand>().unwrap(),
            DeskCommand::Customer("Asha Rao".to_string())
        );
        assert_eq!("catalog".parse::<DeskCommand>().unwrap(), DeskCommand::Catalog(None));
        assert_eq!("QUIT".parse::<DeskCommand>().unwrap(), DeskCommand::Quit);
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "dance", "qty two", "edit 1", "edit x qty 2", "bargain 1.234"] {
            let err = bad.parse::<DeskCommand>().unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationError, "input {:?}", bad);
        }
    }

    #[tokio::test]
    async fn test_session_shows_rows() {
        let desk = desk();
        desk.handle_line("select 2").await.unwrap();
        desk.handle_line("qty 2").await.unwrap();
        desk.handle_line("discount 99").await.unwrap();

        let Outcome::Continue(text) = desk.handle_line("add").await.unwrap() else {
            panic!("expected output");
        };
        assert!(text.contains("Cotton Kurta"));
        assert!(text.contains("₹1400.00"));

        let outcome = desk.handle_line("quit").await.unwrap();
        assert_eq!(outcome, Outcome::Quit);
    }

    #[tokio::test]
    async fn test_amounts_use_configured_symbol() {
        let mut config = DeskConfig::default();
        config.store.currency_symbol = "Rs. ".to_string();
        let desk = Desk::new(config, desk().services);

        desk.handle_line("select 3").await.unwrap();
        let Outcome::Continue(text) = desk.handle_line("add").await.unwrap() else {
            panic!("expected output");
        };
        assert!(text.contains("Rs. 599.00"));
        assert!(!text.contains('₹'));
    }

    #[tokio::test]
    async fn test_catalog_output() {
        let desk = desk();
        let Outcome::Continue(text) = desk.handle_line("catalog silk").await.unwrap() else {
            panic!("expected output");
        };
        assert!(text.contains("Banarasi Silk Saree"));
        assert!(text.contains("Silk Blouse"));
        assert!(!text.contains("Kurta"));

        let Outcome::Continue(text) = desk.handle_line("catalog denim").await.unwrap() else {
            panic!("expected output");
        };
        assert_eq!(text, "No products");
    }
}
