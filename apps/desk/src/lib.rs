//! # Dukaan Desk Library
//!
//! Core library for the Dukaan billing desk.
//! Wires configuration, collaborators and the cart, then runs the
//! line-oriented billing screen.
//!
//! ## Module Organization
//! ```text
//! dukaan_desk_lib/
//! ├── lib.rs          ◄─── You are here (logging & input loop)
//! ├── repl.rs         ◄─── Text commands and bill rendering
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── Cart state management
//! │   └── services.rs ◄─── Catalog lookup + bill exporter
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── catalog.rs  ◄─── Product list/select commands
//! │   ├── cart.rs     ◄─── Cart manipulation commands
//! │   └── bill.rs     ◄─── Finalize/receipt/send commands
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod repl;
pub mod state;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn, Subscriber};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use repl::{Desk, Outcome};

const PROMPT: &str = "dukaan> ";

/// Runs the billing screen on stdin/stdout until `quit` or end of input.
///
/// ## Loop
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  print prompt ──► read line ──► Desk::handle_line                       │
/// │       ▲                              │                                  │
/// │       │            Ok(Continue(text)) ──► print text                    │
/// │       │            Err(ApiError)      ──► print "Error [CODE]: message" │
/// │       └──────────────────────────────┘                                  │
/// │                    Ok(Quit) / EOF     ──► return                        │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run(desk: Desk) -> std::io::Result<()> {
    info!(store = desk.config.store_name(), "Billing desk ready");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    stdout
        .write_all(format!("{}\nType 'help' for commands.\n", desk.config.store_name()).as_bytes())
        .await?;

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match desk.handle_line(&line).await {
            Ok(Outcome::Continue(text)) => {
                stdout.write_all(text.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
            }
            Ok(Outcome::Quit) => break,
            Err(err) => {
                warn!(code = err.code.as_str(), "Command rejected");
                stdout
                    .write_all(format!("Error [{}]: {}\n", err.code.as_str(), err.message).as_bytes())
                    .await?;
            }
        }
    }

    info!("Billing desk closed");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so they never interleave with the bill on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=dukaan=trace` - Show trace for dukaan crates only
/// - Default: INFO level, DEBUG for dukaan crates, WARN for reqwest
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    subscriber(filter).init();
}

const DEFAULT_LOG_FILTER: &str = "info,dukaan=debug,reqwest=warn";

fn subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_filter_decides_what_is_logged() {
        tracing::subscriber::with_default(subscriber(EnvFilter::new("warn")), || {
            assert!(tracing::enabled!(Level::WARN));
            assert!(!tracing::enabled!(Level::INFO));
            assert!(!tracing::enabled!(Level::DEBUG));
        });
    }

    #[test]
    fn test_default_filter_levels() {
        tracing::subscriber::with_default(subscriber(EnvFilter::new(DEFAULT_LOG_FILTER)), || {
            assert!(tracing::enabled!(target: "dukaan_core::cart", Level::DEBUG));
            assert!(!tracing::enabled!(target: "dukaan_core::cart", Level::TRACE));
            assert!(!tracing::enabled!(target: "reqwest::connect", Level::INFO));
            assert!(!tracing::enabled!(target: "hyper::proto", Level::DEBUG));
        });
    }
}
