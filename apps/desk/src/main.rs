//! # Dukaan Desk Entry Point
//!
//! ## Startup Sequence
//! 1. Parse command line
//! 2. Initialize tracing (logging)
//! 3. Load configuration (defaults < desk.toml < DUKAAN_* env)
//! 4. Build catalog lookup and bill exporter from config
//! 5. Run the billing screen

use std::path::PathBuf;

use clap::Parser;
use dukaan_desk_lib::repl::Desk;
use dukaan_desk_lib::state::ServiceState;
use dukaan_services::DeskConfig;

#[derive(Debug, Parser)]
#[command(name = "dukaan-desk", version, about = "Retail billing desk")]
struct Cli {
    /// Path to desk.toml (defaults to the platform config directory)
    #[arg(long, env = "DUKAAN_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    dukaan_desk_lib::init_tracing();

    if let Err(err) = run(cli).await {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = DeskConfig::load(cli.config)?;
    let services = ServiceState::from_config(&config);
    let desk = Desk::new(config, services);

    dukaan_desk_lib::run(desk).await?;
    Ok(())
}
