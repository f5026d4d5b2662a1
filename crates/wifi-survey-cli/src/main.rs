//! wifi-survey CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use wifi_survey_cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Scan(args) => wifi_survey_cli::run_scan(&args)?,
        Commands::Aggregate(args) => wifi_survey_cli::run_aggregate(&args)?,
        Commands::Version => {
            println!("wifi-survey {}", env!("CARGO_PKG_VERSION"));
            println!("core module version: {}", wifi_survey_core::VERSION);
        }
    }

    Ok(())
}
