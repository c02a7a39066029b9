//! Statbench CLI application
//!
//! ```bash
//! statbench run -m openai/gpt-4o-mini -c power_analysis -f json markdown
//! statbench list
//! ```
//!
//! `.env` in the working directory is loaded before configuration, so
//! `OPENROUTER_API_KEY` can live there.

mod args;
mod commands;
mod console;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Run(args) => commands::run::execute(args).await,
        Commands::List { config } => commands::list::execute(config.as_deref()),
    }
}
