//! Ragsearch CLI
//!
//! Multi-strategy corpus search with AI-grounded answers.

use anyhow::Result;
use clap::Parser;
use ragsearch_core::Config;

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Search(args) => commands::search::run(args, config, cli.format).await,
        Commands::Chat(args) => commands::chat::run(args, config).await,
    }
}
