//! DCC character sheet command-line tool.
//!
//! Every command works on the data directory (`~/dcc-character-sheet` unless
//! `--data-dir` or `DCC_DATA_DIR` says otherwise):
//!
//! ```bash
//! cargo run -p dcc -- character save zed.json --note "took damage leveling"
//! cargo run -p dcc -- character history <id> --export
//! ```
//!
//! Set `RUST_LOG=dcc_core=debug` to see what the stores are doing.

mod args;
mod commands;

use anyhow::{Context, Result};
use args::{Cli, Commands};
use clap::Parser;
use dcc_core::StoreConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match cli.data_dir {
        Some(dir) => StoreConfig::new(dir),
        None => StoreConfig::from_env(),
    };
    let stores = config.open().await.with_context(|| {
        format!(
            "Failed to open data directory {}",
            config.base_dir.display()
        )
    })?;

    match cli.command {
        Commands::Character(command) => commands::character(&stores, command).await,
        Commands::Map(command) => commands::map(&stores, command).await,
        Commands::Party(command) => commands::party(&stores, command).await,
        Commands::Note(command) => commands::note(&stores, command).await,
    }
}
