//! # Transfer Node
//!
//! Hosts the transfer records dispatcher over an in-memory ledger.
//!
//! ## Protocol
//!
//! One JSON invocation per stdin line, one JSON response per stdout line.
//! Logs go to stderr so stdout stays a clean response channel.
//!
//! ## Startup Sequence
//!
//! 1. Install the log subscriber (`RUST_LOG`, default `info`)
//! 2. Load configuration (file, then `FT_*` overrides)
//! 3. Build the dispatcher and ledger
//! 4. Serve stdin until EOF

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ft_01_transfer_records::{InMemoryLedger, TransferDispatcher};
use node_runtime::{load_config, LedgerHost};

/// Transfer Node: line-oriented host for the transfer records dispatcher
#[derive(Parser, Debug)]
#[command(name = "transfer-node")]
#[command(about = "Serve transfer record invocations over stdin/stdout")]
struct Args {
    /// JSON configuration file (overrides FT_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Run the ledger without rich-query support
    #[arg(long)]
    no_rich_query: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let args = Args::parse();

    let mut config = load_config(args.config.as_deref(), |key| std::env::var(key).ok())
        .context("Failed to load configuration")?;
    if args.no_rich_query {
        config.rich_query = false;
    }

    info!("===========================================");
    info!("  Transfer Node v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");
    info!("Identity mode: {:?}", config.transfer.identity);
    info!("Private file reference: {}", config.transfer.private_file_reference);
    info!("Rich query: {}", config.rich_query);

    let dispatcher = TransferDispatcher::with_defaults(config.transfer)
        .context("Invalid transfer configuration")?;
    let ledger = InMemoryLedger::new().with_rich_query(config.rich_query);
    let mut host = LedgerHost::new(ledger, dispatcher);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        if let Some(response) = host.handle_line(&line) {
            stdout.write_all(response.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    info!("Input closed, shutting down");
    Ok(())
}
