//! CLI tool for auditing multisig governance transactions
//!
//! This binary provides the `govread` command-line interface for decoding a
//! governance transaction, validating it against a deployment config, and
//! printing the annotated call tree with its anomalies.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod formatters;

use cli::{Cli, Commands};
use commands::{cmd_decode_batch, cmd_read};

/// Exit status when the audited transaction has a fatal anomaly
const FATAL_EXIT_CODE: i32 = 2;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Read {
            config,
            chain,
            tx,
            format,
            output,
        } => {
            let fatal = cmd_read(&config, &chain, &tx, &format, output.as_deref()).await?;
            if fatal {
                std::process::exit(FATAL_EXIT_CODE);
            }
            Ok(())
        }

        Commands::DecodeBatch {
            data,
            format,
            output,
        } => cmd_decode_batch(&data, &format, output.as_deref()),
    }
}
