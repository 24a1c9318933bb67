//! Command-line interface definitions for the govread CLI tool
//!
//! This module contains all the clap-related structures for argument parsing
//! and command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Indented call tree followed by the anomaly list
    #[default]
    #[value(name = "pretty")]
    Pretty,
    /// Machine readable JSON report
    #[value(name = "json")]
    Json,
}

#[derive(Parser)]
#[command(name = "govread")]
#[command(about = "Decode and validate multisig governance transactions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Audit one transaction against a deployment config
    Read {
        /// Audit config (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        config: PathBuf,

        /// Chain the transaction executes on
        #[arg(long)]
        chain: String,

        /// Transaction JSON file, or `-` for stdin
        #[arg(long, default_value = "-")]
        tx: String,

        /// Output format
        #[arg(long, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Split MultiSend call data (or a packed transactions blob) into entries
    DecodeBatch {
        /// Hex encoded data, with or without 0x prefix
        #[arg(long)]
        data: String,

        /// Output format
        #[arg(long, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
