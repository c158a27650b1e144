//! CLI definition using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use towcheck_types::OutputFormat;

#[derive(Parser)]
#[command(name = "towcheck")]
#[command(author = "yuuji")]
#[command(version)]
#[command(about = "Towing compliance checks for vehicle and caravan weighings")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check one weigh record and print the compliance report
    Check {
        #[command(flatten)]
        record: RecordArgs,
    },

    /// Export one weigh record as a report document
    Export {
        #[command(flatten)]
        record: RecordArgs,

        /// Output directory. Uses config value if not specified.
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Evaluate a JSON array of weigh records
    Batch {
        /// Path to JSON file containing an array of records
        records: PathBuf,

        /// Number of parallel workers. 0 = auto (CPU count). Uses config value if not specified.
        #[arg(long, short = 'j')]
        jobs: Option<usize>,

        /// Export one report document per record into this directory
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Set a value (e.g. rules.tbm_fallback_ratio=0.1)
        #[arg(long, value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

#[derive(clap::Args)]
pub struct RecordArgs {
    /// Weigh record JSON (may carry the vehicle and caravan inline or nested)
    pub record: PathBuf,

    /// Vehicle record JSON, when not part of the weigh record
    #[arg(long)]
    pub vehicle: Option<PathBuf>,

    /// Caravan record JSON, when not part of the weigh record
    #[arg(long)]
    pub caravan: Option<PathBuf>,

    /// Report identifier (defaults to the record id)
    #[arg(long)]
    pub report_id: Option<String>,

    /// Customer display name
    #[arg(long)]
    pub customer: Option<String>,
}
