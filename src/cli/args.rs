//! Command-line argument definitions

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::batch::BatchCommands;
use crate::cli::commands::completions::CompletionsArgs;
use crate::cli::commands::init::InitArgs;
use crate::cli::commands::insp::InspCommands;
use crate::cli::commands::inst::InstCommands;
use crate::cli::commands::scan::ScanArgs;
use crate::cli::commands::summary::SummaryArgs;

/// Track Parts Manager - lifecycle records for railway track parts
#[derive(Parser, Debug)]
#[command(name = "tpm", version, about, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options accepted by every subcommand
#[derive(clap::Args, Debug, Clone)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Workspace directory (default: search upward from the current directory)
    #[arg(long, short = 'C', global = true, env = "TPM_WORKSPACE")]
    pub workspace: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a workspace in the current directory
    Init(InitArgs),

    /// Depot installations (received → installed → verified)
    #[command(subcommand)]
    Inst(InstCommands),

    /// Field inspections and next inspection dates
    #[command(subcommand)]
    Insp(InspCommands),

    /// Vendor batches (pending → approved → shipped → delivered)
    #[command(subcommand)]
    Batch(BatchCommands),

    /// Look up a part by its QR code
    Scan(ScanArgs),

    /// Status counts and inspections due
    Summary(SummaryArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Output format for command results
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// TSV for lists, pretty text for single records
    #[default]
    Auto,
    /// Tab-separated values
    Tsv,
    /// Comma-separated values
    Csv,
    /// Bordered table
    Table,
    /// YAML
    Yaml,
    /// JSON
    Json,
    /// IDs only, one per line
    Id,
}
