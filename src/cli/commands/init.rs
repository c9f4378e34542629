//! `tpm init` command - Create a workspace

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::workspace::Workspace;

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg()]
    pub path: Option<PathBuf>,

    /// Start without the demo records
    #[arg(long)]
    pub empty: bool,

    /// Reinitialize an existing workspace, replacing its records
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let dir = match args.path {
        Some(path) => path,
        None => std::env::current_dir().into_diagnostic()?,
    };
    std::fs::create_dir_all(&dir).into_diagnostic()?;

    let ws = Workspace::init(&dir, !args.empty, args.force)?;
    let snapshot = ws.load_snapshot()?;

    println!(
        "{} Initialized tpm workspace in {}",
        style("✓").green(),
        style(ws.root().display()).cyan()
    );
    println!("   {}", style(ws.records_path().display()).dim());
    println!(
        "   {} installation(s), {} inspection(s), {} batch(es)",
        snapshot.installations.len(),
        snapshot.inspections.len(),
        snapshot.batches.len()
    );
    println!();
    println!("Next steps:");
    println!("  tpm inst list");
    println!("  tpm batch new --vendor <VENDOR> --material <TYPE> --quantity <N>");
    println!("  tpm scan TRP-EC-001-2024");

    Ok(())
}
