//! `tpm scan` command - QR code part lookup

use console::style;
use miette::{IntoDiagnostic, Result};
use rand::seq::IndexedRandom;
use std::time::Duration;

use crate::cli::helpers::format_date;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::Config;
use crate::core::service::TrackService;
use crate::core::task::{DelayedTask, TaskError};
use crate::entities::part::PartRecord;

#[derive(clap::Args, Debug)]
pub struct ScanArgs {
    /// QR code / part ID to look up
    #[arg(required_unless_present = "simulate", conflicts_with = "simulate")]
    pub code: Option<String>,

    /// Simulate a camera scan that picks a catalogued part after a delay
    #[arg(long)]
    pub simulate: bool,

    /// Simulated scan delay in milliseconds (default: scan.delay_ms)
    #[arg(long, requires = "simulate")]
    pub delay_ms: Option<u64>,
}

pub fn run(args: ScanArgs, global: &GlobalOpts, config: &Config) -> Result<()> {
    let service = TrackService::new(config.engine());

    let code = if args.simulate {
        let delay = Duration::from_millis(args.delay_ms.unwrap_or(config.scan.delay_ms));
        match simulate_scan(&service, delay)? {
            Some(code) => code,
            None => {
                eprintln!("{} Scan cancelled", style("!").yellow());
                return Ok(());
            }
        }
    } else {
        args.code.unwrap_or_default()
    };

    let part = service.lookup_by_qr_code(&code)?;
    print_part(&part, global)
}

/// Wait out the scan delay, then pick a code; `None` if interrupted
fn simulate_scan(service: &TrackService, delay: Duration) -> Result<Option<String>> {
    let codes: Vec<String> = service.catalog().codes().map(str::to_string).collect();
    if codes.is_empty() {
        return Err(miette::miette!("Part catalog is empty; nothing to scan"));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .into_diagnostic()?;

    let task = DelayedTask::new(delay);
    let cancel = task.cancel_token();
    eprintln!("{} Scanning... (Ctrl-C to cancel)", style("◌").cyan());

    let outcome = runtime.block_on(async {
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        });
        let result = task.run(|| codes.choose(&mut rand::rng()).cloned()).await;
        watcher.abort();
        result
    });

    match outcome {
        Ok(code) => Ok(code),
        Err(TaskError::Cancelled) => Ok(None),
    }
}

fn print_part(part: &PartRecord, global: &GlobalOpts) -> Result<()> {
    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", part.id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(part, format)?;
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("Part").bold(), style(&part.id).cyan());
            println!("{}: {}", style("Type").bold(), style(&part.part_type).yellow());
            println!("{}: {}", style("Status").bold(), part.status);
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("Batch").bold(), part.batch_id);
            println!("{}: {}", style("Vendor").bold(), part.vendor);
            println!(
                "{}: {}",
                style("Manufactured").bold(),
                part.manufacturing_date
            );
            println!(
                "{}: {}",
                style("Installed").bold(),
                format_date(part.installation_date)
            );
            if let Some(ref location) = part.location {
                println!("{}: {}", style("Location").bold(), location);
            }
            println!(
                "{}: {}",
                style("Last inspection").bold(),
                format_date(part.last_inspection)
            );
            println!(
                "{}: {}",
                style("Next inspection").bold(),
                format_date(part.next_inspection)
            );
            println!("{}", style("─".repeat(60)).dim());
        }
    }
    Ok(())
}
