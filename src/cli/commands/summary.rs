//! `tpm summary` command - Status counts and inspections due

use chrono::NaiveDate;
use console::style;
use miette::Result;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::cli::helpers::Session;
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::schedule::NextInspection;
use crate::core::summary::Summary;

#[derive(clap::Args, Debug)]
pub struct SummaryArgs {
    /// Reference date for due inspections (YYYY-MM-DD, default: today)
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

const DUE_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("inspection-id", "INSPECTION", 10),
    ColumnDef::new("part-id", "PART ID", 16),
    ColumnDef::new("location", "LOCATION", 30),
    ColumnDef::new("next", "DUE", 30),
];

pub fn run(args: SummaryArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let as_of = args.as_of.unwrap_or_else(|| session.service.today());
    let summary = session.service.summary(as_of);

    match effective_format(global.format, false) {
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&summary, format)?;
        }
        format @ (OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Table | OutputFormat::Id) => {
            let rows = summary
                .due
                .iter()
                .map(|d| {
                    vec![
                        d.inspection_id.clone(),
                        d.part_id.clone(),
                        d.location.clone(),
                        d.next_inspection.to_string(),
                    ]
                })
                .collect();
            TableFormatter::new(DUE_COLUMNS, "due inspection").output(rows, format)?;
        }
        OutputFormat::Auto => print_pretty(&summary),
    }
    Ok(())
}

fn print_counts<K: Display>(title: &str, counts: &BTreeMap<K, usize>) {
    let total: usize = counts.values().sum();
    println!("{} ({}):", style(title).bold(), total);
    for (key, count) in counts {
        println!("  {:<12} {}", key.to_string(), count);
    }
}

fn print_pretty(summary: &Summary) {
    println!("{}", style("─".repeat(60)).dim());
    println!(
        "{} as of {}",
        style("Track parts summary").bold(),
        style(summary.as_of).cyan()
    );
    println!("{}", style("─".repeat(60)).dim());

    print_counts("Installations", &summary.installations);
    println!();
    print_counts("Batches", &summary.batches);
    println!("  {:<12} {}", "units", summary.units_delivered);
    println!();
    print_counts("Inspections", &summary.inspections);
    println!();

    if summary.due.is_empty() {
        println!("{}", style("No inspections due.").green());
    } else {
        println!("{} ({}):", style("Due").bold(), summary.due.len());
        for due in &summary.due {
            let when = match due.next_inspection {
                NextInspection::ImmediateReplacement => {
                    style(due.next_inspection.to_string()).red().bold()
                }
                NextInspection::Due(_) => style(due.next_inspection.to_string()).yellow(),
            };
            println!(
                "  • {} {} at {} - {}",
                style(&due.inspection_id).cyan(),
                due.part_id,
                due.location,
                when
            );
        }
    }
    println!("{}", style("─".repeat(60)).dim());
}
