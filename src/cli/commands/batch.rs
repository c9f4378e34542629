//! `tpm batch` command - Vendor batches

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::filters::BatchFilter;
use crate::cli::helpers::{
    describe_verification, format_date, format_token, prompt_required, Session,
};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::BatchStatus;
use crate::core::service::BatchFields;
use crate::entities::batch::BatchRecord;

#[derive(Subcommand, Debug)]
pub enum BatchCommands {
    /// List batches with filtering
    List(ListArgs),

    /// Submit a vendor batch
    New(NewArgs),

    /// Show a batch's details
    Show(ShowArgs),

    /// Move a batch to its next status
    Advance(AdvanceArgs),
}

const BATCH_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("batch-id", "BATCH ID", 22),
    ColumnDef::new("vendor", "VENDOR", 24),
    ColumnDef::new("material", "MATERIAL", 20),
    ColumnDef::new("quantity", "QTY", 6),
    ColumnDef::new("manufactured", "MFG DATE", 10),
    ColumnDef::new("status", "STATUS", 9),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "all")]
    pub status: BatchFilter,

    /// Filter by vendor (substring match, case-insensitive)
    #[arg(long)]
    pub vendor: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// Vendor name (required)
    #[arg(long)]
    pub vendor: Option<String>,

    /// Material type, e.g. "Elastic Rail Clip" (required)
    #[arg(long, short = 'm')]
    pub material: Option<String>,

    /// Number of units (must be > 0)
    #[arg(long, short = 'q')]
    pub quantity: Option<u32>,

    /// Manufacturing date (YYYY-MM-DD)
    #[arg(long)]
    pub manufactured: Option<NaiveDate>,

    /// Warranty period in months
    #[arg(long)]
    pub warranty_months: Option<u32>,

    /// Interactive mode (prompt for missing fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Batch ID (e.g., EC-BATCH-2024-Q1-001)
    pub batch_id: String,

    /// Check the verification token against the record
    #[arg(long)]
    pub verify: bool,
}

#[derive(clap::Args, Debug)]
pub struct AdvanceArgs {
    /// Batch ID (e.g., EC-BATCH-2024-Q1-001)
    pub batch_id: String,

    /// Target status (default: the next one in sequence)
    pub status: Option<BatchStatus>,
}

/// Run a batch subcommand
pub fn run(cmd: BatchCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BatchCommands::List(args) => run_list(args, global),
        BatchCommands::New(args) => run_new(args, global),
        BatchCommands::Show(args) => run_show(args, global),
        BatchCommands::Advance(args) => run_advance(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let vendor = args.vendor.as_deref().map(str::to_lowercase);

    let mut records: Vec<BatchRecord> = session
        .service
        .batches()
        .into_iter()
        .filter(|b| args.status.matches(b.status))
        .filter(|b| {
            vendor
                .as_deref()
                .is_none_or(|v| b.vendor.to_lowercase().contains(v))
        })
        .collect();

    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if args.count {
        println!("{}", records.len());
        return Ok(());
    }

    let format = effective_format(global.format, true);
    if print_structured(&records, format)? {
        return Ok(());
    }

    if records.is_empty() {
        println!("No batches found.");
        return Ok(());
    }

    let rows = records.iter().map(batch_row).collect();
    TableFormatter::new(BATCH_COLUMNS, "batch").output(rows, format)
}

fn batch_row(b: &BatchRecord) -> Vec<String> {
    vec![
        b.batch_id.clone(),
        b.vendor.clone(),
        b.material_type.clone(),
        b.quantity.to_string(),
        format_date(b.manufacturing_date),
        b.status.to_string(),
    ]
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;

    let fields = if args.interactive {
        let quantity = match args.quantity {
            Some(q) => q,
            None => prompt_required(None, "Quantity")?
                .trim()
                .parse()
                .map_err(|_| miette::miette!("Quantity must be a whole number"))?,
        };
        BatchFields {
            vendor: prompt_required(args.vendor, "Vendor")?,
            material_type: prompt_required(args.material, "Material type")?,
            quantity,
            manufacturing_date: args.manufactured,
            warranty_months: args.warranty_months,
        }
    } else {
        BatchFields {
            vendor: args.vendor.unwrap_or_default(),
            material_type: args.material.unwrap_or_default(),
            quantity: args.quantity.unwrap_or_default(),
            manufacturing_date: args.manufactured,
            warranty_months: args.warranty_months,
        }
    };

    let record = session.service.create_batch(fields)?;
    session.save()?;

    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", record.batch_id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&record, format)?;
        }
        _ => {
            println!(
                "{} Submitted batch {}",
                style("✓").green(),
                style(&record.batch_id).cyan()
            );
            println!(
                "   {} x {} from {} ({})",
                record.quantity,
                record.material_type,
                record.vendor,
                style(record.status).yellow()
            );
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let b = session.service.batch(&args.batch_id)?;
    let verification = if args.verify {
        Some(session.service.verify_batch(&args.batch_id)?)
    } else {
        None
    };

    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", b.batch_id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&b, format)?;
        }
        format @ (OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Table) => {
            TableFormatter::new(BATCH_COLUMNS, "batch").output(vec![batch_row(&b)], format)?;
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("Batch").bold(), style(&b.batch_id).cyan());
            println!("{}: {}", style("Vendor").bold(), style(&b.vendor).yellow());
            println!("{}: {}", style("Material").bold(), b.material_type);
            println!("{}: {}", style("Quantity").bold(), b.quantity);
            println!("{}: {}", style("Status").bold(), b.status);
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("Manufactured").bold(),
                format_date(b.manufacturing_date)
            );
            if let Some(months) = b.warranty_months {
                println!("{}: {} months", style("Warranty").bold(), months);
            }
            println!("{}: {}", style("Submitted").bold(), b.submitted);

            let next = session.service.allowed_batch_transitions(&b.batch_id)?;
            if let Some(next) = next.first() {
                println!("{}: {}", style("Next").bold(), next);
            }

            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("Token").dim(),
                format_token(b.verification_token.as_ref())
            );
            if let Some(result) = verification {
                println!("{}: {}", style("Verification").dim(), describe_verification(result));
            }
        }
    }
    Ok(())
}

fn run_advance(args: AdvanceArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let before = session.service.batch(&args.batch_id)?;

    let target = match args.status {
        Some(status) => status,
        None => session
            .service
            .allowed_batch_transitions(&args.batch_id)?
            .first()
            .copied()
            .ok_or_else(|| {
                miette::miette!(
                    "Batch '{}' is {} and cannot advance further",
                    args.batch_id,
                    before.status
                )
            })?,
    };

    let record = session.service.advance_batch_status(&args.batch_id, target)?;
    session.save()?;

    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", record.batch_id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&record, format)?;
        }
        _ => {
            println!(
                "{} {}: {} → {}",
                style("✓").green(),
                style(&record.batch_id).cyan(),
                before.status,
                style(record.status).yellow()
            );
            println!(
                "   {}: {}",
                style("Token").dim(),
                format_token(record.verification_token.as_ref())
            );
        }
    }
    Ok(())
}
