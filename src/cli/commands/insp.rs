//! `tpm insp` command - Field inspections

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use miette::{IntoDiagnostic, Result};

use crate::cli::filters::ResultFilter;
use crate::cli::helpers::{
    describe_verification, format_token, prompt_optional, prompt_required, Session,
};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::InspectionResult;
use crate::core::schedule::NextInspection;
use crate::core::service::InspectionFields;
use crate::entities::inspection::InspectionRecord;

#[derive(Subcommand, Debug)]
pub enum InspCommands {
    /// List inspections with filtering
    List(ListArgs),

    /// Record an inspection
    New(NewArgs),

    /// Show an inspection's details
    Show(ShowArgs),
}

const INSP_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 10),
    ColumnDef::new("part-id", "PART ID", 16),
    ColumnDef::new("date", "DATE", 10),
    ColumnDef::new("inspector", "INSPECTOR", 16),
    ColumnDef::new("result", "RESULT", 7),
    ColumnDef::new("next", "NEXT", 30),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by result
    #[arg(long, short = 'r', default_value = "all")]
    pub result: ResultFilter,

    /// Only inspections due on or before --as-of (default: today)
    #[arg(long)]
    pub due: bool,

    /// Reference date for --due (YYYY-MM-DD)
    #[arg(long, requires = "due")]
    pub as_of: Option<NaiveDate>,

    /// Filter by part ID (substring match)
    #[arg(long, short = 'p')]
    pub part: Option<String>,

    /// Limit number of results
    #[arg(long, short = 'n')]
    pub limit: Option<usize>,

    /// Show only count
    #[arg(long)]
    pub count: bool,
}

#[derive(clap::Args, Debug)]
pub struct NewArgs {
    /// QR code / part ID (required)
    #[arg(long, short = 'p')]
    pub part_id: Option<String>,

    /// Part type
    #[arg(long, short = 't')]
    pub part_type: Option<String>,

    /// Track location
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Inspection date (YYYY-MM-DD, default: today)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// Inspector name (required)
    #[arg(long)]
    pub inspector: Option<String>,

    /// Result: ok, defect or replace
    #[arg(long, short = 'r')]
    pub result: Option<InspectionResult>,

    /// What was observed (required)
    #[arg(long)]
    pub findings: Option<String>,

    /// Photo reference (repeatable)
    #[arg(long = "image")]
    pub images: Vec<String>,

    /// Interactive mode (prompt for missing fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Inspection ID (e.g., INSP-001)
    pub id: String,

    /// Check the verification token against the record
    #[arg(long)]
    pub verify: bool,
}

/// Run an inspection subcommand
pub fn run(cmd: InspCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        InspCommands::List(args) => run_list(args, global),
        InspCommands::New(args) => run_new(args, global),
        InspCommands::Show(args) => run_show(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let as_of = args.as_of.unwrap_or_else(|| session.service.today());

    let mut records: Vec<InspectionRecord> = session
        .service
        .inspections()
        .into_iter()
        .filter(|r| args.result.matches(r.result))
        .filter(|r| !args.due || r.is_due(as_of))
        .filter(|r| args.part.as_deref().is_none_or(|p| r.part_id.contains(p)))
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
        println!("No inspections found.");
        return Ok(());
    }

    let rows = records.iter().map(inspection_row).collect();
    TableFormatter::new(INSP_COLUMNS, "inspection").output(rows, format)
}

fn inspection_row(rec: &InspectionRecord) -> Vec<String> {
    vec![
        rec.id.clone(),
        rec.part_id.clone(),
        rec.inspection_date.to_string(),
        rec.inspector.clone(),
        rec.result.to_string(),
        rec.next_inspection.to_string(),
    ]
}

fn select_result() -> Result<InspectionResult> {
    let items = &[
        "ok      - no action needed",
        "defect  - re-inspect soon",
        "replace - immediate replacement",
    ];
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Result")
        .items(items)
        .default(0)
        .interact()
        .into_diagnostic()?;
    Ok(InspectionResult::ALL
        .get(selection)
        .copied()
        .unwrap_or_default())
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let date = args.date.unwrap_or_else(|| session.service.today());

    let fields = if args.interactive {
        InspectionFields {
            part_id: prompt_required(args.part_id, "Part ID")?,
            part_type: prompt_optional(args.part_type, "Part type")?.unwrap_or_default(),
            location: prompt_optional(args.location, "Location")?.unwrap_or_default(),
            inspection_date: Some(date),
            inspector: prompt_required(args.inspector, "Inspector")?,
            result: match args.result {
                Some(r) => r,
                None => select_result()?,
            },
            findings: prompt_required(args.findings, "Findings")?,
            images: args.images,
        }
    } else {
        InspectionFields {
            part_id: args.part_id.unwrap_or_default(),
            part_type: args.part_type.unwrap_or_default(),
            location: args.location.unwrap_or_default(),
            inspection_date: Some(date),
            inspector: args.inspector.unwrap_or_default(),
            result: args.result.unwrap_or_default(),
            findings: args.findings.unwrap_or_default(),
            images: args.images,
        }
    };

    let record = session.service.create_inspection(fields)?;
    session.save()?;

    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", record.id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&record, format)?;
        }
        _ => {
            println!(
                "{} Recorded inspection {}",
                style("✓").green(),
                style(&record.id).cyan()
            );
            println!(
                "   {} {} | next: {}",
                record.part_id,
                style(record.result).yellow(),
                styled_next(&record.next_inspection)
            );
        }
    }
    Ok(())
}

fn styled_next(next: &NextInspection) -> String {
    match next {
        NextInspection::ImmediateReplacement => style(next).red().bold().to_string(),
        NextInspection::Due(_) => next.to_string(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let rec = session.service.inspection(&args.id)?;
    let verification = if args.verify {
        Some(session.service.verify_inspection(&args.id)?)
    } else {
        None
    };

    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", rec.id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&rec, format)?;
        }
        format @ (OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Table) => {
            TableFormatter::new(INSP_COLUMNS, "inspection")
                .output(vec![inspection_row(&rec)], format)?;
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&rec.id).cyan());
            println!("{}: {}", style("Part").bold(), style(&rec.part_id).yellow());
            if !rec.part_type.is_empty() {
                println!("{}: {}", style("Type").bold(), rec.part_type);
            }
            if !rec.location.is_empty() {
                println!("{}: {}", style("Location").bold(), rec.location);
            }
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("Date").bold(), rec.inspection_date);
            println!("{}: {}", style("Inspector").bold(), rec.inspector);
            println!("{}: {}", style("Result").bold(), rec.result);
            println!(
                "{}: {}",
                style("Next inspection").bold(),
                styled_next(&rec.next_inspection)
            );

            println!();
            println!("{}", style("Findings:").bold());
            println!("{}", rec.findings);

            if !rec.images.is_empty() {
                println!();
                println!("{} ({}):", style("Images").bold(), rec.images.len());
                for image in &rec.images {
                    println!("  • {}", image);
                }
            }

            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("Token").dim(),
                format_token(rec.verification_token.as_ref())
            );
            if let Some(result) = verification {
                println!("{}: {}", style("Verification").dim(), describe_verification(result));
            }
        }
    }
    Ok(())
}
