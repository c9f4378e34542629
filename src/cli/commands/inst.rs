//! `tpm inst` command - Depot installations

use chrono::NaiveDate;
use clap::Subcommand;
use console::style;
use miette::Result;

use crate::cli::filters::InstallationFilter;
use crate::cli::helpers::{
    describe_verification, format_date, format_token, prompt_optional, prompt_required, Session,
};
use crate::cli::output::{effective_format, print_structured};
use crate::cli::table::{ColumnDef, TableFormatter};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::entity::InstallationStatus;
use crate::core::service::InstallationFields;
use crate::entities::installation::InstallationRecord;

#[derive(Subcommand, Debug)]
pub enum InstCommands {
    /// List installations with filtering
    List(ListArgs),

    /// Record a part received at the depot
    New(NewArgs),

    /// Show an installation's details
    Show(ShowArgs),

    /// Move an installation to a new status
    Advance(AdvanceArgs),
}

/// Column definitions for installation list output
const INST_COLUMNS: &[ColumnDef] = &[
    ColumnDef::new("id", "ID", 10),
    ColumnDef::new("part-id", "PART ID", 16),
    ColumnDef::new("part-type", "TYPE", 20),
    ColumnDef::new("location", "LOCATION", 30),
    ColumnDef::new("status", "STATUS", 11),
    ColumnDef::new("date", "DATE", 10),
    ColumnDef::new("engineer", "ENGINEER", 16),
];

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Filter by status
    #[arg(long, short = 's', default_value = "all")]
    pub status: InstallationFilter,

    /// Search in part ID, location and engineer
    #[arg(long)]
    pub search: Option<String>,

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

    /// Part type (e.g., "Elastic Rail Clip")
    #[arg(long, short = 't')]
    pub part_type: Option<String>,

    /// Track location (required)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Responsible engineer (required)
    #[arg(long, short = 'e')]
    pub engineer: Option<String>,

    /// Installation date (YYYY-MM-DD)
    #[arg(long, short = 'd')]
    pub date: Option<NaiveDate>,

    /// Notes
    #[arg(long)]
    pub notes: Option<String>,

    /// Interactive mode (prompt for missing fields)
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Installation ID (e.g., INST-001)
    pub id: String,

    /// Check the verification token against the record
    #[arg(long)]
    pub verify: bool,
}

#[derive(clap::Args, Debug)]
pub struct AdvanceArgs {
    /// Installation ID (e.g., INST-001)
    pub id: String,

    /// Target status (installed, verified, maintenance)
    pub status: InstallationStatus,
}

/// Run an installation subcommand
pub fn run(cmd: InstCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        InstCommands::List(args) => run_list(args, global),
        InstCommands::New(args) => run_new(args, global),
        InstCommands::Show(args) => run_show(args, global),
        InstCommands::Advance(args) => run_advance(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let needle = args.search.as_deref().map(str::to_lowercase);

    let mut records: Vec<InstallationRecord> = session
        .service
        .installations()
        .into_iter()
        .filter(|r| args.status.matches(r.status))
        .filter(|r| {
            needle.as_deref().is_none_or(|n| {
                r.part_id.to_lowercase().contains(n)
                    || r.location.to_lowercase().contains(n)
                    || r.engineer.to_lowercase().contains(n)
            })
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
        println!("No installations found.");
        return Ok(());
    }

    let rows = records.iter().map(installation_row).collect();
    TableFormatter::new(INST_COLUMNS, "installation").output(rows, format)
}

fn installation_row(rec: &InstallationRecord) -> Vec<String> {
    vec![
        rec.id.clone(),
        rec.part_id.clone(),
        rec.part_type.clone(),
        rec.location.clone(),
        rec.status.to_string(),
        format_date(rec.installation_date),
        rec.engineer.clone(),
    ]
}

fn run_new(args: NewArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;

    let fields = if args.interactive {
        InstallationFields {
            part_id: prompt_required(args.part_id, "Part ID")?,
            part_type: prompt_optional(args.part_type, "Part type")?.unwrap_or_default(),
            location: prompt_required(args.location, "Location")?,
            installation_date: args.date,
            engineer: prompt_required(args.engineer, "Engineer")?,
            notes: prompt_optional(args.notes, "Notes")?,
        }
    } else {
        InstallationFields {
            part_id: args.part_id.unwrap_or_default(),
            part_type: args.part_type.unwrap_or_default(),
            location: args.location.unwrap_or_default(),
            installation_date: args.date,
            engineer: args.engineer.unwrap_or_default(),
            notes: args.notes,
        }
    };

    let record = session.service.create_installation(fields)?;
    session.save()?;

    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", record.id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&record, format)?;
        }
        _ => {
            println!(
                "{} Created installation {}",
                style("✓").green(),
                style(&record.id).cyan()
            );
            println!(
                "   {} at {} ({})",
                record.part_id,
                record.location,
                style(record.status).yellow()
            );
        }
    }
    Ok(())
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let rec = session.service.installation(&args.id)?;
    let verification = if args.verify {
        Some(session.service.verify_installation(&args.id)?)
    } else {
        None
    };

    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", rec.id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&rec, format)?;
        }
        format @ (OutputFormat::Tsv | OutputFormat::Csv | OutputFormat::Table) => {
            TableFormatter::new(INST_COLUMNS, "installation")
                .output(vec![installation_row(&rec)], format)?;
        }
        _ => {
            println!("{}", style("─".repeat(60)).dim());
            println!("{}: {}", style("ID").bold(), style(&rec.id).cyan());
            println!("{}: {}", style("Part").bold(), style(&rec.part_id).yellow());
            if !rec.part_type.is_empty() {
                println!("{}: {}", style("Type").bold(), rec.part_type);
            }
            println!("{}: {}", style("Location").bold(), rec.location);
            println!("{}: {}", style("Status").bold(), rec.status);
            println!("{}", style("─".repeat(60)).dim());
            println!(
                "{}: {}",
                style("Installed").bold(),
                format_date(rec.installation_date)
            );
            println!("{}: {}", style("Engineer").bold(), rec.engineer);

            let allowed: Vec<String> = session
                .service
                .allowed_installation_transitions(&rec.id)?
                .iter()
                .map(|s| s.to_string())
                .collect();
            if !allowed.is_empty() {
                println!("{}: {}", style("Next").bold(), allowed.join(", "));
            }

            if let Some(ref notes) = rec.notes {
                println!();
                println!("{}", style("Notes:").bold());
                println!("{}", notes);
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

fn run_advance(args: AdvanceArgs, global: &GlobalOpts) -> Result<()> {
    let session = Session::open(global)?;
    let before = session.service.installation(&args.id)?;
    let record = session
        .service
        .advance_installation_status(&args.id, args.status)?;
    session.save()?;

    match effective_format(global.format, false) {
        OutputFormat::Id => println!("{}", record.id),
        format @ (OutputFormat::Json | OutputFormat::Yaml) => {
            print_structured(&record, format)?;
        }
        _ => {
            println!(
                "{} {}: {} → {}",
                style("✓").green(),
                style(&record.id).cyan(),
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
