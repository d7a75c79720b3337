//! Size allocation command-line front-end.

use anyhow::Result;
use clap::Parser;
use sizing_allocation::{AllocationOutcome, AllocationService};
use sizing_utils::{init_logging, AppConfig, SizingError};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "size-allocation")]
#[command(version, about = "Allocate uniform sizes for every student of a roster")]
struct Cli {
    /// Roster workbook with class, name, gender, age, height and weight columns
    roster: PathBuf,

    /// Directory that receives the filled allocation workbook
    #[arg(long, short = 'o')]
    output_dir: PathBuf,

    /// Size reference workbook (default from configuration)
    #[arg(long)]
    size_table: Option<PathBuf>,

    /// Allocation template workbook (default from configuration)
    #[arg(long)]
    template: Option<PathBuf>,

    /// Template sheet receiving the rows
    #[arg(long)]
    sheet: Option<String>,

    /// School name to use instead of reading it from the roster heading
    #[arg(long)]
    school: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            if sizing_cause(&e).is_some_and(SizingError::is_structural) {
                eprintln!("The roster layout could not be read; no output file was written.");
            }
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load().map_err(SizingError::from)?;
    if let Some(path) = cli.size_table {
        config.reference.size_table_path = path;
    }
    if let Some(path) = cli.template {
        config.reference.template_path = path;
    }
    if let Some(sheet) = cli.sheet {
        config.reference.template_sheet = sheet;
    }

    init_logging(&config.logging)?;
    tracing::info!(
        roster = %cli.roster.display(),
        size_table = %config.reference.size_table_path.display(),
        template = %config.reference.template_path.display(),
        "Starting size allocation"
    );

    let outcome = AllocationService::new(&config.reference).run(&cli.roster, &cli.output_dir, cli.school)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_summary(&outcome);
    }
    Ok(())
}

fn print_summary(outcome: &AllocationOutcome) {
    println!("School:           {}", outcome.school);
    println!("Output:           {}", outcome.output_path.display());
    println!("Rows written:     {}", outcome.rows_written);
    println!("Skipped rows:     {}", outcome.roster_issues.len());
    for issue in &outcome.roster_issues {
        println!(
            "  row {} {}: {}",
            issue.row,
            issue.name.as_deref().unwrap_or("-"),
            issue.message
        );
    }
    println!("Flagged students: {}", outcome.flagged.len());
    for student in &outcome.flagged {
        println!("  row {} {}: {}", student.source_row, student.name, student.reason);
    }
    println!("Skipped brackets: {}", outcome.skipped_brackets.len());
    if !outcome.missing_sections.is_empty() {
        let missing: Vec<&str> = outcome.missing_sections.iter().map(|s| s.as_str()).collect();
        println!("Missing sections: {}", missing.join(", "));
    }
}

fn sizing_cause(error: &anyhow::Error) -> Option<&SizingError> {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<SizingError>())
}

/// Exit code of the first `SizingError` in the chain, 1 for anything else.
fn exit_code(error: &anyhow::Error) -> u8 {
    sizing_cause(error).map_or(1, SizingError::exit_code)
}
