use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use self::{compare::CompareArg, summarize::SummarizeArg};
use crate::data::ExamTable;

mod compare;
mod summarize;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// Increase diagnostic output on stderr (-v: debug, -vv: trace)
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// What mode to run the program in
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compare turnaround times before and after the intervention
    Compare(#[clap(flatten)] CompareArg),
    /// Summarize turnaround times within a single time window
    Summarize(#[clap(flatten)] SummarizeArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    init_tracing(args.verbose);
    match args.mode {
        Mode::Compare(arg) => compare::run(&arg)?,
        Mode::Summarize(arg) => summarize::run(&arg)?,
    }
    Ok(())
}

/// Exam table selection shared by all commands
#[derive(Debug, Clone, Args)]
pub(crate) struct TableArg {
    /// Path to the exam table CSV file
    pub path: PathBuf,

    /// Column holding the exam completion timestamp
    #[arg(long, default_value = "Exam Completed Date")]
    pub date_column: String,

    /// Measurement columns to analyze (comma-separated)
    #[arg(
        long,
        value_delimiter = ',',
        default_value = "Exam Completed to Report Finalized (minutes)"
    )]
    pub columns: Vec<String>,
}

impl TableArg {
    pub(crate) fn load(&self) -> anyhow::Result<ExamTable> {
        tracing::info!("Reading exam table {}", self.path.display());
        let table = ExamTable::read_csv(&self.path, &self.date_column, &self.columns)?;
        if table.undated_rows > 0 {
            tracing::warn!(
                "Skipped {} rows with a blank '{}' cell",
                table.undated_rows,
                self.date_column
            );
        }
        for series in &table.series {
            if series.blank_rows > 0 {
                tracing::warn!(
                    "Skipped {} rows with a blank '{}' cell",
                    series.blank_rows,
                    series.name
                );
            }
            tracing::debug!(
                column = %series.name,
                measurements = series.values.len(),
                "Loaded measurement series"
            );
        }
        Ok(table)
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .compact()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}
