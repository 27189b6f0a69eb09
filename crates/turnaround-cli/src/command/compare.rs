//! Before/after intervention comparison command
//!
//! Splits every measurement column into a baseline period (exams completed
//! before the intervention) and a follow-up period (exams completed after the
//! learning curve), summarizes both and tests the difference in means.

use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use turnaround_stats::{ErrorKind, difference::welch_t_test, range::Interval};

use crate::{
    command::TableArg,
    data::{self, MeasurementSeries, Timestamp},
    report,
    schema::report::{ColumnComparison, ComparisonReport, GroupReport},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct CompareArg {
    #[clap(flatten)]
    pub table: TableArg,

    /// End of the baseline period; exams completed strictly before it are "before"
    #[arg(long, default_value = "2017-10-01T00:00", value_parser = data::parse_timestamp)]
    pub before: Timestamp,

    /// Start of the follow-up period; exams completed strictly after it are "after"
    #[arg(long, default_value = "2018-04-01T00:00", value_parser = data::parse_timestamp)]
    pub after: Timestamp,

    /// Also report the population mean and standard deviation
    #[arg(long)]
    pub with_mean: bool,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Write the JSON report to this path (the text report is still printed)
    #[arg(long)]
    pub output: Option<PathBuf>,
}

pub(crate) fn run(arg: &CompareArg) -> anyhow::Result<()> {
    if arg.after < arg.before {
        tracing::warn!(
            "Follow-up start {} precedes baseline end {}; the periods overlap",
            arg.after.format("%Y-%m-%dT%H:%M"),
            arg.before.format("%Y-%m-%dT%H:%M"),
        );
    }

    let table = arg.table.load()?;
    let columns = table
        .series
        .iter()
        .map(|series| compare_series(series, arg.before, arg.after, arg.with_mean))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let report = ComparisonReport {
        generated_at: Utc::now(),
        source: arg.table.path.clone(),
        before: arg.before,
        after: arg.after,
        columns,
    };

    let json_on_stdout = arg.json && arg.output.is_none();
    if !json_on_stdout {
        print_report(&report, arg.with_mean);
    }
    if arg.json || arg.output.is_some() {
        util::save_json_report(&report, arg.output.clone())?;
    }

    Ok(())
}

fn print_report(report: &ComparisonReport, with_mean: bool) {
    println!("Turnaround Time Comparison");
    println!("==========================\n");
    println!(
        "  Before : exams completed before {}",
        report.before.format("%Y-%m-%dT%H:%M")
    );
    println!(
        "  After  : exams completed after {}",
        report.after.format("%Y-%m-%dT%H:%M")
    );
    println!();

    report::print_legend(with_mean);
    println!();

    for comparison in &report.columns {
        report::print_comparison(comparison, with_mean);
        println!();
    }
}

fn compare_series(
    series: &MeasurementSeries,
    before: Timestamp,
    after: Timestamp,
    with_mean: bool,
) -> anyhow::Result<ColumnComparison> {
    let name = &series.name;
    let before_values = Interval::before(before)
        .select(&series.timestamps, &series.values)
        .with_context(|| format!("Failed to select '{name}' baseline measurements"))?;
    let after_values = Interval::after(after)
        .select(&series.timestamps, &series.values)
        .with_context(|| format!("Failed to select '{name}' follow-up measurements"))?;
    tracing::debug!(
        column = %name,
        before = before_values.len(),
        after = after_values.len(),
        "Split measurements by period"
    );

    let before_group = GroupReport::from_values(&before_values, with_mean).with_context(|| {
        format!(
            "No '{name}' measurements before {}",
            before.format("%Y-%m-%dT%H:%M")
        )
    })?;
    let after_group = GroupReport::from_values(&after_values, with_mean).with_context(|| {
        format!(
            "No '{name}' measurements after {}",
            after.format("%Y-%m-%dT%H:%M")
        )
    })?;

    let welch = match welch_t_test(&before_values, &after_values) {
        Ok(test) => Some(test),
        Err(err @ ErrorKind::InsufficientSamples { .. }) => {
            tracing::warn!("Skipping difference test for '{name}': {err}");
            None
        }
        Err(err) => {
            return Err(err).with_context(|| format!("Failed to test '{name}' difference"));
        }
    };

    Ok(ColumnComparison {
        column: name.clone(),
        before: before_group,
        after: after_group,
        welch,
    })
}
