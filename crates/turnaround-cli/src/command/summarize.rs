//! Single time window summary command

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use turnaround_stats::range::Interval;

use crate::{
    command::TableArg,
    data::{self, MeasurementSeries, Timestamp},
    report::{self, GroupTableRow},
    schema::report::{GroupReport, WindowReport},
    util,
};

#[derive(Debug, Clone, Args)]
pub(crate) struct SummarizeArg {
    #[clap(flatten)]
    pub table: TableArg,

    /// Only exams completed strictly after this instant
    #[arg(long, value_parser = data::parse_timestamp)]
    pub from: Option<Timestamp>,

    /// Only exams completed strictly before this instant
    #[arg(long, value_parser = data::parse_timestamp)]
    pub until: Option<Timestamp>,

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

pub(crate) fn run(arg: &SummarizeArg) -> anyhow::Result<()> {
    let interval = Interval::new(arg.from, arg.until)
        .context("Specify the time window with --from and/or --until")?;

    let table = arg.table.load()?;
    let reports = table
        .series
        .iter()
        .map(|series| summarize_series(series, &interval, arg.with_mean))
        .collect::<anyhow::Result<Vec<_>>>()?;

    let json_on_stdout = arg.json && arg.output.is_none();
    if !json_on_stdout {
        println!("Turnaround Time Summary ({})", describe_interval(&interval));
        println!("==========================================\n");
        for window in &reports {
            println!("{}", window.column);
            let rows = [GroupTableRow {
                label: "Window".to_owned(),
                group: &window.group,
            }];
            report::print_group_table("Period", &rows, arg.with_mean);
            println!();
            report::print_box_plots(&[("Window", &window.group.stats)]);
            println!();
        }
    }
    if arg.json || arg.output.is_some() {
        util::save_json_report(&reports, arg.output.clone())?;
    }

    Ok(())
}

fn summarize_series(
    series: &MeasurementSeries,
    interval: &Interval<Timestamp>,
    with_mean: bool,
) -> anyhow::Result<WindowReport> {
    let values = interval
        .select(&series.timestamps, &series.values)
        .with_context(|| format!("Failed to select '{}' measurements", series.name))?;
    let group = GroupReport::from_values(&values, with_mean).with_context(|| {
        format!(
            "No '{}' measurements {}",
            series.name,
            describe_interval(interval)
        )
    })?;
    Ok(WindowReport {
        column: series.name.clone(),
        from: interval.lower().copied(),
        until: interval.upper().copied(),
        group,
    })
}

fn describe_interval(interval: &Interval<Timestamp>) -> String {
    const FORMAT: &str = "%Y-%m-%dT%H:%M";
    match interval {
        Interval::Before(upper) => format!("before {}", upper.format(FORMAT)),
        Interval::After(lower) => format!("after {}", lower.format(FORMAT)),
        Interval::Between { lower, upper } => format!(
            "between {} and {}",
            lower.format(FORMAT),
            upper.format(FORMAT)
        ),
    }
}
