//! Text report display
//!
//! This module prints summary tables and text box plots for the
//! before/after comparison and for single time windows.

use turnaround_stats::{comprehensive::ComprehensiveStats, difference::WelchTest};

use crate::schema::report::{ColumnComparison, GroupReport};

/// Width of the box plot drawing area in characters
const BOX_PLOT_WIDTH: usize = 60;

/// A row in a group statistics table
pub(crate) struct GroupTableRow<'a> {
    /// Label for this row (e.g., "Before", "After", a window description)
    pub label: String,
    /// Statistics for this row
    pub group: &'a GroupReport,
}

/// Print legend explaining table columns
pub(crate) fn print_legend(with_mean: bool) {
    println!("Legend:");
    println!("  Exams    : Number of exams with a measurement in the period");
    println!("  Median   : 50th percentile (linear interpolation)");
    println!("  Q1/Q3    : 25th/75th percentiles");
    println!("  IQR      : Q3 - Q1");
    if with_mean {
        println!("  Mean/SD  : Population mean and standard deviation (skewed data, prefer the median)");
    }
    println!("  Welch t  : Unequal-variance two-sample t-test, before vs after");
}

fn print_group_table_header(label_col: &str, with_mean: bool) {
    print!(
        "  {:<20} {:>8} {:>10} {:>10} {:>10} {:>10}",
        label_col, "Exams", "Median", "Q1", "Q3", "IQR"
    );
    if with_mean {
        print!(" {:>10} {:>10}", "Mean", "SD");
    }
    println!();
}

fn print_group_table_separator(with_mean: bool) {
    // label(20) + exams(8) + 4 quantiles(10 each) + spaces(5) [+ mean/sd(10 each) + spaces(2)]
    let total_width = if with_mean { 95 } else { 73 };
    println!("  {}", "-".repeat(total_width));
}

fn print_group_table_row(row: &GroupTableRow, with_mean: bool) {
    let ComprehensiveStats { stats, summary, .. } = &row.group.stats;
    print!(
        "  {:<20} {:>8} {:>10.1} {:>10.1} {:>10.1} {:>10.1}",
        row.label, stats.count, summary.median, summary.q1, summary.q3, summary.iqr
    );
    if with_mean {
        match &row.group.mean_std_dev {
            Some(m) => print!(" {:>10.1} {:>10.1}", m.mean, m.std_dev),
            None => print!(" {:>10} {:>10}", "N/A", "N/A"),
        }
    }
    println!();
}

/// Print a formatted group statistics table
pub(crate) fn print_group_table(label_col: &str, rows: &[GroupTableRow], with_mean: bool) {
    print_group_table_header(label_col, with_mean);
    print_group_table_separator(with_mean);
    for row in rows {
        print_group_table_row(row, with_mean);
    }
}

/// Print the before/after table, difference test and box plot of one column
pub(crate) fn print_comparison(comparison: &ColumnComparison, with_mean: bool) {
    println!("{}", comparison.column);
    let rows = [
        GroupTableRow {
            label: "Before".to_owned(),
            group: &comparison.before,
        },
        GroupTableRow {
            label: "After".to_owned(),
            group: &comparison.after,
        },
    ];
    print_group_table("Period", &rows, with_mean);
    println!();
    println!("  {}", format_welch(comparison.welch.as_ref()));
    println!();
    print_box_plots(&[
        ("Before", &comparison.before.stats),
        ("After", &comparison.after.stats),
    ]);
}

pub(crate) fn format_welch(welch: Option<&WelchTest>) -> String {
    welch.map_or_else(
        || "Welch t-test: N/A (fewer than 2 exams in a period)".to_owned(),
        |w| {
            format!(
                "Welch t-test: t = {:.3}, df = {:.1}, p = {}, mean difference = {:+.1}",
                w.statistic,
                w.degrees_of_freedom,
                format_p_value(w.p_value),
                w.mean_difference
            )
        },
    )
}

/// p-value with 4 decimals, or `<0.0001` below that
pub(crate) fn format_p_value(p: f64) -> String {
    if p < 1e-4 {
        "<0.0001".to_owned()
    } else {
        format!("{p:.4}")
    }
}

/// Print box plots of several groups on a shared horizontal scale
///
/// Boxes span Q1-Q3 with `#` at the median; whiskers reach the most extreme
/// value within 1.5 IQR of the box. Outliers are not drawn.
pub(crate) fn print_box_plots(groups: &[(&str, &ComprehensiveStats)]) {
    let Some(scale_min) = groups
        .iter()
        .map(|(_, s)| s.whiskers.low)
        .min_by(f64::total_cmp)
    else {
        return;
    };
    let scale_max = groups
        .iter()
        .map(|(_, s)| s.whiskers.high)
        .max_by(f64::total_cmp)
        .unwrap_or(scale_min);

    for (label, stats) in groups {
        println!(
            "  {label:<8} {}",
            render_box(stats, scale_min, scale_max, BOX_PLOT_WIDTH)
        );
    }
    let min_label = format!("{scale_min:.1}");
    let max_label = format!("{scale_max:.1}");
    let gap = BOX_PLOT_WIDTH.saturating_sub(min_label.len() + max_label.len());
    println!("  {:<8} {min_label}{}{max_label}", "", " ".repeat(gap));
}

#[expect(
    clippy::cast_precision_loss,
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation
)]
fn render_box(stats: &ComprehensiveStats, scale_min: f64, scale_max: f64, width: usize) -> String {
    let last = width.saturating_sub(1);
    let span = scale_max - scale_min;
    let column = |v: f64| {
        if span <= 0.0 {
            return 0;
        }
        let pos = ((v - scale_min) / span * last as f64).round();
        (pos.max(0.0) as usize).min(last)
    };

    let q1 = column(stats.summary.q1);
    let median = column(stats.summary.median);
    let q3 = column(stats.summary.q3);
    let low = column(stats.whiskers.low).min(q1);
    let high = column(stats.whiskers.high).max(q3);

    let mut line = vec![' '; width];
    line[low..=high].fill('-');
    line[q1..=q3].fill('=');
    line[low] = '|';
    line[high] = '|';
    line[q1] = '[';
    line[q3] = ']';
    line[median] = '#';
    line.into_iter().collect::<String>().trim_end().to_owned()
}
