use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use turnaround_stats::{
    ErrorKind,
    comprehensive::ComprehensiveStats,
    descriptive::{MeanStdDev, mean_and_stddev},
    difference::WelchTest,
};

use crate::data::Timestamp;

/// Before/after comparison of every requested measurement column
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    /// Time the report was generated
    pub generated_at: DateTime<Utc>,
    /// Exam table the measurements were read from
    pub source: PathBuf,
    /// Baseline period: exams completed strictly before this instant
    pub before: Timestamp,
    /// Follow-up period: exams completed strictly after this instant
    pub after: Timestamp,
    pub columns: Vec<ColumnComparison>,
}

/// Comparison of one measurement column between the two periods
#[derive(Debug, Clone, Serialize)]
pub struct ColumnComparison {
    pub column: String,
    pub before: GroupReport,
    pub after: GroupReport,
    /// Welch's t-test of before vs after; absent when a group has fewer than two exams
    pub welch: Option<WelchTest>,
}

/// Statistics of one period of one measurement column
#[derive(Debug, Clone, Serialize)]
pub struct GroupReport {
    #[serde(flatten)]
    pub stats: ComprehensiveStats,
    /// Population mean and standard deviation, when requested
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_std_dev: Option<MeanStdDev>,
}

impl GroupReport {
    /// Summarizes one group of measurements, adding mean and standard deviation if `with_mean`
    pub fn from_values(values: &[f64], with_mean: bool) -> Result<Self, ErrorKind> {
        Ok(Self {
            stats: ComprehensiveStats::new(values)?,
            mean_std_dev: with_mean.then(|| mean_and_stddev(values)).transpose()?,
        })
    }
}

/// Statistics of one measurement column within a single time window
#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    pub column: String,
    pub from: Option<Timestamp>,
    pub until: Option<Timestamp>,
    pub group: GroupReport,
}
