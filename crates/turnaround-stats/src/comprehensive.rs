use crate::{
    ErrorKind, descriptive::DescriptiveStats, percentiles::sorted_copy, summary::Summary,
};

/// Whisker reach of a box plot, as a multiple of the IQR.
pub const WHISKER_IQR_FACTOR: f64 = 1.5;

/// Comprehensive statistical overview of one group of measurements.
///
/// This structure combines:
/// - Basic descriptive statistics (count, min, max, mean, standard deviation)
/// - The median/quartile [`Summary`]
/// - Box plot whiskers derived from the quartiles
///
/// # Examples
///
/// ```
/// use turnaround_stats::comprehensive::ComprehensiveStats;
///
/// let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let stats = ComprehensiveStats::new(&values).unwrap();
///
/// assert_eq!(stats.stats.mean, 5.5);
/// assert_eq!(stats.summary.median, 5.5);
/// assert_eq!(stats.whiskers.low, 1.0);
/// assert_eq!(stats.whiskers.high, 10.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComprehensiveStats {
    /// Basic descriptive statistics for the dataset.
    pub stats: DescriptiveStats,
    /// Median, quartiles and IQR.
    pub summary: Summary,
    /// Box plot whiskers.
    pub whiskers: Whiskers,
}

/// The ends of the box plot whiskers.
///
/// `low` is the smallest value not below `q1 - 1.5 * IQR` and `high` the largest
/// value not above `q3 + 1.5 * IQR`. Values beyond the whiskers are outliers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Whiskers {
    pub low: f64,
    pub high: f64,
}

impl ComprehensiveStats {
    /// Computes comprehensive statistics from unsorted values.
    pub fn new(values: &[f64]) -> Result<Self, ErrorKind> {
        Self::from_sorted(&sorted_copy(values))
    }

    /// Computes comprehensive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    pub fn from_sorted(sorted_values: &[f64]) -> Result<Self, ErrorKind> {
        let stats = DescriptiveStats::from_sorted(sorted_values)?;
        let summary = Summary::from_sorted(sorted_values)?;

        let low_fence = summary.q1 - WHISKER_IQR_FACTOR * summary.iqr;
        let high_fence = summary.q3 + WHISKER_IQR_FACTOR * summary.iqr;
        let whiskers = Whiskers {
            low: sorted_values
                .iter()
                .copied()
                .find(|&v| v >= low_fence)
                .unwrap_or(summary.q1),
            high: sorted_values
                .iter()
                .copied()
                .rfind(|&v| v <= high_fence)
                .unwrap_or(summary.q3),
        };

        Ok(Self {
            stats,
            summary,
            whiskers,
        })
    }

    /// Number of values outside the whiskers.
    #[must_use]
    pub fn outlier_count(&self, values: &[f64]) -> usize {
        values
            .iter()
            .filter(|&&v| v < self.whiskers.low || v > self.whiskers.high)
            .count()
    }
}
