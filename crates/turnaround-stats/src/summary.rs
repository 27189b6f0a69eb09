use crate::{
    ErrorKind,
    percentiles::{Percentiles, sorted_copy},
};

const QUARTILE_POINTS: [f64; 3] = [25.0, 50.0, 75.0];

/// Median and interquartile range of a dataset.
///
/// All three quantiles use linear interpolation between closest ranks
/// (see [`compute_percentile`](crate::percentiles::compute_percentile)).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary {
    /// The 50th percentile.
    pub median: f64,
    /// The 25th percentile.
    pub q1: f64,
    /// The 75th percentile.
    pub q3: f64,
    /// `q3 - q1`.
    pub iqr: f64,
}

impl Summary {
    /// Computes the summary of pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    pub fn from_sorted(sorted_values: &[f64]) -> Result<Self, ErrorKind> {
        let quartiles = Percentiles::from_sorted(sorted_values, &QUARTILE_POINTS)?;
        let &[(_, q1), (_, median), (_, q3)] = quartiles.as_slice() else {
            unreachable!("one value is computed per quartile point");
        };
        Ok(Self {
            median,
            q1,
            q3,
            iqr: q3 - q1,
        })
    }
}

/// Computes the median, quartiles and IQR of `values`.
///
/// The values are summarized from a sorted copy, so the caller's order is left
/// untouched. Fails with [`ErrorKind::EmptyInput`] on an empty slice.
///
/// # Examples
///
/// ```
/// use turnaround_stats::{ErrorKind, summary::summarize};
///
/// let summary = summarize(&[7.0, 1.0, 3.0, 5.0, 9.0]).unwrap();
/// assert_eq!(summary.median, 5.0);
/// assert_eq!(summary.q1, 3.0);
/// assert_eq!(summary.q3, 7.0);
/// assert_eq!(summary.iqr, 4.0);
///
/// assert_eq!(summarize(&[]), Err(ErrorKind::EmptyInput));
/// ```
pub fn summarize(values: &[f64]) -> Result<Summary, ErrorKind> {
    Summary::from_sorted(&sorted_copy(values))
}
