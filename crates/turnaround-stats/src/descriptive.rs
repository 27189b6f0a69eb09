use crate::{
    ErrorKind,
    percentiles::{is_ascending, sorted_copy},
};

/// Population mean and standard deviation of a dataset.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeanStdDev {
    pub mean: f64,
    /// Population standard deviation (divides by `n`, not `n - 1`).
    pub std_dev: f64,
}

/// Computes the population mean and population standard deviation.
///
/// Turnaround times are heavily skewed, so the median and IQR from
/// [`summarize`](crate::summary::summarize) are usually the better description;
/// this is provided for completeness.
///
/// # Examples
///
/// ```
/// use turnaround_stats::{ErrorKind, descriptive::mean_and_stddev};
///
/// let stats = mean_and_stddev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
/// assert_eq!(stats.mean, 5.0);
/// assert_eq!(stats.std_dev, 2.0);
///
/// assert_eq!(mean_and_stddev(&[]), Err(ErrorKind::EmptyInput));
/// ```
pub fn mean_and_stddev(values: &[f64]) -> Result<MeanStdDev, ErrorKind> {
    let (mean, variance) = mean_and_variance(values, 0).ok_or(ErrorKind::EmptyInput)?;
    Ok(MeanStdDev {
        mean,
        std_dev: variance.sqrt(),
    })
}

/// Mean and variance with `ddof` delta degrees of freedom (divisor `n - ddof`).
///
/// Returns `None` if there are not more than `ddof` values.
#[expect(clippy::cast_precision_loss)]
pub(crate) fn mean_and_variance(values: &[f64], ddof: usize) -> Option<(f64, f64)> {
    let count = values.len();
    if count <= ddof {
        return None;
    }
    let mean = values.iter().sum::<f64>() / count as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - ddof) as f64;
    Some((mean, variance))
}

/// Descriptive statistics summarizing a dataset.
///
/// This structure contains common measures of central tendency, dispersion,
/// and spread for a dataset of `f64` values.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DescriptiveStats {
    /// The number of values in the dataset.
    pub count: usize,
    /// The minimum value in the dataset.
    pub min: f64,
    /// The maximum value in the dataset.
    pub max: f64,
    /// The arithmetic mean (average) of the dataset.
    pub mean: f64,
    /// The population variance of the dataset.
    pub variance: f64,
    /// The population standard deviation of the dataset.
    pub std_dev: f64,
}

impl DescriptiveStats {
    /// Computes descriptive statistics from unsorted values.
    ///
    /// # Examples
    ///
    /// ```
    /// # use turnaround_stats::descriptive::DescriptiveStats;
    /// let values = [5.0, 2.0, 4.0, 1.0, 3.0];
    /// let stats = DescriptiveStats::new(&values).unwrap();
    /// assert_eq!(stats.count, 5);
    /// assert_eq!(stats.min, 1.0);
    /// assert_eq!(stats.max, 5.0);
    /// assert_eq!(stats.mean, 3.0);
    /// ```
    pub fn new(values: &[f64]) -> Result<Self, ErrorKind> {
        Self::from_sorted(&sorted_copy(values))
    }

    /// Computes descriptive statistics from pre-sorted values.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order.
    pub fn from_sorted(sorted_values: &[f64]) -> Result<Self, ErrorKind> {
        assert!(
            is_ascending(sorted_values),
            "values must be sorted in ascending order"
        );

        let (Some(&min), Some(&max)) = (sorted_values.first(), sorted_values.last()) else {
            return Err(ErrorKind::EmptyInput);
        };
        let (mean, variance) = mean_and_variance(sorted_values, 0).ok_or(ErrorKind::EmptyInput)?;

        Ok(Self {
            count: sorted_values.len(),
            min,
            max,
            mean,
            variance,
            std_dev: variance.sqrt(),
        })
    }
}
