use std::cmp::Ordering;

use crate::ErrorKind;

/// Precomputed percentile values for a dataset.
///
/// This structure stores percentile-value pairs for efficient lookup
/// of commonly used percentile points.
///
/// # Examples
///
/// ```
/// use turnaround_stats::percentiles::Percentiles;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
/// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]).unwrap();
///
/// assert_eq!(percentiles.get(50.0), Some(5.5));
/// assert_eq!(percentiles.get(25.0), Some(3.25));
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Percentiles {
    /// Percentile-value pairs in the order they were requested.
    /// Each tuple contains (percentile, value) where percentile is 0.0-100.0.
    values: Vec<(f64, f64)>,
}

impl Percentiles {
    /// Computes percentiles from sorted values.
    ///
    /// Returns [`ErrorKind::EmptyInput`] if `sorted_values` is empty.
    ///
    /// # Panics
    ///
    /// Panics if `sorted_values` is not sorted in ascending order (see
    /// [`is_ascending`]), or if a percentile point lies outside `0.0..=100.0`.
    pub fn from_sorted(sorted_values: &[f64], percentile_points: &[f64]) -> Result<Self, ErrorKind> {
        assert!(
            is_ascending(sorted_values),
            "values must be sorted in ascending order"
        );

        let values = percentile_points
            .iter()
            .map(|&p| compute_percentile(sorted_values, p).map(|value| (p, value)))
            .collect::<Option<Vec<_>>>()
            .ok_or(ErrorKind::EmptyInput)?;
        Ok(Self { values })
    }

    /// Computes percentiles from unsorted values.
    ///
    /// The values are copied and sorted; the caller's slice is left untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use turnaround_stats::percentiles::Percentiles;
    ///
    /// let values = vec![5.0, 2.0, 8.0, 1.0, 9.0];
    /// let percentiles = Percentiles::new(&values, &[25.0, 50.0, 75.0]).unwrap();
    ///
    /// assert_eq!(percentiles.get(50.0), Some(5.0));
    /// ```
    pub fn new(values: &[f64], percentile_points: &[f64]) -> Result<Self, ErrorKind> {
        let sorted = sorted_copy(values);
        Self::from_sorted(&sorted, percentile_points)
    }

    /// Gets the value at a specific percentile.
    ///
    /// Returns `None` if the percentile was not precomputed.
    #[must_use]
    pub fn get(&self, percentile: f64) -> Option<f64> {
        self.values.iter().find_map(|(p, value)| {
            if (*p - percentile).abs() < f64::EPSILON {
                Some(*value)
            } else {
                None
            }
        })
    }

    /// Returns an iterator over all (percentile, value) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.values.iter().copied()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[(f64, f64)] {
        &self.values
    }
}

/// Computes a single percentile of unsorted values.
///
/// Uses the same linear interpolation as [`compute_percentile`] on a sorted copy.
///
/// # Examples
///
/// ```
/// use turnaround_stats::{ErrorKind, percentiles::percentile};
///
/// assert_eq!(percentile(&[4.0, 1.0, 3.0, 2.0], 50.0), Ok(2.5));
/// assert_eq!(percentile(&[], 50.0), Err(ErrorKind::EmptyInput));
/// ```
pub fn percentile(values: &[f64], percentile: f64) -> Result<f64, ErrorKind> {
    compute_percentile(&sorted_copy(values), percentile).ok_or(ErrorKind::EmptyInput)
}

/// Computes a single percentile value from sorted data.
///
/// Interpolates linearly between the two closest ranks: the `p`-th percentile
/// of `n` values sits at fractional rank `p / 100 * (n - 1)`.
///
/// Returns `None` if the input is empty.
///
/// # Panics
///
/// Panics if `percentile` lies outside `0.0..=100.0`.
///
/// # Examples
///
/// ```
/// use turnaround_stats::percentiles::compute_percentile;
///
/// let values = vec![1.0, 2.0, 3.0, 4.0];
///
/// assert_eq!(compute_percentile(&values, 50.0), Some(2.5));
/// assert_eq!(compute_percentile(&values, 25.0), Some(1.75));
/// assert_eq!(compute_percentile(&[], 25.0), None);
/// ```
#[expect(
    clippy::cast_sign_loss,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]
#[must_use]
pub fn compute_percentile(sorted_values: &[f64], percentile: f64) -> Option<f64> {
    assert!(
        (0.0..=100.0).contains(&percentile),
        "percentile must be within 0..=100, got {percentile}"
    );
    let last = sorted_values.len().checked_sub(1)?;
    let rank = percentile / 100.0 * last as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(last);
    let (lo, hi) = (sorted_values[lower], sorted_values[upper]);
    if lower == upper {
        return Some(lo);
    }
    Some(lo + (hi - lo) * (rank - lower as f64))
}

/// Returns `true` if no value is followed by a strictly smaller one.
///
/// NaN compares with nothing, so it may sit anywhere. Anything sorted with
/// [`f64::total_cmp`] or [`f64::partial_cmp`] passes.
#[must_use]
pub fn is_ascending(values: &[f64]) -> bool {
    values.is_sorted_by(|a, b| a.partial_cmp(b) != Some(Ordering::Greater))
}

pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_value() {
        for p in [0.0, 25.0, 50.0, 75.0, 100.0] {
            assert_eq!(compute_percentile(&[42.0], p), Some(42.0));
        }
    }

    #[test]
    fn test_extremes_are_min_and_max() {
        let values = [3.0, 7.0, 11.0, 20.0];
        assert_eq!(compute_percentile(&values, 0.0), Some(3.0));
        assert_eq!(compute_percentile(&values, 100.0), Some(20.0));
    }

    #[test]
    fn test_linear_interpolation() {
        let values = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(compute_percentile(&values, 25.0), Some(20.0));
        assert_eq!(compute_percentile(&values, 50.0), Some(30.0));
        assert_eq!(compute_percentile(&values, 37.5), Some(25.0));
        assert_eq!(compute_percentile(&values, 87.5), Some(45.0));
    }

    #[test]
    fn test_new_does_not_mutate_input() {
        let values = vec![9.0, 1.0, 5.0];
        let percentiles = Percentiles::new(&values, &[50.0]).unwrap();
        assert_eq!(values, vec![9.0, 1.0, 5.0]);
        assert_eq!(percentiles.as_slice(), &[(50.0, 5.0)]);
    }

    #[test]
    fn test_get_missing_point() {
        let percentiles = Percentiles::new(&[1.0, 2.0, 3.0], &[50.0]).unwrap();
        assert_eq!(percentiles.get(50.0), Some(2.0));
        assert_eq!(percentiles.get(75.0), None);
        assert_eq!(percentiles.iter().count(), 1);
    }

    #[test]
    fn test_is_ascending() {
        assert!(is_ascending(&[]));
        assert!(is_ascending(&[1.0, 1.0, 2.0]));
        assert!(is_ascending(&[-0.0, 0.0, 0.0, -0.0]));
        assert!(is_ascending(&[1.0, 3.0, f64::NAN]));
        assert!(!is_ascending(&[2.0, 1.0]));
    }

    #[test]
    fn test_nan_does_not_panic() {
        let percentiles = Percentiles::new(&[3.0, f64::NAN, 1.0, 2.0], &[0.0, 100.0]).unwrap();
        assert_eq!(percentiles.get(0.0), Some(1.0));
        assert!(percentiles.get(100.0).unwrap().is_nan());
        assert_eq!(percentile(&[f64::NAN, 5.0, 1.0], 0.0), Ok(1.0));
    }

    #[test]
    #[should_panic(expected = "values must be sorted in ascending order")]
    fn test_from_sorted_rejects_unsorted() {
        let _ = Percentiles::from_sorted(&[3.0, 1.0], &[50.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(
            Percentiles::new(&[], &[50.0]),
            Err(ErrorKind::EmptyInput)
        ));
        assert_eq!(percentile(&[], 50.0), Err(ErrorKind::EmptyInput));
    }
}
