//! Time-range subsetting of measurement series.
//!
//! A measurement series is a slice of values paired index-by-index with a slice
//! of timestamps. Filtering selects the values whose timestamp lies strictly
//! inside an [`Interval`]; it never reorders values relative to their timestamps.

use crate::ErrorKind;

/// An open time interval with at least one bound.
///
/// Both bounds are exclusive. There is no unbounded variant, so a filter that
/// keeps every value cannot be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interval<T> {
    /// Timestamps strictly before the bound.
    Before(T),
    /// Timestamps strictly after the bound.
    After(T),
    /// Timestamps strictly after `lower` and strictly before `upper`.
    Between { lower: T, upper: T },
}

impl<T> Interval<T>
where
    T: Ord,
{
    /// Builds an interval from optional bounds.
    ///
    /// Returns [`ErrorKind::MissingRange`] if both bounds are `None`.
    ///
    /// # Examples
    ///
    /// ```
    /// use turnaround_stats::{ErrorKind, range::Interval};
    ///
    /// assert_eq!(Interval::new(None, Some(10)), Ok(Interval::Before(10)));
    /// assert_eq!(Interval::<i32>::new(None, None), Err(ErrorKind::MissingRange));
    /// ```
    pub fn new(lower: Option<T>, upper: Option<T>) -> Result<Self, ErrorKind> {
        match (lower, upper) {
            (Some(lower), Some(upper)) => Ok(Self::Between { lower, upper }),
            (Some(lower), None) => Ok(Self::After(lower)),
            (None, Some(upper)) => Ok(Self::Before(upper)),
            (None, None) => Err(ErrorKind::MissingRange),
        }
    }

    /// Interval of everything strictly before `upper`.
    pub fn before(upper: T) -> Self {
        Self::Before(upper)
    }

    /// Interval of everything strictly after `lower`.
    pub fn after(lower: T) -> Self {
        Self::After(lower)
    }

    /// Interval of everything strictly between `lower` and `upper`.
    ///
    /// An interval with `lower >= upper` is valid and contains nothing.
    pub fn between(lower: T, upper: T) -> Self {
        Self::Between { lower, upper }
    }

    #[must_use]
    pub fn lower(&self) -> Option<&T> {
        match self {
            Self::Before(_) => None,
            Self::After(lower) | Self::Between { lower, .. } => Some(lower),
        }
    }

    #[must_use]
    pub fn upper(&self) -> Option<&T> {
        match self {
            Self::After(_) => None,
            Self::Before(upper) | Self::Between { upper, .. } => Some(upper),
        }
    }

    /// Returns `true` if `timestamp` lies strictly inside the interval.
    #[must_use]
    pub fn contains(&self, timestamp: &T) -> bool {
        self.lower().is_none_or(|lower| timestamp > lower)
            && self.upper().is_none_or(|upper| timestamp < upper)
    }

    /// Returns the indices of `timestamps` that fall inside the interval, in
    /// ascending order.
    ///
    /// With both bounds present the result is the intersection of the indices
    /// above `lower` and the indices below `upper`.
    #[must_use]
    pub fn indices(&self, timestamps: &[T]) -> Vec<usize> {
        let above = self
            .lower()
            .map(|lower| indices_where(timestamps, |ts| ts > lower));
        let below = self
            .upper()
            .map(|upper| indices_where(timestamps, |ts| ts < upper));

        match (above, below) {
            (Some(above), Some(below)) => intersect_sorted(&above, &below),
            (Some(indices), None) | (None, Some(indices)) => indices,
            (None, None) => vec![],
        }
    }

    /// Selects the values whose paired timestamp lies inside the interval.
    ///
    /// # Examples
    ///
    /// ```
    /// use turnaround_stats::range::Interval;
    ///
    /// let timestamps = [1, 5, 9, 12];
    /// let values = [10.0, 50.0, 90.0, 120.0];
    /// let selected = Interval::between(1, 12).select(&timestamps, &values).unwrap();
    /// assert_eq!(selected, vec![50.0, 90.0]);
    /// ```
    pub fn select<V>(&self, timestamps: &[T], values: &[V]) -> Result<Vec<V>, ErrorKind>
    where
        V: Clone,
    {
        if timestamps.len() != values.len() {
            return Err(ErrorKind::LengthMismatch {
                timestamps: timestamps.len(),
                values: values.len(),
            });
        }
        Ok(self
            .indices(timestamps)
            .into_iter()
            .map(|i| values[i].clone())
            .collect())
    }
}

/// Returns the values whose timestamp lies strictly between the given bounds.
///
/// Either bound may be omitted, but not both: omitting both is a usage error
/// reported as [`ErrorKind::MissingRange`]. The result keeps the original index
/// order and may be empty.
///
/// # Examples
///
/// ```
/// use turnaround_stats::{ErrorKind, range::filter_by_range};
///
/// let timestamps = [1, 2, 3];
/// let values = [10.0, 20.0, 30.0];
/// assert_eq!(filter_by_range(&timestamps, &values, None, Some(3)), Ok(vec![10.0, 20.0]));
/// assert_eq!(filter_by_range(&timestamps, &values, None, None), Err(ErrorKind::MissingRange));
/// ```
pub fn filter_by_range<T, V>(
    timestamps: &[T],
    values: &[V],
    lower: Option<T>,
    upper: Option<T>,
) -> Result<Vec<V>, ErrorKind>
where
    T: Ord,
    V: Clone,
{
    Interval::new(lower, upper)?.select(timestamps, values)
}

fn indices_where<T>(timestamps: &[T], mut pred: impl FnMut(&T) -> bool) -> Vec<usize> {
    timestamps
        .iter()
        .enumerate()
        .filter_map(|(i, ts)| pred(ts).then_some(i))
        .collect()
}

/// Intersection of two ascending index lists, kept ascending.
fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut out = Vec::with_capacity(a.len().min(b.len()));
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn minute(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn test_upper_bound_only() {
        let timestamps = [date(2017, 1, 1), date(2017, 6, 1), date(2018, 1, 1)];
        let values = [10.0, 20.0, 30.0];
        let result =
            filter_by_range(&timestamps, &values, None, Some(minute("2017-12-01T00:00"))).unwrap();
        assert_eq!(result, vec![10.0, 20.0]);
    }

    #[test]
    fn test_lower_bound_only() {
        let timestamps = [date(2017, 1, 1), date(2017, 6, 1), date(2018, 1, 1)];
        let values = [10.0, 20.0, 30.0];
        let result = filter_by_range(&timestamps, &values, Some(date(2017, 3, 1)), None).unwrap();
        assert_eq!(result, vec![20.0, 30.0]);
    }

    #[test]
    fn test_both_bounds() {
        let timestamps = [
            date(2017, 9, 1),
            date(2017, 11, 1),
            date(2018, 2, 1),
            date(2018, 5, 1),
        ];
        let values = [1.0, 2.0, 3.0, 4.0];
        let result = filter_by_range(
            &timestamps,
            &values,
            Some(minute("2017-10-01T00:00")),
            Some(minute("2018-04-01T00:00")),
        )
        .unwrap();
        assert_eq!(result, vec![2.0, 3.0]);
    }

    #[test]
    fn test_missing_range() {
        let timestamps = [date(2017, 1, 1)];
        let values = [1.0];
        assert_eq!(
            filter_by_range(&timestamps, &values, None, None),
            Err(ErrorKind::MissingRange)
        );
        assert_eq!(
            Interval::<NaiveDateTime>::new(None, None),
            Err(ErrorKind::MissingRange)
        );
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let timestamps = [1, 2, 3, 4, 5];
        let values = ['a', 'b', 'c', 'd', 'e'];
        assert_eq!(
            filter_by_range(&timestamps, &values, Some(2), Some(4)),
            Ok(vec!['c'])
        );
        assert_eq!(
            filter_by_range(&timestamps, &values, None, Some(1)),
            Ok(vec![])
        );
        assert_eq!(
            filter_by_range(&timestamps, &values, Some(5), None),
            Ok(vec![])
        );
    }

    #[test]
    fn test_preserves_index_order_for_unsorted_timestamps() {
        let timestamps = [7, 3, 9, 1, 5, 8];
        let values = [70, 30, 90, 10, 50, 80];
        let interval = Interval::between(2, 9);
        assert_eq!(interval.indices(&timestamps), vec![0, 1, 4, 5]);
        assert_eq!(
            interval.select(&timestamps, &values),
            Ok(vec![70, 30, 50, 80])
        );
    }

    #[test]
    fn test_intersection_matches_contains() {
        let timestamps = [4, 0, 6, 2, 8, 3, 7, 5, 1];
        for lower in 0..9 {
            for upper in 0..9 {
                let interval = Interval::between(lower, upper);
                let expected = (0..timestamps.len())
                    .filter(|&i| interval.contains(&timestamps[i]))
                    .collect::<Vec<_>>();
                assert_eq!(interval.indices(&timestamps), expected);
            }
        }
    }

    #[test]
    fn test_inverted_bounds_select_nothing() {
        let timestamps = [1, 2, 3];
        let values = [1.0, 2.0, 3.0];
        assert_eq!(
            Interval::between(3, 1).select(&timestamps, &values),
            Ok(vec![])
        );
    }

    #[test]
    fn test_length_mismatch() {
        let timestamps = [1, 2, 3];
        let values = [1.0, 2.0];
        assert_eq!(
            filter_by_range(&timestamps, &values, Some(0), None),
            Err(ErrorKind::LengthMismatch {
                timestamps: 3,
                values: 2
            })
        );
    }

    #[test]
    fn test_bound_accessors() {
        let interval = Interval::new(Some(1), Some(5)).unwrap();
        assert_eq!(interval.lower(), Some(&1));
        assert_eq!(interval.upper(), Some(&5));
        assert_eq!(Interval::before(5).lower(), None);
        assert_eq!(Interval::after(1).upper(), None);
    }
}
