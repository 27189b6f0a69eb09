//! Statistical core for report turnaround-time analysis.
//!
//! This crate turns a measurement series (values paired index-by-index with
//! timestamps) into the numbers needed to compare a period before an
//! intervention with a period after it:
//!
//! - **Range filtering**: select the values whose timestamp falls in an open interval
//! - **Summary**: median, quartiles and interquartile range
//! - **Descriptive statistics**: population mean, standard deviation, min and max
//! - **Difference testing**: Welch's unequal-variance t-test
//!
//! Every routine is a pure function over slices. Failures are reported as
//! [`ErrorKind`] values; nothing is printed or logged.
//!
//! # Modules
//!
//! - [`range`]: Time-range subsetting with exclusive bounds
//! - [`summary`]: Median and IQR
//! - [`descriptive`]: Mean, standard deviation and friends
//! - [`percentiles`]: Linearly interpolated percentiles
//! - [`difference`]: Welch's t-test
//! - [`comprehensive`]: All of the above for one group, plus box plot whiskers
//!
//! # Examples
//!
//! ## Comparing two periods
//!
//! ```
//! use turnaround_stats::{difference::welch_t_test, range::filter_by_range, summary::summarize};
//!
//! let days = [1, 2, 3, 4, 5, 6, 7, 8];
//! let minutes = [95.0, 120.0, 80.0, 110.0, 60.0, 45.0, 70.0, 50.0];
//!
//! let before = filter_by_range(&days, &minutes, None, Some(5)).unwrap();
//! let after = filter_by_range(&days, &minutes, Some(4), None).unwrap();
//! assert_eq!(before, vec![95.0, 120.0, 80.0, 110.0]);
//! assert_eq!(after, vec![60.0, 45.0, 70.0, 50.0]);
//!
//! let before_summary = summarize(&before).unwrap();
//! assert_eq!(before_summary.median, 102.5);
//!
//! let test = welch_t_test(&before, &after).unwrap();
//! assert!(test.statistic > 0.0);
//! assert!(test.p_value < 0.05);
//! ```
//!
//! ## Mean and standard deviation
//!
//! ```
//! use turnaround_stats::descriptive::mean_and_stddev;
//!
//! let stats = mean_and_stddev(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
//! assert_eq!(stats.mean, 3.0);
//! ```

pub use self::error::ErrorKind;

pub mod comprehensive;
pub mod descriptive;
pub mod difference;
mod error;
pub mod percentiles;
pub mod range;
pub mod summary;
