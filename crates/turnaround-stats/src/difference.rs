//! Two-sample difference testing.

use statrs::function::beta::beta_reg;

use crate::{ErrorKind, descriptive::mean_and_variance};

/// Result of Welch's unequal-variance t-test.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WelchTest {
    /// The t statistic, `(mean(a) - mean(b)) / standard_error`.
    ///
    /// Infinite when both groups are constant with different means; serialized
    /// as the string `"inf"` or `"-inf"` since JSON has no infinity.
    #[cfg_attr(feature = "serde", serde(with = "signed_infinity"))]
    pub statistic: f64,
    /// Two-sided p-value under the Student t distribution.
    pub p_value: f64,
    /// Welch-Satterthwaite degrees of freedom.
    pub degrees_of_freedom: f64,
    /// `mean(a) - mean(b)`.
    pub mean_difference: f64,
    /// `sqrt(var(a) / n_a + var(b) / n_b)` with sample variances.
    pub standard_error: f64,
}

/// Tests whether two samples have different means without assuming equal
/// variances.
///
/// Sample variances use `n - 1` in the denominator. Both groups need at least
/// two observations, otherwise [`ErrorKind::InsufficientSamples`] is returned.
///
/// When both groups have zero variance the standard error is zero: equal means
/// then give a statistic of `0` and a p-value of `1`, different means give an
/// infinite statistic and a p-value of `0`. The degrees of freedom fall back to
/// `n_a + n_b - 2` in that case.
///
/// # Examples
///
/// ```
/// use turnaround_stats::difference::welch_t_test;
///
/// let before = [30.0, 42.0, 35.0, 51.0, 38.0];
/// let after = [30.0, 42.0, 35.0, 51.0, 38.0];
/// let test = welch_t_test(&before, &after).unwrap();
/// assert_eq!(test.statistic, 0.0);
/// assert!((test.p_value - 1.0).abs() < 1e-12);
/// ```
#[expect(clippy::cast_precision_loss)]
pub fn welch_t_test(first: &[f64], second: &[f64]) -> Result<WelchTest, ErrorKind> {
    let insufficient = || ErrorKind::InsufficientSamples {
        first: first.len(),
        second: second.len(),
    };
    let (mean_a, var_a) = mean_and_variance(first, 1).ok_or_else(insufficient)?;
    let (mean_b, var_b) = mean_and_variance(second, 1).ok_or_else(insufficient)?;
    let (n_a, n_b) = (first.len() as f64, second.len() as f64);

    let se2_a = var_a / n_a;
    let se2_b = var_b / n_b;
    let se2 = se2_a + se2_b;
    let standard_error = se2.sqrt();
    let mean_difference = mean_a - mean_b;

    if standard_error == 0.0 {
        let (statistic, p_value) = if mean_difference == 0.0 {
            (0.0, 1.0)
        } else {
            (mean_difference.signum() * f64::INFINITY, 0.0)
        };
        return Ok(WelchTest {
            statistic,
            p_value,
            degrees_of_freedom: n_a + n_b - 2.0,
            mean_difference,
            standard_error,
        });
    }

    let statistic = mean_difference / standard_error;
    let degrees_of_freedom =
        se2.powi(2) / (se2_a.powi(2) / (n_a - 1.0) + se2_b.powi(2) / (n_b - 1.0));

    Ok(WelchTest {
        statistic,
        p_value: two_sided_p_value(statistic, degrees_of_freedom),
        degrees_of_freedom,
        mean_difference,
        standard_error,
    })
}

/// `P(|T| >= |t|)` for a Student t variable with `df` degrees of freedom.
fn two_sided_p_value(t: f64, df: f64) -> f64 {
    let x = df / (df + t * t);
    beta_reg(df / 2.0, 0.5, x.clamp(0.0, 1.0))
}

/// Serializes infinities as `"inf"`/`"-inf"` and other values as numbers.
#[cfg(feature = "serde")]
mod signed_infinity {
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(super) fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if value.is_infinite() {
            serializer.serialize_str(if value.is_sign_negative() { "-inf" } else { "inf" })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Number(value) => Ok(value),
            Repr::Text(text) => match text.as_str() {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                other => Err(D::Error::custom(format!(
                    "expected a number, \"inf\" or \"-inf\", got \"{other}\""
                ))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        assert!(
            (actual - expected).abs() < tol,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_identical_samples() {
        let values = [12.0, 40.0, 33.0, 8.0, 61.0, 27.0];
        let test = welch_t_test(&values, &values).unwrap();
        assert_close(test.statistic, 0.0, 1e-12);
        assert_close(test.p_value, 1.0, 1e-9);
        assert_eq!(test.mean_difference, 0.0);
    }

    #[test]
    fn test_known_values() {
        // a: mean 3, var 2.5; b: mean 6, var 2.5; se = 1, t = -3, df = 8
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [4.0, 5.0, 6.0, 7.0, 8.0];
        let test = welch_t_test(&a, &b).unwrap();
        assert_close(test.statistic, -3.0, 1e-12);
        assert_close(test.degrees_of_freedom, 8.0, 1e-9);
        assert_close(test.standard_error, 1.0, 1e-12);
        assert_close(test.p_value, 0.017_071_681_233_782_57, 1e-6);
    }

    #[test]
    fn test_unequal_variances() {
        let a = [1.0, 2.0, 3.0];
        let b = [10.0, 20.0, 30.0, 40.0];
        let test = welch_t_test(&a, &b).unwrap();
        // var(a) = 1, var(b) = 500/3
        let se2_a = 1.0 / 3.0;
        let se2_b = (500.0 / 3.0) / 4.0;
        let df = (se2_a + se2_b) * (se2_a + se2_b) / (se2_a * se2_a / 2.0 + se2_b * se2_b / 3.0);
        assert_close(test.degrees_of_freedom, df, 1e-9);
        assert!(test.statistic < 0.0);
        assert!(test.p_value > 0.0 && test.p_value < 0.1);
    }

    #[test]
    fn test_symmetric_in_sign() {
        let a = [3.0, 9.0, 4.0, 7.0];
        let b = [12.0, 15.0, 10.0, 19.0, 11.0];
        let ab = welch_t_test(&a, &b).unwrap();
        let ba = welch_t_test(&b, &a).unwrap();
        assert_close(ab.statistic, -ba.statistic, 1e-12);
        assert_close(ab.p_value, ba.p_value, 1e-12);
    }

    #[test]
    fn test_constant_groups() {
        let same = welch_t_test(&[5.0, 5.0], &[5.0, 5.0, 5.0]).unwrap();
        assert_eq!(same.statistic, 0.0);
        assert_eq!(same.p_value, 1.0);
        assert_eq!(same.degrees_of_freedom, 3.0);

        let different = welch_t_test(&[5.0, 5.0], &[7.0, 7.0]).unwrap();
        assert_eq!(different.statistic, f64::NEG_INFINITY);
        assert_eq!(different.p_value, 0.0);
    }

    #[test]
    fn test_insufficient_samples() {
        assert_eq!(
            welch_t_test(&[1.0], &[1.0, 2.0, 3.0]),
            Err(ErrorKind::InsufficientSamples {
                first: 1,
                second: 3
            })
        );
        assert_eq!(
            welch_t_test(&[1.0, 2.0], &[]),
            Err(ErrorKind::InsufficientSamples {
                first: 2,
                second: 0
            })
        );
    }
}
