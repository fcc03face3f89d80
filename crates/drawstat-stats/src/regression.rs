//! Two-variable ordinary least-squares regression.
//!
//! [`LinearRegression::fit`] fits `y = slope * x + intercept` and reports
//! Pearson's correlation coefficient `r` alongside the line.
//!
//! Sums are accumulated around the means (two passes over the data), which
//! keeps the result stable for columns with large offsets such as day
//! numbers or years.
//!
//! # Examples
//!
//! ```
//! use drawstat_stats::regression::{LinearRegression, RegressionError};
//!
//! let fit = LinearRegression::fit(&[1.0, 2.0, 3.0], &[3.0, 5.0, 7.0]).unwrap();
//! assert!((fit.slope - 2.0).abs() < 1e-12);
//! assert!((fit.intercept - 1.0).abs() < 1e-12);
//!
//! let err = LinearRegression::fit(&[1.0, 1.0, 1.0], &[3.0, 5.0, 7.0]).unwrap_err();
//! assert!(matches!(err, RegressionError::DegenerateInput { .. }));
//! ```

use std::fmt;

/// Identifies one of the two regression variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("x"),
            Axis::Y => f.write_str("y"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RegressionError {
    #[display("sample lengths differ: x has {x_len} values, y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },
    #[display("at least 2 paired samples are required, got {count}")]
    InsufficientData { count: usize },
    #[display("{axis} values have zero variance")]
    DegenerateInput { axis: Axis },
}

/// Result of an ordinary least-squares fit of `y` on `x`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    /// Slope of the fitted line.
    pub slope: f64,
    /// Intercept of the fitted line.
    pub intercept: f64,
    /// Pearson's correlation coefficient, within `[-1, 1]`.
    pub r: f64,
    /// Number of paired samples used.
    pub n: usize,
}

impl LinearRegression {
    /// Fits a least-squares line through the paired samples `(xs[i], ys[i])`.
    ///
    /// # Errors
    ///
    /// * [`RegressionError::LengthMismatch`] - `xs` and `ys` differ in length
    /// * [`RegressionError::InsufficientData`] - fewer than 2 pairs
    /// * [`RegressionError::DegenerateInput`] - either variable is constant
    #[expect(clippy::cast_precision_loss)]
    pub fn fit(xs: &[f64], ys: &[f64]) -> Result<Self, RegressionError> {
        if xs.len() != ys.len() {
            return Err(RegressionError::LengthMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        let count = xs.len();
        if count < 2 {
            return Err(RegressionError::InsufficientData { count });
        }

        let n = count as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;

        let (mut sxx, mut syy, mut sxy) = (0.0, 0.0, 0.0);
        for (x, y) in xs.iter().zip(ys) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            sxx += dx * dx;
            syy += dy * dy;
            sxy += dx * dy;
        }

        if is_constant(xs) {
            return Err(RegressionError::DegenerateInput { axis: Axis::X });
        }
        if is_constant(ys) {
            return Err(RegressionError::DegenerateInput { axis: Axis::Y });
        }

        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;
        let r = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);

        Ok(Self {
            slope,
            intercept,
            r,
            n: count,
        })
    }

}

// Exact comparison: the centred sum of squares of a constant column can
// carry a rounding residue, while a tiny spread on a large offset is real.
#[allow(clippy::float_cmp)]
fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn test_identical_columns_have_r_one() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        let fit = LinearRegression::fit(&values, &values).unwrap();
        assert!((fit.r - 1.0).abs() < TOLERANCE);
        assert!((fit.slope - 1.0).abs() < TOLERANCE);
        assert!(fit.intercept.abs() < TOLERANCE);
        assert_eq!(fit.n, 5);
    }

    #[test]
    fn test_reversed_columns_have_r_minus_one() {
        let fit =
            LinearRegression::fit(&[1.0, 2.0, 3.0, 4.0, 5.0], &[5.0, 4.0, 3.0, 2.0, 1.0]).unwrap();
        assert!((fit.r + 1.0).abs() < TOLERANCE);
        assert!((fit.slope + 1.0).abs() < TOLERANCE);
        assert!((fit.intercept - 6.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_known_partial_correlation() {
        // x = [1, 2, 3, 4], y = [2, 1, 4, 3]: sxy = 3, sxx = syy = 5
        let fit = LinearRegression::fit(&[1.0, 2.0, 3.0, 4.0], &[2.0, 1.0, 4.0, 3.0]).unwrap();
        assert!((fit.r - 0.6).abs() < TOLERANCE);
        assert!((fit.slope - 0.6).abs() < TOLERANCE);
        assert!((fit.intercept - 1.0).abs() < TOLERANCE);
    }

    #[test]
    fn test_constant_column_is_degenerate() {
        let err = LinearRegression::fit(&[1.0, 2.0, 3.0], &[7.0, 7.0, 7.0]).unwrap_err();
        assert_eq!(err, RegressionError::DegenerateInput { axis: Axis::Y });

        let err = LinearRegression::fit(&[0.1, 0.1, 0.1], &[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err, RegressionError::DegenerateInput { axis: Axis::X });
    }

    #[test]
    fn test_zero_column_is_degenerate() {
        let err = LinearRegression::fit(&[0.0, 0.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, RegressionError::DegenerateInput { axis: Axis::X });
    }

    #[test]
    fn test_insufficient_data() {
        assert_eq!(
            LinearRegression::fit(&[1.0], &[1.0]).unwrap_err(),
            RegressionError::InsufficientData { count: 1 }
        );
        assert_eq!(
            LinearRegression::fit(&[], &[]).unwrap_err(),
            RegressionError::InsufficientData { count: 0 }
        );
    }

    #[test]
    fn test_length_mismatch() {
        assert_eq!(
            LinearRegression::fit(&[1.0, 2.0], &[1.0]).unwrap_err(),
            RegressionError::LengthMismatch { x_len: 2, y_len: 1 }
        );
    }

    #[test]
    fn test_small_spread_on_large_offset_is_not_degenerate() {
        let fit = LinearRegression::fit(&[1e8, 1e8 + 1.0, 1e8 + 2.0], &[1.0, 2.0, 3.0]).unwrap();
        assert!((fit.r - 1.0).abs() < TOLERANCE);
        assert!((fit.slope - 1.0).abs() < TOLERANCE);

        let fit = LinearRegression::fit(&[1.0, 2.0, 3.0], &[5e12, 5e12 + 0.5, 5e12 + 1.0]).unwrap();
        assert!((fit.r - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_large_offset_is_stable() {
        let xs = [2_460_000.0, 2_460_001.0, 2_460_002.0, 2_460_003.0];
        let ys = [1.0, 2.0, 3.0, 4.0];
        let fit = LinearRegression::fit(&xs, &ys).unwrap();
        assert!((fit.r - 1.0).abs() < TOLERANCE);
    }
}
