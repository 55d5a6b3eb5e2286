//! Summary statistics: total sum of squares, R², Pearson correlation.

use nalgebra::{DMatrix, DVector};

use crate::domain::CorrelationMatrix;

/// `Σ (y_i - ȳ)^2`.
pub fn total_sum_of_squares(y: &DVector<f64>) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    let mean = y.mean();
    y.iter().map(|v| (v - mean) * (v - mean)).sum()
}

/// Coefficient of determination `1 - rss / tss` for the response `y`.
///
/// A constant response has `tss = 0`; we report 1 for an exact fit and 0
/// otherwise instead of dividing by zero. "Zero" is relative to
/// `ε · n · ‖y‖²`, the rounding floor of a solve on data of this magnitude.
pub fn r_squared(rss: f64, y: &DVector<f64>) -> f64 {
    let tss = total_sum_of_squares(y);
    let floor = f64::EPSILON * y.len() as f64 * y.norm_squared();
    if tss > floor {
        return 1.0 - rss / tss;
    }
    if rss <= floor { 1.0 } else { 0.0 }
}

/// Pearson correlation between the columns of `data` (rows = observations).
///
/// The diagonal is exactly 1. Off-diagonal entries that involve a column with
/// zero variance are NaN.
pub fn correlation_matrix(data: &DMatrix<f64>) -> CorrelationMatrix {
    let (n, m) = data.shape();
    let means: Vec<f64> = (0..m).map(|c| data.column(c).mean()).collect();

    let centered = DMatrix::from_fn(n, m, |r, c| data[(r, c)] - means[c]);
    let cov = centered.transpose() * &centered;

    // Fill the upper triangle and mirror it so the result is exactly symmetric.
    let mut rows = vec![vec![0.0; m]; m];
    for i in 0..m {
        rows[i][i] = 1.0;
        for j in (i + 1)..m {
            let denom = (cov[(i, i)] * cov[(j, j)]).sqrt();
            let r = if denom > 0.0 {
                (cov[(i, j)] / denom).clamp(-1.0, 1.0)
            } else {
                f64::NAN
            };
            rows[i][j] = r;
            rows[j][i] = r;
        }
    }

    CorrelationMatrix { rows }
}
