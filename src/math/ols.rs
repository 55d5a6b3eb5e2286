//! Ordinary least squares solver.
//!
//! We solve
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - SVD, because it handles tall design matrices and exposes the singular
//!   values we need for a rank check.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - Rank deficiency is an error, not a minimum-norm answer: a fit with
//!   collinear columns has no unique coefficients to report.

use log::debug;
use nalgebra::{DMatrix, DVector};

use crate::error::FitError;

/// Solution of a least squares problem.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub coefficients: DVector<f64>,
    /// Sum of squared residuals at the solution.
    ///
    /// Computed as `‖y - Xβ‖²` from the returned coefficients; this is the same
    /// quantity LAPACK-style solvers report alongside the solution.
    pub rss: f64,
    pub rank: usize,
}

/// Relative tolerance below which a singular value counts as zero.
///
/// Same convention as LAPACK's `gelsd` default: `ε · max(rows, cols)`.
pub fn rank_tolerance(rows: usize, cols: usize) -> f64 {
    f64::EPSILON * rows.max(cols) as f64
}

/// Solve a least squares problem using SVD.
///
/// Fails with `SingularMatrix` if the design matrix is not of full column rank.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<LeastSquares, FitError> {
    let (rows, cols) = x.shape();
    let svd = x.clone().svd(true, true);

    let sv_max = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    let eps = sv_max * rank_tolerance(rows, cols);
    let rank = svd.rank(eps);
    debug!("svd {rows}x{cols}: sigma_max={sv_max:.3e} rank={rank}");

    if rank < cols || sv_max == 0.0 {
        return Err(FitError::SingularMatrix { rank, columns: cols });
    }

    let beta = svd
        .solve(y, eps)
        .map_err(|_| FitError::SingularMatrix { rank, columns: cols })?;
    if !beta.iter().all(|v| v.is_finite()) {
        return Err(FitError::SingularMatrix { rank, columns: cols });
    }

    let residuals = y - x * &beta;
    let rss = residuals.norm_squared();

    Ok(LeastSquares {
        coefficients: beta,
        rss,
        rank,
    })
}
