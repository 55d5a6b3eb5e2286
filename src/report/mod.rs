//! Reporting utilities: residuals and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{Dataset, FitResult, RowResidual};
use crate::error::FitError;
use crate::fit::layout_of;
use crate::models::predict;

/// Compute fitted values and residuals for each row.
pub fn compute_residuals(data: &Dataset, fit: &FitResult) -> Result<Vec<RowResidual>, FitError> {
    if data.n_predictors() != fit.n_predictors {
        return Err(FitError::malformed(format!(
            "dataset has {} predictors, fit expects {}",
            data.n_predictors(),
            fit.n_predictors
        )));
    }

    let layout = layout_of(fit);
    let y = data.response();
    let out = (0..data.n_rows())
        .map(|r| {
            let y_fit = predict(&layout, &fit.coefficients, &data.predictors_of(r));
            RowResidual {
                row: r + 1,
                y_obs: y[r],
                y_fit,
                residual: y[r] - y_fit,
            }
        })
        .collect();
    Ok(out)
}
