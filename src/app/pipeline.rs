//! Shared "fit pipeline" logic.
//!
//! load -> fit (parallel across files) -> exports
//!
//! The CLI front-end only has to deal with presentation.

use crate::app::RunConfig;
use crate::domain::Dataset;
use crate::error::AppError;
use crate::fit::{BatchFit, fit_batch};
use crate::io::load_dataset;

/// All computed outputs of a single `mpf fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub inputs: Vec<(String, Dataset)>,
    pub fits: Vec<BatchFit>,
}

/// Load every input file and fit them.
///
/// Load failures abort the run; fit failures are kept per file.
pub fn run_fit(config: &RunConfig) -> Result<RunOutput, AppError> {
    let inputs = config
        .files
        .iter()
        .map(|path| Ok((path.display().to_string(), load_dataset(path, &config.format)?)))
        .collect::<Result<Vec<_>, AppError>>()?;

    let fits = fit_batch(&inputs, config.degree, &config.options);

    Ok(RunOutput { inputs, fits })
}

/// Write the optional JSON / residual exports for a single-file run.
pub fn write_exports(config: &RunConfig, run: &RunOutput) -> Result<(), AppError> {
    let (Some(entry), Some((_, data))) = (run.fits.first(), run.inputs.first()) else {
        return Ok(());
    };
    let fit = entry.result.as_ref().map_err(|e| AppError::from(e.clone()))?;

    if let Some(path) = &config.export_json {
        crate::io::write_result_json(path, &entry.label, fit)?;
    }
    if let Some(path) = &config.export_residuals {
        let residuals = crate::report::compute_residuals(data, fit)?;
        crate::io::write_residuals_csv(path, &residuals)?;
    }

    Ok(())
}
