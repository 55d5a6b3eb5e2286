//! Fit several independent datasets in parallel.
//!
//! Each fit allocates its own design matrix and result, so there is nothing to
//! coordinate; rayon's indexed `collect` keeps the input order.

use rayon::prelude::*;

use crate::domain::{Dataset, FitOptions, FitResult};
use crate::error::FitError;
use crate::fit::fitter::fit;

/// Result of one entry in a batch.
#[derive(Debug, Clone)]
pub struct BatchFit {
    pub label: String,
    pub result: Result<FitResult, FitError>,
}

pub fn fit_batch(inputs: &[(String, Dataset)], degree: u32, opts: &FitOptions) -> Vec<BatchFit> {
    inputs
        .par_iter()
        .map(|(label, data)| BatchFit {
            label: label.clone(),
            result: fit(data, degree, opts),
        })
        .collect()
}
