//! Synthetic dataset generation from a known polynomial.
//!
//! Useful for checking a fit end to end: the generator reports the true
//! coefficients in the same column order the fitter uses.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{Dataset, Degree};
use crate::error::FitError;
use crate::models::{DesignLayout, predict};

/// Range for randomly drawn true coefficients.
const COEF_RANGE: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct SampleSpec {
    pub rows: usize,
    pub predictors: usize,
    pub degree: u32,
    pub cross_terms: bool,
    /// True coefficients in design-column order; drawn at random when `None`.
    pub coefficients: Option<Vec<f64>>,
    /// Standard deviation of the Gaussian noise added to the response.
    pub noise: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub seed: u64,
}

impl Default for SampleSpec {
    fn default() -> Self {
        Self {
            rows: 100,
            predictors: 2,
            degree: 2,
            cross_terms: false,
            coefficients: None,
            noise: 0.1,
            x_min: -1.0,
            x_max: 1.0,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedSample {
    pub data: Dataset,
    pub labels: Vec<String>,
    pub coefficients: Vec<f64>,
}

pub fn generate_sample(spec: &SampleSpec) -> Result<GeneratedSample, FitError> {
    let degree = Degree::try_from(spec.degree)?;
    if spec.rows == 0 || spec.predictors == 0 {
        return Err(FitError::malformed("sample needs at least one row and one predictor"));
    }
    if !(spec.x_min.is_finite() && spec.x_max.is_finite() && spec.x_max > spec.x_min) {
        return Err(FitError::malformed(format!(
            "invalid predictor range [{}, {}]",
            spec.x_min, spec.x_max
        )));
    }
    if !(spec.noise.is_finite() && spec.noise >= 0.0) {
        return Err(FitError::malformed(format!("invalid noise level {}", spec.noise)));
    }

    let layout = DesignLayout::new(degree, spec.predictors, spec.cross_terms);
    let mut rng = StdRng::seed_from_u64(spec.seed);

    let coefficients = match &spec.coefficients {
        Some(c) if c.len() == layout.n_columns() => c.clone(),
        Some(c) => {
            return Err(FitError::malformed(format!(
                "expected {} coefficients, got {}",
                layout.n_columns(),
                c.len()
            )));
        }
        None => (0..layout.n_columns())
            .map(|_| rng.gen_range(-COEF_RANGE..=COEF_RANGE))
            .collect(),
    };

    let noise = Normal::new(0.0, spec.noise)
        .map_err(|e| FitError::malformed(format!("noise distribution error: {e}")))?;

    // Draw row by row so a seed always yields the same points.
    let mut columns: Vec<Vec<f64>> = (0..spec.predictors).map(|_| Vec::with_capacity(spec.rows)).collect();
    let mut response = Vec::with_capacity(spec.rows);
    let mut x = vec![0.0; spec.predictors];
    for _ in 0..spec.rows {
        for (xi, col) in x.iter_mut().zip(columns.iter_mut()) {
            *xi = rng.gen_range(spec.x_min..=spec.x_max);
            col.push(*xi);
        }
        response.push(predict(&layout, &coefficients, &x) + noise.sample(&mut rng));
    }

    Ok(GeneratedSample {
        data: Dataset::from_columns(&columns, &response)?,
        labels: layout.labels(),
        coefficients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FitOptions;
    use crate::fit::fit;

    #[test]
    fn same_seed_same_sample() {
        let spec = SampleSpec::default();
        let a = generate_sample(&spec).unwrap();
        let b = generate_sample(&spec).unwrap();
        assert_eq!(a.data, b.data);
        assert_eq!(a.coefficients, b.coefficients);
    }

    #[test]
    fn fit_recovers_generated_coefficients() {
        let spec = SampleSpec {
            rows: 300,
            predictors: 3,
            cross_terms: true,
            noise: 0.01,
            x_min: -2.0,
            x_max: 2.0,
            seed: 7,
            ..SampleSpec::default()
        };
        let sample = generate_sample(&spec).unwrap();
        let opts = FitOptions {
            cross_terms: true,
            ..FitOptions::default()
        };
        let fit = fit(&sample.data, 2, &opts).unwrap();

        assert_eq!(fit.labels, sample.labels);
        for (got, want) in fit.coefficients.iter().zip(&sample.coefficients) {
            assert!((got - want).abs() < 0.01, "got {got}, want {want}");
        }
    }

    #[test]
    fn explicit_coefficients_must_match_layout() {
        let spec = SampleSpec {
            degree: 1,
            predictors: 1,
            coefficients: Some(vec![2.0, 3.0, 4.0]),
            ..SampleSpec::default()
        };
        assert!(matches!(generate_sample(&spec), Err(FitError::MalformedInput(_))));
    }

    #[test]
    fn noiseless_line_is_exact() {
        let spec = SampleSpec {
            rows: 10,
            predictors: 1,
            degree: 1,
            coefficients: Some(vec![2.0, 3.0]),
            noise: 0.0,
            ..SampleSpec::default()
        };
        let sample = generate_sample(&spec).unwrap();
        for r in 0..10 {
            let x = sample.data.value(r, 0);
            assert!((sample.data.value(r, 1) - (2.0 * x + 3.0)).abs() < 1e-12);
        }
    }
}
