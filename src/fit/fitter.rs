//! Polynomial least squares fit.
//!
//! Given a dataset (predictor columns + response column) we:
//! - build the design matrix for the requested degree / cross terms
//! - solve the OLS problem for the coefficients and the residual sum of squares
//! - derive chi-square, reduced chi-square and R²
//! - optionally compute the Pearson correlation matrix of the raw columns

use log::{debug, info};

use crate::domain::{Dataset, Degree, FitOptions, FitResult, Sigma};
use crate::error::FitError;
use crate::math::{correlation_matrix, r_squared, solve_least_squares};
use crate::models::{DesignLayout, design_matrix};

/// Fit a degree-1 or degree-2 polynomial to `data`.
///
/// `degree` is validated here so that callers holding a raw number (CLI,
/// config) get `InvalidDegree` from the same place as every other failure.
pub fn fit(data: &Dataset, degree: u32, opts: &FitOptions) -> Result<FitResult, FitError> {
    let degree = Degree::try_from(degree)?;
    let layout = DesignLayout::new(degree, data.n_predictors(), opts.cross_terms);

    let n = data.n_rows();
    let p = layout.n_columns();
    let dof = layout.dof(n);
    if n <= p || dof <= 0 {
        return Err(FitError::InsufficientData { rows: n, columns: p, dof });
    }
    let dof = dof as usize;

    if let Sigma::Known(s) = opts.sigma {
        if !(s.is_finite() && s > 0.0) {
            return Err(FitError::InvalidSigma(s));
        }
    }

    let a = design_matrix(&layout, data);
    let y = data.response();
    debug!("design matrix {n}x{p} (degree {}, cross_terms={})", degree.as_u32(), layout.cross_terms);

    let sol = solve_least_squares(&a, &y)?;
    let rss = sol.rss;

    // With an estimated σ², chi-square is rss / (rss / dof) = dof by
    // construction; we set it directly so an exact fit does not give 0/0.
    let (sigma_sq, chi_sq) = match opts.sigma {
        Sigma::Known(s) => (s * s, rss / (s * s)),
        Sigma::Estimated => {
            info!("sigma estimated from residuals; chi-square equals degrees of freedom ({dof})");
            (rss / dof as f64, dof as f64)
        }
    };
    let chi_sq_reduced = chi_sq / dof as f64;

    let r_sq = r_squared(rss, &y);

    let correlation = opts.correlate.then(|| correlation_matrix(data.matrix()));

    Ok(FitResult {
        degree,
        cross_terms: layout.cross_terms,
        labels: layout.labels(),
        coefficients: sol.coefficients.iter().copied().collect(),
        n_rows: n,
        n_predictors: data.n_predictors(),
        dof,
        rank: sol.rank,
        rss,
        sigma_sq,
        sigma: opts.sigma,
        chi_sq,
        chi_sq_reduced,
        r_squared: r_sq,
        correlation,
    })
}

/// Design layout a result was fitted with.
pub fn layout_of(result: &FitResult) -> DesignLayout {
    DesignLayout::new(result.degree, result.n_predictors, result.cross_terms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::prelude::*;
    use rand::rngs::StdRng;
    use rand_distr::Normal;

    fn line_data() -> Dataset {
        // y = 2x + 3
        Dataset::from_rows(&[
            vec![0.0, 3.0],
            vec![1.0, 5.0],
            vec![2.0, 7.0],
            vec![3.0, 9.0],
            vec![4.0, 11.0],
        ])
        .unwrap()
    }

    fn noisy_quadratic(seed: u64, n: usize) -> Dataset {
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = Normal::new(0.0, 0.3).unwrap();
        let rows: Vec<Vec<f64>> = (0..n)
            .map(|_| {
                let x0: f64 = rng.gen_range(-3.0..3.0);
                let x1: f64 = rng.gen_range(-3.0..3.0);
                let y = 1.5 * x0 * x0 - 2.0 * x0 + 0.5 * x1 * x1 + x1 + 4.0 + 0.75 * x0 * x1
                    + noise.sample(&mut rng);
                vec![x0, x1, y]
            })
            .collect();
        Dataset::from_rows(&rows).unwrap()
    }

    #[test]
    fn linear_fit_recovers_exact_line() {
        let fit = fit(&line_data(), 1, &FitOptions::default()).unwrap();
        assert_eq!(fit.labels, vec!["x0", "1"]);
        assert!((fit.coefficients[0] - 2.0).abs() < 1e-10);
        assert!((fit.coefficients[1] - 3.0).abs() < 1e-10);
        assert!(fit.rss < 1e-18);
        assert_eq!(fit.dof, 3);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn large_constant_response_is_an_exact_fit() {
        let x: Vec<f64> = (0..10).map(|i| 0.37 * i as f64).collect();
        let data = Dataset::from_columns(&[x], &[1e9; 10]).unwrap();
        let fit = fit(&data, 1, &FitOptions::default()).unwrap();
        assert!((fit.coefficients[1] - 1e9).abs() < 1e-3);
        assert_eq!(fit.r_squared, 1.0);
    }

    #[test]
    fn estimated_sigma_makes_chi_sq_equal_dof() {
        let data = noisy_quadratic(7, 40);
        let fit = fit(&data, 2, &FitOptions::default()).unwrap();
        assert_eq!(fit.dof, 40 - 2 * 2 - 1);
        assert_eq!(fit.chi_sq, fit.dof as f64);
        assert_eq!(fit.chi_sq_reduced, 1.0);
        assert!((fit.sigma_sq - fit.rss / fit.dof as f64).abs() < 1e-12);
    }

    #[test]
    fn known_sigma_normalises_chi_sq() {
        let data = noisy_quadratic(11, 50);
        let opts = FitOptions {
            sigma: Sigma::Known(0.3),
            ..FitOptions::default()
        };
        let fit = fit(&data, 2, &opts).unwrap();
        assert!((fit.chi_sq - fit.rss / 0.09).abs() < 1e-9);
        assert!((fit.chi_sq_reduced - fit.chi_sq / fit.dof as f64).abs() < 1e-12);
        assert_eq!(fit.sigma_sq, 0.3 * 0.3);
    }

    #[test]
    fn r_squared_uses_response_total_sum_of_squares() {
        let data = noisy_quadratic(3, 30);
        let fit = fit(&data, 1, &FitOptions::default()).unwrap();

        let y = data.response();
        let mean = y.mean();
        let tss: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
        let expected = 1.0 - fit.rss / tss;
        assert!((fit.r_squared - expected).abs() < 1e-12);
        assert!(fit.r_squared < 1.0);
    }

    #[test]
    fn cross_terms_recover_interaction() {
        let data = noisy_quadratic(5, 200);
        let opts = FitOptions {
            cross_terms: true,
            ..FitOptions::default()
        };
        let fit = fit(&data, 2, &opts).unwrap();
        assert_eq!(fit.labels, vec!["x0^2", "x0", "x1^2", "x1", "1", "x0*x1"]);
        let truth = [1.5, -2.0, 0.5, 1.0, 4.0, 0.75];
        for (c, t) in fit.coefficients.iter().zip(truth) {
            assert!((c - t).abs() < 0.15, "coefficient {c} far from {t}");
        }
        // Pair count is added back to the degree-2 dof.
        assert_eq!(fit.dof, 200 - 4 - 1 + 1);
    }

    #[test]
    fn invalid_degree_is_rejected() {
        for degree in [0, 3, 7] {
            let err = fit(&line_data(), degree, &FitOptions::default()).unwrap_err();
            assert_eq!(err, FitError::InvalidDegree(degree));
        }
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        let data = Dataset::from_rows(&[vec![0.0, 1.0], vec![1.0, 2.0]]).unwrap();
        let err = fit(&data, 1, &FitOptions::default()).unwrap_err();
        assert_eq!(err, FitError::InsufficientData { rows: 2, columns: 2, dof: 0 });

        // Five rows, two predictors, degree 2: five design columns.
        let data = noisy_quadratic(1, 5);
        assert!(matches!(
            fit(&data, 2, &FitOptions::default()),
            Err(FitError::InsufficientData { rows: 5, columns: 5, .. })
        ));
    }

    #[test]
    fn duplicate_predictor_is_singular() {
        let rows: Vec<Vec<f64>> = (0..8)
            .map(|i| {
                let x = i as f64;
                vec![x, x, 3.0 * x + 1.0]
            })
            .collect();
        let data = Dataset::from_rows(&rows).unwrap();
        assert!(matches!(
            fit(&data, 1, &FitOptions::default()),
            Err(FitError::SingularMatrix { columns: 3, .. })
        ));
    }

    #[test]
    fn invalid_sigma_is_rejected() {
        for s in [0.0, -1.0, f64::NAN] {
            let opts = FitOptions {
                sigma: Sigma::Known(s),
                ..FitOptions::default()
            };
            assert!(matches!(fit(&line_data(), 1, &opts), Err(FitError::InvalidSigma(_))));
        }
    }

    #[test]
    fn correlation_is_optional_and_indexed_by_column() {
        let data = noisy_quadratic(9, 25);
        let plain = fit(&data, 2, &FitOptions::default()).unwrap();
        assert!(plain.correlation.is_none());

        let opts = FitOptions {
            correlate: true,
            ..FitOptions::default()
        };
        let with_corr = fit(&data, 2, &opts).unwrap();
        let corr = with_corr.correlation.unwrap();
        assert_eq!(corr.dim(), 3);
        for i in 0..3 {
            assert_eq!(corr.get(i, i), 1.0);
        }
        assert_eq!(corr.get(0, 2).to_bits(), corr.get(2, 0).to_bits());
    }

    #[test]
    fn repeated_fits_are_bit_identical() {
        let data = noisy_quadratic(13, 60);
        let opts = FitOptions {
            cross_terms: true,
            ..FitOptions::default()
        };
        let a = fit(&data, 2, &opts).unwrap();
        let b = fit(&data, 2, &opts).unwrap();
        let bits = |r: &FitResult| r.coefficients.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
    }
}
