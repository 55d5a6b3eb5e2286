//! Polynomial design layout.
//!
//! The fitter relies on two primitive operations:
//! - build a design row for a given predictor vector (for OLS)
//! - predict y given coefficients (for residuals/exports)
//!
//! Both go through `fill_design_row`, so the column order used to fit is the
//! one used to evaluate.
//!
//! Column order:
//!
//! ```text
//! degree 1:               x0, x1, ..., x{k-1}, 1
//! degree 2:               x0^2, x0, x1^2, x1, ..., 1
//! degree 2 + cross terms: ... , 1, x0*x1, x0*x2, ..., x{k-2}*x{k-1}
//! ```

use log::warn;
use nalgebra::DMatrix;

use crate::domain::{Dataset, Degree};

/// Shape of the design matrix for a given degree and predictor count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignLayout {
    pub degree: Degree,
    pub n_predictors: usize,
    pub cross_terms: bool,
}

impl DesignLayout {
    /// Cross terms only exist for degree 2; they are dropped otherwise.
    pub fn new(degree: Degree, n_predictors: usize, cross_terms: bool) -> Self {
        if cross_terms && degree == Degree::Linear {
            warn!("cross terms are only used with degree 2; ignoring for degree 1");
        }
        Self {
            degree,
            n_predictors,
            cross_terms: cross_terms && degree == Degree::Quadratic,
        }
    }

    /// Number of unordered predictor pairs `k(k-1)/2`.
    pub fn n_pairs(&self) -> usize {
        if self.cross_terms {
            self.n_predictors * self.n_predictors.saturating_sub(1) / 2
        } else {
            0
        }
    }

    pub fn n_columns(&self) -> usize {
        let k = self.n_predictors;
        match self.degree {
            Degree::Linear => k + 1,
            Degree::Quadratic => 2 * k + 1 + self.n_pairs(),
        }
    }

    /// Degrees of freedom for `n_rows` observations.
    ///
    /// `rows - k - 1` for degree 1 and `rows - 2k - 1` for degree 2; with cross
    /// terms the pair count is added back, matching the reference tool's
    /// convention. May be negative.
    pub fn dof(&self, n_rows: usize) -> i64 {
        let n = n_rows as i64;
        let k = self.n_predictors as i64;
        match self.degree {
            Degree::Linear => n - k - 1,
            Degree::Quadratic => n - 2 * k - 1 + self.n_pairs() as i64,
        }
    }

    /// Human-readable label for each design column.
    pub fn labels(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(self.n_columns());
        for i in 0..self.n_predictors {
            if self.degree == Degree::Quadratic {
                out.push(format!("x{i}^2"));
            }
            out.push(format!("x{i}"));
        }
        out.push("1".to_string());
        for (i, j) in self.pairs() {
            out.push(format!("x{i}*x{j}"));
        }
        out
    }

    /// Predictor index pairs `(i, j)`, `i < j`, in lexicographic order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let k = if self.cross_terms { self.n_predictors } else { 0 };
        (0..k).flat_map(move |i| ((i + 1)..k).map(move |j| (i, j)))
    }
}

/// Fill a design row for one observation.
///
/// # Panics
/// Panics if `x` does not have length `layout.n_predictors` or `out` does not
/// have length `layout.n_columns()`. Callers should size these correctly.
pub fn fill_design_row(layout: &DesignLayout, x: &[f64], out: &mut [f64]) {
    let mut c = 0;
    for &xi in x {
        if layout.degree == Degree::Quadratic {
            out[c] = xi * xi;
            c += 1;
        }
        out[c] = xi;
        c += 1;
    }
    out[c] = 1.0;
    c += 1;
    for (i, j) in layout.pairs() {
        out[c] = x[i] * x[j];
        c += 1;
    }
}

/// Build the full design matrix in a single pre-sized pass.
pub fn design_matrix(layout: &DesignLayout, data: &Dataset) -> DMatrix<f64> {
    let n = data.n_rows();
    let p = layout.n_columns();
    let mut a = DMatrix::zeros(n, p);
    let mut row = vec![0.0; p];
    for r in 0..n {
        fill_design_row(layout, &data.predictors_of(r), &mut row);
        for (c, v) in row.iter().enumerate() {
            a[(r, c)] = *v;
        }
    }
    a
}

/// Evaluate the model at one predictor vector.
pub fn predict(layout: &DesignLayout, coefficients: &[f64], x: &[f64]) -> f64 {
    let mut row = vec![0.0; layout.n_columns()];
    fill_design_row(layout, x, &mut row);
    row.iter().zip(coefficients).map(|(a, b)| a * b).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_predictor_data() -> Dataset {
        Dataset::from_rows(&[
            vec![1.0, 2.0, 0.0],
            vec![3.0, 5.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn linear_layout_columns() {
        let layout = DesignLayout::new(Degree::Linear, 2, false);
        assert_eq!(layout.n_columns(), 3);
        assert_eq!(layout.labels(), vec!["x0", "x1", "1"]);

        let a = design_matrix(&layout, &two_predictor_data());
        assert_eq!(a.shape(), (2, 3));
        assert_eq!(a.row(1).iter().copied().collect::<Vec<_>>(), vec![3.0, 5.0, 1.0]);
    }

    #[test]
    fn quadratic_layout_puts_square_before_linear() {
        let layout = DesignLayout::new(Degree::Quadratic, 2, false);
        assert_eq!(layout.n_columns(), 5);
        assert_eq!(layout.labels(), vec!["x0^2", "x0", "x1^2", "x1", "1"]);

        let a = design_matrix(&layout, &two_predictor_data());
        assert_eq!(
            a.row(1).iter().copied().collect::<Vec<_>>(),
            vec![9.0, 3.0, 25.0, 5.0, 1.0]
        );
    }

    #[test]
    fn cross_terms_follow_lexicographic_pairs() {
        let layout = DesignLayout::new(Degree::Quadratic, 3, true);
        assert_eq!(layout.n_pairs(), 3);
        assert_eq!(layout.n_columns(), 2 * 3 + 1 + 3);
        assert_eq!(layout.pairs().collect::<Vec<_>>(), vec![(0, 1), (0, 2), (1, 2)]);

        let mut row = vec![0.0; layout.n_columns()];
        fill_design_row(&layout, &[2.0, 3.0, 5.0], &mut row);
        assert_eq!(row, vec![4.0, 2.0, 9.0, 3.0, 25.0, 5.0, 1.0, 6.0, 10.0, 15.0]);
        assert_eq!(&layout.labels()[7..], &["x0*x1", "x0*x2", "x1*x2"]);
    }

    #[test]
    fn cross_terms_ignored_for_degree_one() {
        let layout = DesignLayout::new(Degree::Linear, 3, true);
        assert!(!layout.cross_terms);
        assert_eq!(layout.n_columns(), 4);
        assert_eq!(layout.dof(10), 6);
    }

    #[test]
    fn dof_conventions() {
        assert_eq!(DesignLayout::new(Degree::Linear, 2, false).dof(10), 7);
        assert_eq!(DesignLayout::new(Degree::Quadratic, 2, false).dof(10), 5);
        // Pairs are added back to the degree-2 count.
        assert_eq!(DesignLayout::new(Degree::Quadratic, 3, true).dof(10), 10 - 6 - 1 + 3);
        assert_eq!(DesignLayout::new(Degree::Linear, 4, false).dof(3), -2);
    }

    #[test]
    fn predict_matches_design_row() {
        let layout = DesignLayout::new(Degree::Quadratic, 1, false);
        // y = 2x^2 - x + 3
        let y = predict(&layout, &[2.0, -1.0, 3.0], &[4.0]);
        assert!((y - 31.0).abs() < 1e-12);
    }
}
