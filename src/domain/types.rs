//! Shared domain types.
//!
//! These types are intentionally kept lightweight so they can be:
//!
//! - built by ingest or the sample generator
//! - consumed by the fitter without copies
//! - exported to JSON/CSV

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use crate::error::FitError;

/// A numeric table: the last column is the response, all preceding columns
/// are predictors.
///
/// Invariants (checked on construction): at least one row, at least two
/// columns, every value finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    values: DMatrix<f64>,
}

impl Dataset {
    /// Build from row-major rows, rejecting ragged or non-finite input.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, FitError> {
        let first = rows
            .first()
            .ok_or_else(|| FitError::malformed("table has no data rows"))?;
        let n_cols = first.len();
        if n_cols < 2 {
            return Err(FitError::malformed(format!(
                "need at least 2 columns (predictors + response), found {n_cols}"
            )));
        }

        let mut flat = Vec::with_capacity(rows.len() * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(FitError::malformed(format!(
                    "row {} has {} columns, expected {n_cols}",
                    i + 1,
                    row.len()
                )));
            }
            if let Some(v) = row.iter().find(|v| !v.is_finite()) {
                return Err(FitError::malformed(format!("row {} contains non-finite value {v}", i + 1)));
            }
            flat.extend_from_slice(row);
        }

        Ok(Self {
            values: DMatrix::from_row_slice(rows.len(), n_cols, &flat),
        })
    }

    /// Build from separate predictor columns and a response column.
    pub fn from_columns(predictors: &[Vec<f64>], response: &[f64]) -> Result<Self, FitError> {
        if predictors.is_empty() {
            return Err(FitError::malformed("need at least one predictor column"));
        }
        if predictors.iter().any(|col| col.len() != response.len()) {
            return Err(FitError::malformed("predictor and response columns differ in length"));
        }
        let rows: Vec<Vec<f64>> = response
            .iter()
            .enumerate()
            .map(|(r, &y)| {
                predictors
                    .iter()
                    .map(|col| col[r])
                    .chain(std::iter::once(y))
                    .collect()
            })
            .collect();
        Self::from_rows(&rows)
    }

    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// Total column count (predictors + response).
    pub fn n_cols(&self) -> usize {
        self.values.ncols()
    }

    pub fn n_predictors(&self) -> usize {
        self.values.ncols() - 1
    }

    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.values[(row, col)]
    }

    /// Predictor values of one row, in column order.
    pub fn predictors_of(&self, row: usize) -> Vec<f64> {
        (0..self.n_predictors()).map(|c| self.values[(row, c)]).collect()
    }

    pub fn response(&self) -> DVector<f64> {
        self.values.column(self.n_predictors()).into_owned()
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.values
    }

    pub fn stats(&self) -> DatasetStats {
        let y = self.response();
        DatasetStats {
            n_rows: self.n_rows(),
            n_predictors: self.n_predictors(),
            y_min: y.min(),
            y_max: y.max(),
            y_mean: y.mean(),
        }
    }
}

/// Summary stats about a loaded dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub n_rows: usize,
    pub n_predictors: usize,
    pub y_min: f64,
    pub y_max: f64,
    pub y_mean: f64,
}

/// Polynomial degree of the fitted model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Degree {
    Linear,
    Quadratic,
}

impl Degree {
    pub fn as_u32(self) -> u32 {
        match self {
            Degree::Linear => 1,
            Degree::Quadratic => 2,
        }
    }
}

impl TryFrom<u32> for Degree {
    type Error = FitError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Degree::Linear),
            2 => Ok(Degree::Quadratic),
            other => Err(FitError::InvalidDegree(other)),
        }
    }
}

/// Measurement uncertainty used to normalise chi-square.
///
/// `Known(σ)` is a standard deviation: chi-square divides the residual sum of
/// squares by `σ²`. `Estimated` derives `σ² = rss / df` from the fit itself.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Sigma {
    #[default]
    Estimated,
    Known(f64),
}

impl From<Option<f64>> for Sigma {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Sigma::Estimated, Sigma::Known)
    }
}

/// Options for a single fit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FitOptions {
    /// Append pairwise products `x_i * x_j` (degree 2 only).
    pub cross_terms: bool,
    /// Also compute the Pearson correlation matrix of the raw columns.
    pub correlate: bool,
    pub sigma: Sigma,
}

/// Pearson correlation matrix indexed by dataset column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub rows: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn dim(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.rows[i][j]
    }
}

/// Output of a polynomial fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub degree: Degree,
    pub cross_terms: bool,
    /// One label per design column, e.g. `x0^2`, `x0`, `1`, `x0*x1`.
    pub labels: Vec<String>,
    /// Coefficients in design-column order.
    pub coefficients: Vec<f64>,
    pub n_rows: usize,
    pub n_predictors: usize,
    /// Degrees of freedom used to normalise chi-square.
    pub dof: usize,
    pub rank: usize,
    /// Residual sum of squares reported by the solver.
    pub rss: f64,
    /// `σ²` actually used for chi-square (known or estimated).
    pub sigma_sq: f64,
    pub sigma: Sigma,
    pub chi_sq: f64,
    pub chi_sq_reduced: f64,
    pub r_squared: f64,
    pub correlation: Option<CorrelationMatrix>,
}

/// Observed vs fitted value for one dataset row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowResidual {
    pub row: usize,
    pub y_obs: f64,
    pub y_fit: f64,
    pub residual: f64,
}
