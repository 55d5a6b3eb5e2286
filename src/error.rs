//! Error types.
//!
//! - `FitError` is what the library returns: one variant per failure mode, so
//!   callers can match on it.
//! - `AppError` is what the binary reports: a message plus a process exit code.

use thiserror::Error;

/// Failures of ingest, design-matrix construction, solve and statistics.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Only degree 1 and degree 2 models are supported.
    #[error("Invalid degree {0}: must be 1 or 2")]
    InvalidDegree(u32),

    /// Not enough rows for the number of fitted coefficients.
    #[error("Not enough data: {rows} rows for {columns} design columns (degrees of freedom {dof})")]
    InsufficientData { rows: usize, columns: usize, dof: i64 },

    /// Ragged rows, non-numeric values, too few columns, empty table.
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// The design matrix is not of full column rank.
    #[error("Singular design matrix: rank {rank} < {columns} columns (collinear or constant predictors)")]
    SingularMatrix { rank: usize, columns: usize },

    /// A supplied measurement uncertainty must be finite and positive.
    #[error("Invalid sigma {0}: must be finite and > 0")]
    InvalidSigma(f64),
}

impl FitError {
    pub fn malformed(message: impl Into<String>) -> Self {
        FitError::MalformedInput(message.into())
    }

    /// Exit code the binary uses for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            FitError::InvalidDegree(_) | FitError::MalformedInput(_) | FitError::InvalidSigma(_) => 2,
            FitError::InsufficientData { .. } => 3,
            FitError::SingularMatrix { .. } => 4,
        }
    }
}

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<FitError> for AppError {
    fn from(err: FitError) -> Self {
        AppError::new(err.exit_code(), err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
