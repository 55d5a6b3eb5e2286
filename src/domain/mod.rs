//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the input table (`Dataset`)
//! - fit parameters (`Degree`, `Sigma`, `FitOptions`)
//! - fit outputs (`FitResult`, `CorrelationMatrix`, `RowResidual`)

pub mod types;

pub use types::*;
