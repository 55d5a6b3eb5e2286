//! Polynomial fitting.
//!
//! Responsibilities:
//!
//! - build the design matrix and solve the least squares problem (`fitter`)
//! - fit independent datasets in parallel (`batch`)

pub mod batch;
pub mod fitter;

pub use batch::*;
pub use fitter::*;
