//! `multipolyfit` library crate.
//!
//! Least squares fits of degree-1 / degree-2 polynomials (optionally with
//! pairwise cross terms) to multivariate numeric tables, with chi-square,
//! reduced chi-square, R² and an optional correlation matrix.
//!
//! The binary (`mpf`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the fitter can be called directly on in-memory data

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod logging;
pub mod math;
pub mod models;
pub mod report;

pub use domain::{Dataset, Degree, FitOptions, FitResult, Sigma};
pub use error::FitError;
pub use fit::{fit, fit_batch};
