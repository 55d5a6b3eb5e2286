//! Command-line parsing for the polynomial fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::io::Delimiter;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "mpf", version, about = "Multivariate polynomial least squares fitter")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit one or more data files and print coefficients and fit statistics.
    Fit(FitArgs),
    /// Write a synthetic dataset drawn from a random polynomial.
    Generate(GenerateArgs),
}

/// Options for fitting.
#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Data files: one row per observation, last column is the response.
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Polynomial degree (1 or 2).
    #[arg(short = 'd', long, default_value_t = 1)]
    pub degree: u32,

    /// Number of leading lines to skip before parsing.
    #[arg(long, default_value_t = 0)]
    pub skip_rows: usize,

    /// Add pairwise products of predictors (degree 2 only).
    #[arg(long)]
    pub cross_terms: bool,

    /// Also report the Pearson correlation matrix of all columns.
    #[arg(long)]
    pub correlate: bool,

    /// Known measurement uncertainty (standard deviation); estimated from residuals if omitted.
    #[arg(long)]
    pub sigma: Option<f64>,

    /// Field separator: `whitespace`, `tab`, or a single character such as `,`.
    #[arg(long, default_value = "whitespace")]
    pub delimiter: Delimiter,

    /// Export the fit result to JSON (single input file only).
    #[arg(long = "export-json", value_name = "JSON")]
    pub export_json: Option<PathBuf>,

    /// Export per-row observed/fitted/residual values to CSV (single input file only).
    #[arg(long = "export-residuals", value_name = "CSV")]
    pub export_residuals: Option<PathBuf>,
}

/// Options for synthetic data generation.
#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// Output data file.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,

    /// Number of rows.
    #[arg(short = 'n', long, default_value_t = 100)]
    pub rows: usize,

    /// Number of predictor columns.
    #[arg(short = 'k', long, default_value_t = 2)]
    pub predictors: usize,

    /// Polynomial degree (1 or 2).
    #[arg(short = 'd', long, default_value_t = 2)]
    pub degree: u32,

    /// Include pairwise products of predictors (degree 2 only).
    #[arg(long)]
    pub cross_terms: bool,

    /// True coefficients in fit column order, comma-separated; random if omitted.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub coefficients: Option<Vec<f64>>,

    /// Standard deviation of the Gaussian response noise.
    #[arg(long, default_value_t = 0.1)]
    pub noise: f64,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Lower bound of predictor values.
    #[arg(long, default_value_t = -1.0, allow_hyphen_values = true)]
    pub x_min: f64,

    /// Upper bound of predictor values.
    #[arg(long, default_value_t = 1.0, allow_hyphen_values = true)]
    pub x_max: f64,

    /// Field separator for the written file.
    #[arg(long, default_value = "whitespace")]
    pub delimiter: Delimiter,
}
