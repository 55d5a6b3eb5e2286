//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs the logger
//! - loads data and runs the fits
//! - prints reports
//! - writes optional exports

use std::path::PathBuf;

use clap::Parser;
use log::info;

use crate::cli::{Command, FitArgs, GenerateArgs};
use crate::data::{SampleSpec, generate_sample};
use crate::domain::{FitOptions, Sigma};
use crate::error::AppError;
use crate::io::TableFormat;

pub mod pipeline;

/// A fit run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub files: Vec<PathBuf>,
    pub degree: u32,
    pub format: TableFormat,
    pub options: FitOptions,
    pub export_json: Option<PathBuf>,
    pub export_residuals: Option<PathBuf>,
}

/// Entry point for the `mpf` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    crate::logging::init(cli.verbose);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args)?;
    let run = pipeline::run_fit(&config)?;

    for (entry, (_, data)) in run.fits.iter().zip(&run.inputs) {
        if let Ok(fit) = &entry.result {
            println!("{}", crate::report::format_fit_summary(&entry.label, &data.stats(), fit));
        }
    }

    if run.fits.len() > 1 {
        println!("{}", crate::report::format_batch_table(&run.fits));
    }

    let failed: Vec<_> = run.fits.iter().filter_map(|b| b.result.as_ref().err().map(|e| (b, e))).collect();
    if let Some((entry, err)) = failed.first() {
        if run.fits.len() == 1 {
            return Err(AppError::new(err.exit_code(), format!("{}: {err}", entry.label)));
        }
        return Err(AppError::new(
            err.exit_code(),
            format!("{} of {} fits failed", failed.len(), run.fits.len()),
        ));
    }

    pipeline::write_exports(&config, &run)
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let spec = SampleSpec {
        rows: args.rows,
        predictors: args.predictors,
        degree: args.degree,
        cross_terms: args.cross_terms,
        coefficients: args.coefficients.clone(),
        noise: args.noise,
        x_min: args.x_min,
        x_max: args.x_max,
        seed: args.seed,
    };
    let sample = generate_sample(&spec)?;

    let truth: Vec<String> = sample
        .labels
        .iter()
        .zip(&sample.coefficients)
        .map(|(l, c)| format!("{l}={c:.6}"))
        .collect();
    let header = vec![
        format!(
            "mpf generate: rows={} predictors={} degree={} cross_terms={} noise={} seed={}",
            spec.rows, spec.predictors, spec.degree, spec.cross_terms, spec.noise, spec.seed
        ),
        format!("true coefficients: {}", truth.join(" ")),
    ];
    crate::io::write_dataset(&args.out, &sample.data, args.delimiter, &header)?;
    info!("wrote {} rows to '{}'", spec.rows, args.out.display());

    println!("Wrote {} rows to {}", spec.rows, args.out.display());
    println!("True coefficients (fit column order):");
    for line in truth {
        println!("  {line}");
    }
    Ok(())
}

pub fn run_config_from_args(args: &FitArgs) -> Result<RunConfig, AppError> {
    let wants_export = args.export_json.is_some() || args.export_residuals.is_some();
    if wants_export && args.files.len() != 1 {
        return Err(AppError::new(
            2,
            "`--export-json` / `--export-residuals` need exactly one input file.",
        ));
    }

    Ok(RunConfig {
        files: args.files.clone(),
        degree: args.degree,
        format: TableFormat {
            skip_rows: args.skip_rows,
            delimiter: args.delimiter,
            ..TableFormat::default()
        },
        options: FitOptions {
            cross_terms: args.cross_terms,
            correlate: args.correlate,
            sigma: Sigma::from(args.sigma),
        },
        export_json: args.export_json.clone(),
        export_residuals: args.export_residuals.clone(),
    })
}
