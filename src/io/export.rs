//! Exports: fit result JSON, per-row residual CSV, and plain data tables.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, FitResult, RowResidual};
use crate::error::AppError;
use crate::io::ingest::Delimiter;

/// A saved fit (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FitFile {
    pub tool: String,
    pub source: String,
    pub generated: DateTime<Utc>,
    pub fit: FitResult,
}

/// Write a fit result JSON file.
pub fn write_result_json(path: &Path, source: &str, fit: &FitResult) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create result JSON '{}': {e}", path.display())))?;

    let out = FitFile {
        tool: "mpf".to_string(),
        source: source.to_string(),
        generated: Utc::now(),
        fit: fit.clone(),
    };

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write result JSON: {e}")))?;

    Ok(())
}

/// Read a fit result JSON file.
pub fn read_result_json(path: &Path) -> Result<FitFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open result JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid result JSON: {e}")))
}

/// Write per-row residuals to a CSV file.
pub fn write_residuals_csv(path: &Path, residuals: &[RowResidual]) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(2, format!("Failed to create residual CSV '{}': {e}", path.display())))?;

    for r in residuals {
        writer
            .serialize(r)
            .map_err(|e| AppError::new(2, format!("Failed to write residual CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush residual CSV: {e}")))?;

    Ok(())
}

/// Write a dataset as a table that `load_dataset` can read back.
///
/// `header` lines are written first, each prefixed with `# ` and counted by the
/// caller's `skip_rows`.
pub fn write_dataset(path: &Path, data: &Dataset, delimiter: Delimiter, header: &[String]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create data file '{}': {e}", path.display())))?;

    let sep = match delimiter {
        Delimiter::Whitespace => " ".to_string(),
        Delimiter::Char(c) => (c as char).to_string(),
    };

    for line in header {
        writeln!(file, "# {line}")
            .map_err(|e| AppError::new(2, format!("Failed to write data header: {e}")))?;
    }
    for r in 0..data.n_rows() {
        let fields: Vec<String> = (0..data.n_cols()).map(|c| format!("{:e}", data.value(r, c))).collect();
        writeln!(file, "{}", fields.join(&sep))
            .map_err(|e| AppError::new(2, format!("Failed to write data row: {e}")))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SampleSpec, generate_sample};
    use crate::domain::FitOptions;
    use crate::fit::fit;
    use crate::io::ingest::{TableFormat, load_dataset};

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("mpf_export_{}_{name}", std::process::id()))
    }

    fn sample() -> Dataset {
        Dataset::from_rows(&[
            vec![0.0, 1.0, 1.0],
            vec![1.0, 0.5, 2.5],
            vec![2.0, -1.0, 1.0],
            vec![3.0, 2.0, 7.0],
            vec![4.0, 0.0, 4.5],
        ])
        .unwrap()
    }

    #[test]
    fn dataset_round_trips_through_table_file() {
        let path = temp_path("data.csv");
        let data = sample();
        write_dataset(&path, &data, Delimiter::Char(b','), &["generated".to_string()]).unwrap();

        let format = TableFormat {
            skip_rows: 1,
            delimiter: Delimiter::Char(b','),
            ..TableFormat::default()
        };
        let back = load_dataset(&path, &format).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.n_rows(), data.n_rows());
        for r in 0..data.n_rows() {
            for c in 0..data.n_cols() {
                assert!((back.value(r, c) - data.value(r, c)).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn generated_dataset_reloads_bit_identically() {
        let path = temp_path("generated.dat");
        let spec = SampleSpec {
            rows: 40,
            predictors: 3,
            seed: 19,
            ..SampleSpec::default()
        };
        let sample = generate_sample(&spec).unwrap();
        write_dataset(&path, &sample.data, Delimiter::Whitespace, &[]).unwrap();

        let back = load_dataset(&path, &TableFormat::default()).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(back, sample.data);

        let a = fit(&sample.data, 2, &FitOptions::default()).unwrap();
        let b = fit(&back, 2, &FitOptions::default()).unwrap();
        assert_eq!(a.coefficients, b.coefficients);
    }

    #[test]
    fn result_json_round_trips() {
        let path = temp_path("fit.json");
        let fit = fit(&sample(), 1, &FitOptions::default()).unwrap();
        write_result_json(&path, "sample", &fit).unwrap();

        let file = read_result_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(file.tool, "mpf");
        assert_eq!(file.source, "sample");
        assert_eq!(file.fit.labels, fit.labels);
        assert_eq!(file.fit.dof, fit.dof);
    }
}
