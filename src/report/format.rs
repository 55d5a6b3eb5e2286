//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{DatasetStats, FitResult, Sigma};
use crate::fit::BatchFit;

/// Format the full fit summary (dataset stats + coefficients + statistics).
pub fn format_fit_summary(label: &str, stats: &DatasetStats, fit: &FitResult) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== mpf - polynomial fit: {label} ===\n"));
    out.push_str(&format!(
        "Data: rows={} predictors={} | y=[{:.4}, {:.4}] mean={:.4}\n",
        stats.n_rows, stats.n_predictors, stats.y_min, stats.y_max, stats.y_mean
    ));
    out.push_str(&format!(
        "Model: degree {}{} | columns={} rank={}\n",
        fit.degree.as_u32(),
        if fit.cross_terms { " + cross terms" } else { "" },
        fit.coefficients.len(),
        fit.rank,
    ));

    out.push_str("\nCoefficients:\n");
    let width = fit.labels.iter().map(String::len).max().unwrap_or(1).max(4);
    for (label, coef) in fit.labels.iter().zip(&fit.coefficients) {
        out.push_str(&format!("  {label:<width$}  {coef:>16.8e}\n"));
    }

    out.push_str("\nStatistics:\n");
    out.push_str(&format!("  dof            {}\n", fit.dof));
    out.push_str(&format!("  rss            {:.8e}\n", fit.rss));
    let sigma_note = match fit.sigma {
        Sigma::Known(s) => format!("known sigma={s}"),
        Sigma::Estimated => "estimated from residuals".to_string(),
    };
    out.push_str(&format!("  sigma^2        {:.8e} ({sigma_note})\n", fit.sigma_sq));
    out.push_str(&format!("  chi^2          {:.6}\n", fit.chi_sq));
    out.push_str(&format!("  chi^2 reduced  {:.6}\n", fit.chi_sq_reduced));
    out.push_str(&format!("  R^2            {:.6}\n", fit.r_squared));

    if let Some(corr) = &fit.correlation {
        out.push_str("\nCorrelation (columns: predictors then response):\n");
        out.push_str(&format!("  {:>6}", ""));
        for j in 0..corr.dim() {
            out.push_str(&format!(" {:>9}", column_name(j, corr.dim())));
        }
        out.push('\n');
        for i in 0..corr.dim() {
            out.push_str(&format!("  {:>6}", column_name(i, corr.dim())));
            for j in 0..corr.dim() {
                out.push_str(&format!(" {:>9.4}", corr.get(i, j)));
            }
            out.push('\n');
        }
    }

    out
}

/// One line per batch entry.
pub fn format_batch_table(batch: &[BatchFit]) -> String {
    let mut out = String::new();
    let width = batch.iter().map(|b| b.label.len()).max().unwrap_or(6).max(6);

    out.push_str(&format!(
        "{:<width$}  {:>6}  {:>14}  {:>12}  {:>10}\n",
        "source", "dof", "rss", "chi^2 red", "R^2"
    ));
    for b in batch {
        match &b.result {
            Ok(fit) => out.push_str(&format!(
                "{:<width$}  {:>6}  {:>14.6e}  {:>12.6}  {:>10.6}\n",
                b.label, fit.dof, fit.rss, fit.chi_sq_reduced, fit.r_squared
            )),
            Err(e) => out.push_str(&format!("{:<width$}  error: {e}\n", b.label)),
        }
    }

    out
}

fn column_name(idx: usize, n_cols: usize) -> String {
    if idx + 1 == n_cols {
        "y".to_string()
    } else {
        format!("x{idx}")
    }
}
