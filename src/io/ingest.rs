//! Numeric table ingest.
//!
//! This module turns a text table into a `Dataset`:
//!
//! - the first `skip_rows` physical lines are skipped (headers, notes)
//! - blank lines and comment lines are ignored
//! - every remaining line must hold the same number of numeric fields
//!
//! Design goals:
//! - **Strict**: any bad field or ragged row fails the whole load, with its
//!   1-based line number in the message
//! - **Deterministic**: no type sniffing, no header detection
//! - **Separation of concerns**: no fitting logic here

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use log::debug;

use crate::domain::Dataset;
use crate::error::{AppError, FitError};

/// Field separator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    /// Any run of spaces/tabs.
    #[default]
    Whitespace,
    /// A single byte such as `,` or `;`, parsed with the `csv` reader.
    Char(u8),
}

impl FromStr for Delimiter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ws" | "whitespace" | "space" => Ok(Delimiter::Whitespace),
            "tab" | "\\t" | "\t" => Ok(Delimiter::Char(b'\t')),
            s if s.len() == 1 && s.is_ascii() => Ok(Delimiter::Char(s.as_bytes()[0])),
            other => Err(format!(
                "invalid delimiter '{other}': use 'whitespace', 'tab' or a single ASCII character"
            )),
        }
    }
}

/// How to read a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableFormat {
    pub skip_rows: usize,
    pub delimiter: Delimiter,
    pub comment: u8,
}

impl Default for TableFormat {
    fn default() -> Self {
        Self {
            skip_rows: 0,
            delimiter: Delimiter::Whitespace,
            comment: b'#',
        }
    }
}

/// Open and parse a table file.
pub fn load_dataset(path: &Path, format: &TableFormat) -> Result<Dataset, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open data file '{}': {e}", path.display())))?;
    let data = parse_dataset(file, format)
        .map_err(|e| AppError::new(e.exit_code(), format!("{}: {e}", path.display())))?;
    debug!(
        "loaded '{}': {} rows x {} columns",
        path.display(),
        data.n_rows(),
        data.n_cols()
    );
    Ok(data)
}

/// Parse a table from any reader.
pub fn parse_dataset<R: Read>(mut reader: R, format: &TableFormat) -> Result<Dataset, FitError> {
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| FitError::malformed(format!("failed to read input: {e}")))?;

    let body = skip_lines(&text, format.skip_rows);
    let rows = match format.delimiter {
        Delimiter::Whitespace => parse_whitespace(body, format)?,
        Delimiter::Char(d) => parse_delimited(body, d, format)?,
    };

    Dataset::from_rows(&rows)
}

fn skip_lines(text: &str, n: usize) -> &str {
    let mut rest = text;
    for _ in 0..n {
        match rest.find('\n') {
            Some(i) => rest = &rest[i + 1..],
            None => return "",
        }
    }
    rest
}

fn parse_whitespace(body: &str, format: &TableFormat) -> Result<Vec<Vec<f64>>, FitError> {
    let comment = format.comment as char;
    let mut rows = Vec::new();
    let mut width = None;

    for (idx, raw) in body.lines().enumerate() {
        let line = format.skip_rows + idx + 1;
        let content = raw.split(comment).next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let row = content
            .split_whitespace()
            .enumerate()
            .map(|(col, field)| parse_field(field, line, col))
            .collect::<Result<Vec<f64>, FitError>>()?;
        check_width(&mut width, row.len(), line)?;
        rows.push(row);
    }

    Ok(rows)
}

fn parse_delimited(body: &str, delimiter: u8, format: &TableFormat) -> Result<Vec<Vec<f64>>, FitError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .comment(Some(format.comment))
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    let mut width = None;

    for result in reader.records() {
        let record = result.map_err(|e| FitError::malformed(format!("CSV parse error: {e}")))?;
        let line = format.skip_rows + record.position().map_or(0, |p| p.line() as usize);
        if record.len() == 1 && record[0].is_empty() {
            continue;
        }

        let row = record
            .iter()
            .enumerate()
            .map(|(col, field)| parse_field(field, line, col))
            .collect::<Result<Vec<f64>, FitError>>()?;
        check_width(&mut width, row.len(), line)?;
        rows.push(row);
    }

    Ok(rows)
}

fn parse_field(field: &str, line: usize, col: usize) -> Result<f64, FitError> {
    let v = field.parse::<f64>().map_err(|_| {
        FitError::malformed(format!("line {line}, column {}: invalid number '{field}'", col + 1))
    })?;
    if !v.is_finite() {
        return Err(FitError::malformed(format!(
            "line {line}, column {}: non-finite value '{field}'",
            col + 1
        )));
    }
    Ok(v)
}

fn check_width(width: &mut Option<usize>, n: usize, line: usize) -> Result<(), FitError> {
    match *width {
        None => {
            *width = Some(n);
            Ok(())
        }
        Some(w) if w == n => Ok(()),
        Some(w) => Err(FitError::malformed(format!(
            "line {line}: expected {w} columns, found {n}"
        ))),
    }
}
