//! Offline sales source: load `SaleRecord`s from a local CSV file.
//!
//! Unlike the preview, this uses a real CSV reader (quoted fields work) and
//! validates each row:
//! - **Strict schema**: `id`, `name`, `sold_count`, `avg_price` must exist (exit code 2)
//! - **Row-level validation**: bad rows are skipped and reported with their line
//! - a file with no usable rows is an error (exit code 3)

use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::StringRecord;

use crate::domain::SaleRecord;
use crate::error::AppError;

const REQUIRED_COLUMNS: [&str; 4] = ["id", "name", "sold_count", "avg_price"];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    pub line: usize,
    pub id: Option<String>,
    pub message: String,
}

/// Ingest output: parsed records + skipped-row report.
#[derive(Debug, Clone)]
pub struct IngestedSales {
    pub path: PathBuf,
    pub records: Vec<SaleRecord>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load sales records from `path`.
pub fn load_sales_csv(path: &Path) -> Result<IngestedSales, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // records() starts after the header; CSV lines are 1-based.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map) {
            Ok(sale) => records.push(sale),
            Err(message) => {
                let id = get_optional(&record, &header_map, "id").map(str::to_string);
                tracing::debug!(line, ?id, %message, "skipping sales row");
                row_errors.push(RowError { line, id, message });
            }
        }
    }

    if records.is_empty() {
        return Err(AppError::new(
            3,
            format!("No valid sales rows in '{}'.", path.display()),
        ));
    }

    if !row_errors.is_empty() {
        tracing::warn!(
            path = %path.display(),
            skipped = row_errors.len(),
            rows_read,
            "some sales rows were skipped"
        );
    }

    Ok(IngestedSales {
        path: path.to_path_buf(),
        records,
        row_errors,
        rows_read,
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports often prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_row(record: &StringRecord, header_map: &HashMap<String, usize>) -> Result<SaleRecord, String> {
    let id = get_required(record, header_map, "id")?;
    let name = get_required(record, header_map, "name")?;

    let sold_raw = get_required(record, header_map, "sold_count")?;
    let sold_count = sold_raw
        .parse::<u64>()
        .map_err(|_| format!("Invalid `sold_count` '{sold_raw}' (expected a whole number >= 0)."))?;

    let price_raw = get_required(record, header_map, "avg_price")?;
    let avg_price = price_raw
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
        .ok_or_else(|| format!("Invalid `avg_price` '{price_raw}' (expected a number >= 0)."))?;

    Ok(SaleRecord::new(id, name, sold_count, avg_price))
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_optional(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_optional<'a>(record: &'a StringRecord, header_map: &HashMap<String, usize>, name: &str) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}
