//! Shared "load → aggregate" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! backend fetch (or local CSV) -> fallback on failure -> aggregation
//!
//! The CLI and the TUI can then focus on filtering and presentation.

use std::path::Path;

use crate::analytics::aggregate_sales;
use crate::config::DashboardConfig;
use crate::data::SalesClient;
use crate::domain::{AggregatedProduct, SaleRecord, SalesSource};
use crate::error::AppError;
use crate::io::ingest::load_sales_csv;

/// Records plus their per-name rollup.
#[derive(Debug, Clone)]
pub struct SalesData {
    pub records: Vec<SaleRecord>,
    pub aggregated: Vec<AggregatedProduct>,
    pub source: SalesSource,
    /// Rows skipped while reading a local CSV (always 0 for the backend).
    pub skipped_rows: usize,
}

impl SalesData {
    pub fn from_records(records: Vec<SaleRecord>, source: SalesSource) -> Self {
        let aggregated = aggregate_sales(&records);
        Self {
            records,
            aggregated,
            source,
            skipped_rows: 0,
        }
    }
}

/// Load sales from `from_csv` when given, otherwise from the backend.
///
/// Backend failures never surface here: the built-in sample is substituted.
/// A local CSV that cannot be read is an error.
pub fn load_sales(config: &DashboardConfig, from_csv: Option<&Path>) -> Result<SalesData, AppError> {
    if let Some(path) = from_csv {
        let ingested = load_sales_csv(path)?;
        let skipped = ingested.row_errors.len();
        let mut data = SalesData::from_records(ingested.records, SalesSource::File(ingested.path));
        data.skipped_rows = skipped;
        return Ok(data);
    }

    let client = SalesClient::new(config)?;
    let (records, source) = client.fetch_sales_or_fallback();
    Ok(SalesData::from_records(records, source))
}
