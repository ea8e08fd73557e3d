//! Export aggregated products to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::domain::AggregatedProduct;
use crate::error::AppError;

/// Write products as `name,sold_count,avg_price,total_revenue`.
pub fn write_products_csv(path: &Path, products: &[AggregatedProduct]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["name", "sold_count", "avg_price", "total_revenue"])
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV header: {e}")))?;

    for p in products {
        writer
            .write_record([
                p.name.clone(),
                p.sold_count.to_string(),
                format!("{:.4}", p.avg_price),
                format!("{:.4}", p.total_revenue),
            ])
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = products.len(), "exported products");
    Ok(())
}

/// Write products as a pretty-printed JSON array.
pub fn write_products_json(path: &Path, products: &[AggregatedProduct]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(&mut file, products)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;
    writeln!(file).map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;
    tracing::info!(path = %path.display(), rows = products.len(), "exported products");
    Ok(())
}

/// Export to `<dir>/sales_<timestamp>.csv` (used by the TUI).
pub fn write_timestamped_csv(dir: &Path, products: &[AggregatedProduct]) -> Result<PathBuf, AppError> {
    create_dir_all(dir).map_err(|e| AppError::new(4, format!("Failed to create export dir: {e}")))?;
    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("sales_{ts}.csv"));
    write_products_csv(&path, products)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn products() -> Vec<AggregatedProduct> {
        vec![AggregatedProduct {
            name: "Tire, Wheel".to_string(),
            sold_count: 15,
            avg_price: 2000.0 / 15.0,
            total_revenue: 2000.0,
        }]
    }

    #[test]
    fn csv_export_quotes_names_with_commas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_products_csv(&path, &products()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("name,sold_count,avg_price,total_revenue"));
        assert_eq!(lines.next(), Some("\"Tire, Wheel\",15,133.3333,2000.0000"));
    }

    #[test]
    fn json_export_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let rows = vec![AggregatedProduct {
            name: "GAP".to_string(),
            sold_count: 4,
            avg_price: 125.5,
            total_revenue: 502.0,
        }];
        write_products_json(&path, &rows).unwrap();
        let back: Vec<AggregatedProduct> = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn timestamped_export_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("exports");
        let path = write_timestamped_csv(&target, &products()).unwrap();
        assert!(path.starts_with(&target));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("sales_"));
        assert!(path.exists());
    }
}
