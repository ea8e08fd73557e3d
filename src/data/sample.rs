//! Built-in sample dataset used when the sales endpoint is unavailable.

use crate::domain::SaleRecord;

/// `(id, name, sold_count, avg_price)`
const FALLBACK_ROWS: [(&str, &str, u64, f64); 10] = [
    ("19", "Vehicle Service Contract", 55, 5652.290909),
    ("48", "Appearance Protection", 53, 762.45283),
    ("7", "GAP", 51, 4108.607843),
    ("1", "Appearance Protection", 49, 4124.897959),
    ("11", "Multi-Protect Bundle", 48, 5587.833333),
    ("55", "Key Protection", 44, 554.863636),
    ("13", "Pre-Paid Maintenance", 44, 6832.5),
    ("54", "GAP", 42, 586.833333),
    ("70", "Windshield", 42, 1899.0),
    ("58", "Pre-Paid Maintenance", 37, 4720.891892),
];

/// The fixed 10-row sample.
pub fn fallback_sales() -> Vec<SaleRecord> {
    FALLBACK_ROWS
        .iter()
        .map(|&(id, name, sold_count, avg_price)| SaleRecord::new(id, name, sold_count, avg_price))
        .collect()
}
