//! ASCII bar chart for terminal output.
//!
//! This is intentionally "dumb" (one bar per product, fixed width), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Each row shows the product, a bar proportional to units sold, the units, and
//! the product's share of all units shown.

use crate::domain::AggregatedProduct;
use crate::report::truncate;

const LABEL_WIDTH: usize = 24;

/// Render the units-sold distribution of `products` (in the given order).
pub fn render_distribution(products: &[AggregatedProduct], width: usize) -> String {
    let mut out = String::new();
    out.push_str("Sales Distribution (units sold)\n");

    let total: u64 = products.iter().map(|p| p.sold_count).sum();
    let max = products.iter().map(|p| p.sold_count).max().unwrap_or(0);
    if products.is_empty() || max == 0 {
        out.push_str("(nothing to plot)\n");
        return out;
    }

    let bar_width = width.saturating_sub(LABEL_WIDTH + 16).max(10);

    for p in products {
        let len = ((p.sold_count as f64 / max as f64) * bar_width as f64).round() as usize;
        let share = 100.0 * p.sold_count as f64 / total as f64;
        let line = format!(
            "{:<LABEL_WIDTH$} {:<bar_width$} {:>5} {:>5.1}%",
            truncate(&p.name, LABEL_WIDTH),
            "#".repeat(len),
            p.sold_count,
            share,
        );
        out.push_str(line.trim_end());
        out.push('\n');
    }

    out
}
