//! Formatted terminal output.
//!
//! We keep formatting code in one place so the analytics stay clean and testable
//! and output changes are localized.

use crate::domain::{AggregatedProduct, DashboardTotals, FilterState, SalesSource};
use crate::io::preview::CsvPreview;
use crate::report::DashboardView;

/// Header block: data source, active filters, headline totals.
pub fn format_summary(view: &DashboardView, filter: &FilterState, source: &SalesSource) -> String {
    let mut out = String::new();

    out.push_str("=== Products Dashboard ===\n");
    out.push_str(&format!("Source: {}\n", source.label()));
    out.push_str(&format!(
        "Filters: sold {} | avg price ${} | preset: {}\n",
        filter.ranges.sold_count,
        filter.ranges.avg_price,
        filter.active.map(|p| p.key()).unwrap_or("none"),
    ));
    out.push_str(&format_totals(&view.totals));
    out.push('\n');

    out
}

pub fn format_totals(totals: &DashboardTotals) -> String {
    format!(
        "Total products: {} | Total sold: {} | Total revenue: ${}\n",
        totals.products,
        fmt_thousands(totals.units_sold),
        fmt_money(totals.revenue),
    )
}

/// The "Top Products" table (rows are expected in revenue order).
pub fn format_products_table(rows: &[AggregatedProduct]) -> String {
    let mut out = String::new();
    out.push_str(
        format!("{:<28} {:>8} {:>12} {:>14}", "Product", "Sold", "Avg Price", "Revenue").trim_end(),
    );
    out.push('\n');
    out.push_str(format!("{:-<28} {:-<8} {:-<12} {:-<14}", "", "", "", "").trim_end());
    out.push('\n');

    if rows.is_empty() {
        out.push_str("(no products match the current filters)\n");
        return out;
    }

    for p in rows {
        out.push_str(
            format!(
                "{:<28} {:>8} {:>12} {:>14}",
                truncate(&p.name, 28),
                p.sold_count,
                format!("${:.2}", p.avg_price),
                format!("${}", fmt_money(p.total_revenue)),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Preview table: header row, separator, up to ten data rows.
pub fn format_preview(preview: &CsvPreview) -> String {
    let Some(header) = preview.header() else {
        return "(empty file)\n".to_string();
    };

    let columns = preview.rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for row in &preview.rows {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count().min(24));
        }
    }

    let render_row = |row: &[String]| -> String {
        let cells: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| format!("{:<w$}", truncate(cell, 24), w = widths[i]))
            .collect();
        cells.join(" | ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&format!("Preview (first {} rows)\n", preview.body().len()));
    out.push_str(&render_row(header));
    out.push('\n');
    let sep: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&sep.join("-+-"));
    out.push('\n');
    for row in preview.body() {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}

/// Whole-number money with thousands separators (`1234567.8` → `1,234,568`).
pub fn fmt_money(v: f64) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    let rounded = v.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}{}", fmt_thousands(rounded.abs() as u64))
}

pub fn fmt_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::preview::parse_preview;

    #[test]
    fn thousands_separators() {
        assert_eq!(fmt_thousands(0), "0");
        assert_eq!(fmt_thousands(999), "999");
        assert_eq!(fmt_thousands(1000), "1,000");
        assert_eq!(fmt_thousands(1234567), "1,234,567");
        assert_eq!(fmt_money(2000.4), "2,000");
        assert_eq!(fmt_money(-1500.0), "-1,500");
    }

    #[test]
    fn products_table_lists_rows() {
        let rows = vec![AggregatedProduct {
            name: "A".to_string(),
            sold_count: 15,
            avg_price: 2000.0 / 15.0,
            total_revenue: 2000.0,
        }];
        let table = format_products_table(&rows);
        let last = table.lines().last().unwrap();
        assert!(last.starts_with('A'));
        assert!(last.contains("$133.33"));
        assert!(last.ends_with("$2,000"));
    }

    #[test]
    fn empty_table_has_hint() {
        assert!(format_products_table(&[]).contains("no products match"));
    }

    #[test]
    fn preview_handles_header_only_and_empty() {
        assert_eq!(format_preview(&parse_preview("")), "(empty file)\n");
        let out = format_preview(&parse_preview("id,name"));
        assert!(out.starts_with("Preview (first 0 rows)"));
        assert_eq!(out.lines().count(), 3);
    }

    #[test]
    fn preview_tolerates_ragged_rows() {
        let out = format_preview(&parse_preview("a,b\n1,2,3\n4"));
        assert_eq!(out.lines().count(), 5);
    }

    #[test]
    fn truncate_marks_cut() {
        assert_eq!(truncate("Vehicle Service Contract", 8), "Vehicle.");
        assert_eq!(truncate("GAP", 8), "GAP");
    }
}
