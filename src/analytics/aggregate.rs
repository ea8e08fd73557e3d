//! Group-by-name rollup of raw sales records.

use std::collections::HashMap;

use crate::domain::{AggregatedProduct, DashboardTotals, SaleRecord};

/// Aggregate records into one `AggregatedProduct` per distinct name.
///
/// Output order is the first-seen order of each name. Revenue is weighted:
/// each record contributes `avg_price × sold_count`, and the rolled-up
/// `avg_price` is `revenue / units`. A product whose units sum to zero is kept
/// with `avg_price = 0`.
pub fn aggregate_sales(records: &[SaleRecord]) -> Vec<AggregatedProduct> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut acc: Vec<(&str, u64, f64)> = Vec::new();

    for record in records {
        let slot = *index.entry(record.name.as_str()).or_insert_with(|| {
            acc.push((record.name.as_str(), 0, 0.0));
            acc.len() - 1
        });
        let (_, units, revenue) = &mut acc[slot];
        *units += record.sold_count;
        *revenue += record.revenue();
    }

    acc.into_iter()
        .map(|(name, sold_count, total_revenue)| AggregatedProduct {
            name: name.to_string(),
            sold_count,
            avg_price: weighted_avg_price(total_revenue, sold_count),
            total_revenue,
        })
        .collect()
}

fn weighted_avg_price(revenue: f64, units: u64) -> f64 {
    if units == 0 {
        return 0.0;
    }
    revenue / units as f64
}

/// Headline totals over a (usually filtered) product list.
pub fn totals(products: &[AggregatedProduct]) -> DashboardTotals {
    DashboardTotals {
        products: products.len(),
        units_sold: products.iter().map(|p| p.sold_count).sum(),
        revenue: products.iter().map(|p| p.total_revenue).sum(),
    }
}
