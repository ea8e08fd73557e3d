//! Reporting utilities: the filtered dashboard view and its text rendering.

use crate::analytics::{apply_ranges, sort_by_revenue_desc, totals};
use crate::domain::{AggregatedProduct, DashboardTotals, FilterState};

pub mod format;

pub use format::*;

/// Everything the dashboard shows for one filter state.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Filtered products in aggregation order (chart order).
    pub chart: Vec<AggregatedProduct>,
    /// Filtered products by revenue, highest first (table order).
    pub table: Vec<AggregatedProduct>,
    pub totals: DashboardTotals,
}

/// Apply `filter` to the aggregated set and derive chart/table/totals.
pub fn build_view(aggregated: &[AggregatedProduct], filter: &FilterState) -> DashboardView {
    let chart = apply_ranges(aggregated, &filter.ranges);
    let mut table = chart.clone();
    sort_by_revenue_desc(&mut table);
    let totals = totals(&chart);
    DashboardView { chart, table, totals }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate_sales;
    use crate::data::sample::fallback_sales;

    #[test]
    fn default_filter_hides_products_above_hundred_units() {
        let aggregated = aggregate_sales(&fallback_sales());
        let view = build_view(&aggregated, &FilterState::default());
        // "Appearance Protection" sums to 102 units.
        assert_eq!(view.totals.products, 6);
        assert!(view.chart.iter().all(|p| p.name != "Appearance Protection"));
    }

    #[test]
    fn table_is_revenue_sorted_while_chart_keeps_order() {
        let aggregated = aggregate_sales(&fallback_sales());
        let view = build_view(&aggregated, &FilterState::default());
        assert_eq!(view.chart[0].name, "Vehicle Service Contract");
        assert_eq!(view.table[0].name, "Pre-Paid Maintenance");
        assert!(view.table.windows(2).all(|w| w[0].total_revenue >= w[1].total_revenue));
    }

    #[test]
    fn totals_cover_filtered_products_only() {
        let aggregated = aggregate_sales(&fallback_sales());
        let view = build_view(&aggregated, &FilterState::default());
        let units: u64 = view.chart.iter().map(|p| p.sold_count).sum();
        assert_eq!(view.totals.units_sold, units);
        assert_eq!(view.totals.units_sold, 55 + 93 + 48 + 44 + 81 + 42);
    }
}
