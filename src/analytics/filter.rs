//! Range filtering and display ordering.

use std::cmp::Ordering;

use crate::domain::{AggregatedProduct, RangeFilter};

/// Keep products whose units and average price both fall inside `ranges`.
///
/// Input order is preserved (the chart relies on it).
pub fn apply_ranges(products: &[AggregatedProduct], ranges: &RangeFilter) -> Vec<AggregatedProduct> {
    products.iter().filter(|p| ranges.matches(p)).cloned().collect()
}

/// Sort by `total_revenue` descending for tabular display.
pub fn sort_by_revenue_desc(products: &mut [AggregatedProduct]) {
    products.sort_by(|a, b| {
        b.total_revenue
            .partial_cmp(&a.total_revenue)
            .unwrap_or(Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValueRange;

    fn product(name: &str, sold: u64, price: f64) -> AggregatedProduct {
        AggregatedProduct {
            name: name.to_string(),
            sold_count: sold,
            avg_price: price,
            total_revenue: sold as f64 * price,
        }
    }

    #[test]
    fn upper_bound_is_inclusive() {
        let ranges = RangeFilter {
            sold_count: ValueRange::new(0.0, 50.0),
            avg_price: ValueRange::new(0.0, 1000.0),
        };
        let out = apply_ranges(&[product("edge", 50, 1000.0), product("over", 51, 10.0)], &ranges);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].name, "edge");
    }

    #[test]
    fn both_ranges_must_match() {
        let ranges = RangeFilter {
            sold_count: ValueRange::new(10.0, 100.0),
            avg_price: ValueRange::new(500.0, 10_000.0),
        };
        let out = apply_ranges(
            &[product("cheap", 20, 100.0), product("few", 5, 900.0), product("ok", 20, 900.0)],
            &ranges,
        );
        let names: Vec<&str> = out.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["ok"]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let products = crate::analytics::aggregate_sales(&crate::data::sample::fallback_sales());
        let ranges = RangeFilter {
            sold_count: ValueRange::new(45.0, 100.0),
            avg_price: ValueRange::new(1000.0, 6000.0),
        };
        let once = apply_ranges(&products, &ranges);
        let twice = apply_ranges(&once, &ranges);
        assert_eq!(once, twice);
    }

    #[test]
    fn filter_preserves_input_order() {
        let ranges = RangeFilter::default();
        let out = apply_ranges(&[product("z", 1, 1.0), product("a", 2, 2.0)], &ranges);
        assert_eq!(out[0].name, "z");
        assert_eq!(out[1].name, "a");
    }

    #[test]
    fn revenue_sort_is_descending() {
        let mut products = vec![product("low", 1, 10.0), product("high", 10, 100.0), product("mid", 5, 50.0)];
        sort_by_revenue_desc(&mut products);
        let names: Vec<&str> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["high", "mid", "low"]);
    }
}
