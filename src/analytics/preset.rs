//! Filter presets and the dashboard's filter state transitions.
//!
//! A preset derives lower bounds from the current aggregated set. The default
//! upper bounds (100 units, 10 000 price) are only floors for the preset's
//! upper bound: when a member of the preset's subset lies above them, the bound
//! is widened so the preset never filters out one of its own products.

use std::cmp::Ordering;

use crate::domain::{
    AggregatedProduct, FilterState, Preset, RangeFilter, ValueRange, DEFAULT_AVG_PRICE_RANGE,
    DEFAULT_SOLD_COUNT_RANGE, REVENUE_PRICE_SLACK, TOP_REVENUE_COUNT, TOP_SOLD_COUNT,
};

/// Compute the ranges a preset selects for `products`.
pub fn preset_ranges(preset: Preset, products: &[AggregatedProduct]) -> RangeFilter {
    match preset {
        Preset::Top5 => top_sold_ranges(products),
        Preset::Top10revenue => top_revenue_ranges(products),
    }
}

fn top_sold_ranges(products: &[AggregatedProduct]) -> RangeFilter {
    let top = top_by(products, TOP_SOLD_COUNT, |p| p.sold_count as f64);
    if top.is_empty() {
        return RangeFilter::default();
    }

    let min_sold = top.iter().map(|p| p.sold_count).min().unwrap_or(0) as f64;
    let max_sold = top.iter().map(|p| p.sold_count).max().unwrap_or(0) as f64;

    RangeFilter {
        sold_count: ValueRange::new(min_sold, DEFAULT_SOLD_COUNT_RANGE.max.max(max_sold)),
        avg_price: DEFAULT_AVG_PRICE_RANGE,
    }
}

fn top_revenue_ranges(products: &[AggregatedProduct]) -> RangeFilter {
    let top = top_by(products, TOP_REVENUE_COUNT, |p| p.total_revenue);
    if top.is_empty() {
        return RangeFilter::default();
    }

    let min_revenue = top.iter().map(|p| p.total_revenue).fold(f64::INFINITY, f64::min);
    let max_sold = top.iter().map(|p| p.sold_count).max().unwrap_or(0);
    let max_price = top.iter().map(|p| p.avg_price).fold(0.0, f64::max);

    // Smallest revenue over largest unit count: a floor at or below every
    // member's average price, even when the two come from different products.
    let min_price = if max_sold == 0 {
        0.0
    } else {
        min_revenue / max_sold as f64
    };

    RangeFilter {
        sold_count: ValueRange::new(
            DEFAULT_SOLD_COUNT_RANGE.min,
            DEFAULT_SOLD_COUNT_RANGE.max.max(max_sold as f64),
        ),
        avg_price: ValueRange::new(
            min_price * REVENUE_PRICE_SLACK,
            DEFAULT_AVG_PRICE_RANGE.max.max(max_price),
        ),
    }
}

/// First `n` products by `key` descending; ties keep input order.
fn top_by(
    products: &[AggregatedProduct],
    n: usize,
    key: impl Fn(&AggregatedProduct) -> f64,
) -> Vec<&AggregatedProduct> {
    let mut sorted: Vec<&AggregatedProduct> = products.iter().collect();
    sorted.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    sorted.truncate(n);
    sorted
}

impl FilterState {
    /// Select a preset: derive its ranges and mark it active.
    pub fn apply_preset(&mut self, preset: Preset, products: &[AggregatedProduct]) {
        self.ranges = preset_ranges(preset, products);
        self.active = Some(preset);
    }

    /// Back to the default ranges with no active preset.
    pub fn reset(&mut self) {
        *self = FilterState::default();
    }

    /// Edit a single bound by hand. The active preset marker is left as is.
    pub fn set_bound(&mut self, bound: RangeBound, value: f64) {
        match bound {
            RangeBound::SoldMin => self.ranges.sold_count.min = value,
            RangeBound::SoldMax => self.ranges.sold_count.max = value,
            RangeBound::PriceMin => self.ranges.avg_price.min = value,
            RangeBound::PriceMax => self.ranges.avg_price.max = value,
        }
    }

    pub fn bound(&self, bound: RangeBound) -> f64 {
        match bound {
            RangeBound::SoldMin => self.ranges.sold_count.min,
            RangeBound::SoldMax => self.ranges.sold_count.max,
            RangeBound::PriceMin => self.ranges.avg_price.min,
            RangeBound::PriceMax => self.ranges.avg_price.max,
        }
    }
}

/// One editable bound of the range filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    SoldMin,
    SoldMax,
    PriceMin,
    PriceMax,
}

impl RangeBound {
    pub const ALL: [RangeBound; 4] = [
        RangeBound::SoldMin,
        RangeBound::SoldMax,
        RangeBound::PriceMin,
        RangeBound::PriceMax,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RangeBound::SoldMin => "Sold count min",
            RangeBound::SoldMax => "Sold count max",
            RangeBound::PriceMin => "Avg price min",
            RangeBound::PriceMax => "Avg price max",
        }
    }
}
