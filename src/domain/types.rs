//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - decoded from the sales endpoint / local CSV files
//! - aggregated and filtered in-memory
//! - exported to JSON/CSV

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default inclusive range over aggregated `sold_count`.
pub const DEFAULT_SOLD_COUNT_RANGE: ValueRange = ValueRange::new(0.0, 100.0);

/// Default inclusive range over aggregated `avg_price`.
pub const DEFAULT_AVG_PRICE_RANGE: ValueRange = ValueRange::new(0.0, 10_000.0);

/// Number of products kept by the `top5` preset.
pub const TOP_SOLD_COUNT: usize = 5;

/// Number of products kept by the `top10revenue` preset.
pub const TOP_REVENUE_COUNT: usize = 10;

/// Slack applied to the derived price floor of the `top10revenue` preset.
pub const REVENUE_PRICE_SLACK: f64 = 0.9;

/// One reported sales observation for a product.
///
/// The same `name` may appear on several records (variants, source rows, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: String,
    pub name: String,
    pub sold_count: u64,
    pub avg_price: f64,
}

impl SaleRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sold_count: u64, avg_price: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            sold_count,
            avg_price,
        }
    }

    /// Revenue contributed by this record (`avg_price × sold_count`).
    pub fn revenue(&self) -> f64 {
        self.avg_price * self.sold_count as f64
    }
}

/// Per-name rollup of one or more `SaleRecord`s.
///
/// `avg_price` is the weighted average `total_revenue / sold_count`, not the mean
/// of the per-record prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedProduct {
    pub name: String,
    pub sold_count: u64,
    pub avg_price: f64,
    pub total_revenue: f64,
}

/// Closed numeric interval `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    pub min: f64,
    pub max: f64,
}

impl ValueRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Inclusive on both bounds.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl std::fmt::Display for ValueRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", fmt_bound(self.min), fmt_bound(self.max))
    }
}

fn fmt_bound(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// The two ranges applied to aggregated products.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeFilter {
    pub sold_count: ValueRange,
    pub avg_price: ValueRange,
}

impl Default for RangeFilter {
    fn default() -> Self {
        Self {
            sold_count: DEFAULT_SOLD_COUNT_RANGE,
            avg_price: DEFAULT_AVG_PRICE_RANGE,
        }
    }
}

impl RangeFilter {
    pub fn matches(&self, product: &AggregatedProduct) -> bool {
        self.sold_count.contains(product.sold_count as f64) && self.avg_price.contains(product.avg_price)
    }
}

/// Named rule that derives a `RangeFilter` from the current aggregated set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Top 5 products by units sold.
    Top5,
    /// Top 10 products by total revenue.
    Top10revenue,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Top5, Preset::Top10revenue];

    pub fn display_name(self) -> &'static str {
        match self {
            Preset::Top5 => "Top 5 by Sold Count",
            Preset::Top10revenue => "Top 10 by Revenue",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Preset::Top5 => "top5",
            Preset::Top10revenue => "top10revenue",
        }
    }
}

/// Filter state owned by the dashboard.
///
/// States: no preset, `top5` active, `top10revenue` active. Only selecting a
/// preset or resetting changes `active`; editing a bound by hand does not.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub ranges: RangeFilter,
    pub active: Option<Preset>,
}

/// Where the dashboard's records came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SalesSource {
    /// `GET /products/sales` answered with data.
    Live,
    /// The endpoint failed and the built-in sample was substituted.
    Fallback,
    /// Loaded from a local CSV file.
    File(PathBuf),
}

impl SalesSource {
    pub fn label(&self) -> String {
        match self {
            SalesSource::Live => "live".to_string(),
            SalesSource::Fallback => "sample (endpoint unavailable)".to_string(),
            SalesSource::File(path) => format!("file {}", path.display()),
        }
    }
}

/// Headline numbers shown above the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardTotals {
    pub products: usize,
    pub units_sold: u64,
    pub revenue: f64,
}

/// Output format for `dash summary`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Table,
    Json,
}
