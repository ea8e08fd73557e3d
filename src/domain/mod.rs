//! Domain types used throughout the dashboard.
//!
//! This module defines:
//!
//! - raw and aggregated sales rows (`SaleRecord`, `AggregatedProduct`)
//! - filter state (`ValueRange`, `RangeFilter`, `Preset`, `FilterState`)
//! - presentation helpers (`SalesSource`, `DashboardTotals`, `OutputFormat`)

pub mod types;

pub use types::*;
