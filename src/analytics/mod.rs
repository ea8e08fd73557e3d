//! Sales analytics: the only logic in the dashboard with rules of its own.
//!
//! - group raw records by product name (`aggregate`)
//! - inclusive range filtering + display ordering (`filter`)
//! - presets and filter state transitions (`preset`)

pub mod aggregate;
pub mod filter;
pub mod preset;

pub use aggregate::*;
pub use filter::*;
pub use preset::*;
