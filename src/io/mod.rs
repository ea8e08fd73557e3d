//! Input/output helpers.
//!
//! - import preview + extension check (`preview`)
//! - local sales CSV ingest (`ingest`)
//! - product exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;
pub mod preview;

pub use export::*;
pub use ingest::*;
pub use preview::*;
