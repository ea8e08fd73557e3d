//! `sales-dash` library crate.
//!
//! The binary (`dash`) is a thin wrapper around this library so that:
//!
//! - aggregation and filtering are testable without spawning processes
//! - the CLI and TUI front-ends share one load/aggregate pipeline

pub mod analytics;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod plot;
pub mod report;
pub mod tui;
