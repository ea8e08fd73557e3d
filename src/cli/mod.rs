//! Command-line parsing for the sales dashboard.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the analytics code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{OutputFormat, Preset};

pub mod picker;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "dash", version, about = "Product sales dashboard (terminal)")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print aggregated sales, totals and the units chart, optionally filtered.
    Summary(SummaryArgs),
    /// Show the first rows of a CSV file the way the import screen does.
    Preview(PreviewArgs),
    /// Preview a CSV file and submit it to `/products/import`.
    Import(ImportArgs),
    /// Launch the interactive TUI (dashboard + import screens).
    Tui(SourceArgs),
}

/// Where sales data comes from and where logs go.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Backend origin serving `/products/sales` (overrides `SALES_API_BASE`).
    #[arg(long, value_name = "URL")]
    pub api: Option<String>,

    /// Read sales records from a local CSV instead of the backend.
    #[arg(long = "from-csv", value_name = "CSV")]
    pub from_csv: Option<PathBuf>,

    /// Append logs to this file (overrides `SALES_LOG_FILE`).
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// Options for `dash summary`.
#[derive(Debug, Args, Clone)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Apply a preset before any explicit bounds.
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Minimum aggregated units sold (inclusive).
    #[arg(long)]
    pub sold_min: Option<f64>,

    /// Maximum aggregated units sold (inclusive).
    #[arg(long)]
    pub sold_max: Option<f64>,

    /// Minimum weighted average price (inclusive).
    #[arg(long)]
    pub price_min: Option<f64>,

    /// Maximum weighted average price (inclusive).
    #[arg(long)]
    pub price_max: Option<f64>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Disable the units chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 80)]
    pub width: usize,

    /// Export the filtered products (`.json` → JSON, anything else → CSV).
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,
}

/// Options for `dash preview`.
#[derive(Debug, Args, Clone)]
pub struct PreviewArgs {
    /// File to preview (must end in `.csv`).
    pub file: PathBuf,
}

/// Options for `dash import`.
#[derive(Debug, Args, Clone)]
pub struct ImportArgs {
    /// File to upload; omit to pick one interactively.
    pub file: Option<PathBuf>,

    /// Backend origin serving `/products/import` (overrides `SALES_API_BASE`).
    #[arg(long, value_name = "URL")]
    pub api: Option<String>,
}
