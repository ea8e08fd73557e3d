//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves configuration
//! - loads sales data (backend, fallback sample, or local CSV)
//! - applies presets / range bounds
//! - prints reports/charts, previews or uploads CSV files
//! - writes optional exports

use std::path::Path;

use clap::Parser;

use crate::analytics::RangeBound;
use crate::cli::{Command, ImportArgs, PreviewArgs, SourceArgs, SummaryArgs};
use crate::config::DashboardConfig;
use crate::domain::{FilterState, OutputFormat};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `dash` binary.
pub fn run() -> Result<(), AppError> {
    // `dash` and `dash --api URL` behave like `dash tui ...`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Summary(args) => handle_summary(args),
        Command::Preview(args) => handle_preview(args),
        Command::Import(args) => handle_import(args),
        Command::Tui(args) => handle_tui(args),
    }
}

fn resolve_config(source: &SourceArgs) -> Result<DashboardConfig, AppError> {
    DashboardConfig::from_env().with_overrides(source.api.as_deref(), source.log_file.as_ref())
}

fn handle_summary(args: SummaryArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let config = resolve_config(&args.source)?;
    let data = pipeline::load_sales(&config, args.source.from_csv.as_deref())?;

    let filter = filter_from_args(&args, &data.aggregated);
    let view = crate::report::build_view(&data.aggregated, &filter);

    match args.format {
        OutputFormat::Table => {
            print!("{}", crate::report::format_summary(&view, &filter, &data.source));
            if data.skipped_rows > 0 {
                println!("({} malformed row(s) skipped)", data.skipped_rows);
            }
            println!();
            if !args.no_plot {
                println!("{}", crate::plot::render_distribution(&view.chart, args.width));
            }
            print!("{}", crate::report::format_products_table(&view.table));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&view.table)
                .map_err(|e| AppError::new(4, format!("Failed to encode JSON: {e}")))?;
            println!("{json}");
        }
    }

    if let Some(path) = &args.export {
        export_products(path, &view.table)?;
    }

    Ok(())
}

/// Preset first, then explicit bounds on top.
pub fn filter_from_args(args: &SummaryArgs, aggregated: &[crate::domain::AggregatedProduct]) -> FilterState {
    let mut filter = FilterState::default();
    if let Some(preset) = args.preset {
        filter.apply_preset(preset, aggregated);
    }
    let bounds = [
        (RangeBound::SoldMin, args.sold_min),
        (RangeBound::SoldMax, args.sold_max),
        (RangeBound::PriceMin, args.price_min),
        (RangeBound::PriceMax, args.price_max),
    ];
    for (bound, value) in bounds {
        if let Some(v) = value {
            filter.set_bound(bound, v);
        }
    }
    filter
}

fn export_products(path: &Path, products: &[crate::domain::AggregatedProduct]) -> Result<(), AppError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        crate::io::export::write_products_json(path, products)
    } else {
        crate::io::export::write_products_csv(path, products)
    }
}

fn handle_preview(args: PreviewArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let preview = crate::io::preview::preview_file(&args.file)?;
    print!("{}", crate::report::format_preview(&preview));
    Ok(())
}

fn handle_import(args: ImportArgs) -> Result<(), AppError> {
    crate::logging::init_stderr();
    let config = DashboardConfig::from_env().with_overrides(args.api.as_deref(), None)?;

    let path = match args.file {
        Some(path) => path,
        None => crate::cli::picker::prompt_for_csv_path()?,
    };

    let preview = crate::io::preview::preview_file(&path)?;
    print!("{}", crate::report::format_preview(&preview));

    let client = crate::data::SalesClient::new(&config)?;
    client.upload_csv(&path)?;
    println!("File uploaded successfully!");
    Ok(())
}

fn handle_tui(args: SourceArgs) -> Result<(), AppError> {
    let config = resolve_config(&args)?;
    crate::logging::init_file(config.log_file.as_deref())?;
    crate::tui::run(config, args.from_csv)
}

/// Rewrite argv so `dash` defaults to `dash tui`.
///
/// Rules:
/// - `dash`                      -> `dash tui`
/// - `dash --api URL ...`        -> `dash tui --api URL ...`
/// - `dash --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("tui".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "summary" | "preview" | "import" | "tui");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "tui flags".
    if arg1.starts_with('-') {
        argv.insert(1, "tui".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::aggregate_sales;
    use crate::cli::Cli;
    use crate::data::sample::fallback_sales;
    use crate::domain::{Preset, ValueRange};

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["dash"])), argv(&["dash", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["dash", "--api", "http://x"])),
            argv(&["dash", "tui", "--api", "http://x"])
        );
        assert_eq!(rewrite_args(argv(&["dash", "--help"])), argv(&["dash", "--help"]));
        assert_eq!(rewrite_args(argv(&["dash", "summary"])), argv(&["dash", "summary"]));
    }

    #[test]
    fn explicit_bounds_override_preset() {
        let cli = Cli::parse_from(["dash", "summary", "--preset", "top5", "--sold-max", "500"]);
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        let aggregated = aggregate_sales(&fallback_sales());
        let filter = filter_from_args(&args, &aggregated);
        assert_eq!(filter.active, Some(Preset::Top5));
        assert_eq!(filter.ranges.sold_count, ValueRange::new(48.0, 500.0));
    }
}
