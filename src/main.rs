//! CLI entry point for the restaurant rating heat-map pipeline.
//!
//! Provides subcommands for rendering the full dashboard page, exporting the
//! grid overlay on its own, and printing a run summary.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rating_heatmap::{
    fetch::load_source,
    grid::{
        aggregate::aggregate_with_summary,
        types::{BoundingBox, CellResult, GridSpec, PHILADELPHIA, RunSummary},
    },
    output::{print_json, write_cells_csv, write_html, write_json},
    page::Dashboard,
    parser::parse_records,
};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// CSV export of the restaurant dataset used by the original dashboard.
const DEFAULT_DATA_URL: &str =
    "https://drive.google.com/uc?export=download&id=1hdco3Lnkt7Fz8PlI33A153T9Mt77nUSY";

#[derive(Parser)]
#[command(name = "rating_heatmap")]
#[command(about = "Grid-aggregates restaurant ratings into a map heat-map", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// CSV file path or URL; defaults to $RATINGS_CSV_URL or the built-in dataset
    #[arg(value_name = "FILE_OR_URL")]
    source: Option<String>,
}

#[derive(Args)]
struct GridArgs {
    /// Northern edge of the bounding box, degrees latitude
    #[arg(long, default_value_t = PHILADELPHIA.north)]
    north: f64,

    /// Southern edge of the bounding box, degrees latitude
    #[arg(long, default_value_t = PHILADELPHIA.south)]
    south: f64,

    /// Eastern edge of the bounding box, degrees longitude
    #[arg(long, default_value_t = PHILADELPHIA.east)]
    east: f64,

    /// Western edge of the bounding box, degrees longitude
    #[arg(long, default_value_t = PHILADELPHIA.west)]
    west: f64,

    /// Grid cell height, degrees latitude
    #[arg(long, default_value_t = 0.01)]
    lat_step: f64,

    /// Grid cell width, degrees longitude
    #[arg(long, default_value_t = 0.01)]
    lon_step: f64,
}

impl GridArgs {
    fn bounds(&self) -> BoundingBox {
        BoundingBox {
            north: self.north,
            south: self.south,
            east: self.east,
            west: self.west,
        }
    }

    fn grid(&self) -> GridSpec {
        GridSpec {
            lat_step: self.lat_step,
            lon_step: self.lon_step,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render the full dashboard (HTML page plus JSON artifact)
    Render {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        grid: GridArgs,

        /// Path for the rendered HTML page
        #[arg(short, long, default_value = "dashboard.html")]
        output: String,

        /// Path for the dashboard JSON artifact
        #[arg(short, long, default_value = "dashboard.json")]
        json: String,
    },
    /// Export the grid overlay as JSON and CSV, without the page shell
    Aggregate {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        grid: GridArgs,

        /// Path for the overlay JSON (rectangle-draw commands)
        #[arg(short, long, default_value = "cells.json")]
        output: String,

        /// Optional path for a flat per-cell CSV export
        #[arg(long)]
        csv: Option<String>,
    },
    /// Aggregate and print the dashboard artifact to stdout
    Summary {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        grid: GridArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/rating_heatmap.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("rating_heatmap.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            source,
            grid,
            output,
            json,
        } => {
            let (cells, summary) = run_pipeline(&source, &grid).await?;
            let dashboard = Dashboard::new(cells, summary);

            write_json(&json, &dashboard)?;
            write_html(&output, &dashboard)?;
            info!(html = %output, json = %json, "Dashboard written");
        }
        Commands::Aggregate {
            source,
            grid,
            output,
            csv,
        } => {
            let (cells, _summary) = run_pipeline(&source, &grid).await?;

            write_json(&output, &cells)?;
            if let Some(csv_path) = csv {
                write_cells_csv(&csv_path, &cells)?;
                info!(path = %csv_path, "Cell CSV written");
            }
            info!(path = %output, cells = cells.len(), "Overlay JSON written");
        }
        Commands::Summary { source, grid } => {
            let (cells, summary) = run_pipeline(&source, &grid).await?;
            print_json(&Dashboard::new(cells, summary))?;
        }
    }

    Ok(())
}

fn resolve_source(args: &SourceArgs) -> String {
    args.source
        .clone()
        .or_else(|| std::env::var("RATINGS_CSV_URL").ok())
        .unwrap_or_else(|| DEFAULT_DATA_URL.to_string())
}

/// Loads the dataset and runs one aggregation pass over it.
#[tracing::instrument(skip(source, grid))]
async fn run_pipeline(
    source: &SourceArgs,
    grid: &GridArgs,
) -> Result<(Vec<CellResult>, RunSummary)> {
    let source = resolve_source(source);
    info!(source = %source, "Loading dataset");

    let bytes = load_source(&source).await?;
    let records = parse_records(&bytes)?;

    let (cells, summary) = aggregate_with_summary(&records, &grid.bounds(), &grid.grid());

    info!(
        records = summary.records_total,
        in_state = summary.records_in_state,
        in_bounds = summary.records_in_bounds,
        skipped_invalid = summary.records_skipped_invalid,
        cells = summary.cells_occupied,
        "Aggregation complete"
    );

    Ok((cells, summary))
}
