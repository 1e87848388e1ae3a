//! Artifact formatting and persistence.
//!
//! Supports pretty-printed JSON on stdout, JSON files, a flat per-cell CSV
//! export, and the rendered HTML page.

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::grid::types::CellResult;
use crate::page::{Dashboard, render_html};
use csv::WriterBuilder;

/// Prints any artifact as pretty-printed JSON to stdout.
pub fn print_json<T: Serialize>(artifact: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(artifact)?);
    Ok(())
}

/// Writes any artifact as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &str, artifact: &T) -> Result<()> {
    ensure_parent(path)?;
    debug!(path, "Writing JSON artifact");
    fs::write(path, serde_json::to_string_pretty(artifact)?)?;
    Ok(())
}

/// One flat row of the per-cell CSV export.
#[derive(Serialize)]
struct CellRow<'a> {
    south: f64,
    west: f64,
    north: f64,
    east: f64,
    avg_rating: f64,
    restaurants: usize,
    color: &'a str,
}

/// Writes the occupied cells as a CSV table, one row per cell.
pub fn write_cells_csv(path: &str, cells: &[CellResult]) -> Result<()> {
    ensure_parent(path)?;
    debug!(path, cells = cells.len(), "Writing cell CSV");

    let mut writer = WriterBuilder::new().from_path(path)?;
    for cell in cells {
        writer.serialize(CellRow {
            south: cell.bounds[0][0],
            west: cell.bounds[0][1],
            north: cell.bounds[1][0],
            east: cell.bounds[1][1],
            avg_rating: cell.avg_rating,
            restaurants: cell.restaurants,
            color: cell.color,
        })?;
    }
    writer.flush()?;

    Ok(())
}

/// Writes the rendered dashboard page.
pub fn write_html(path: &str, dashboard: &Dashboard) -> Result<()> {
    ensure_parent(path)?;
    debug!(path, "Writing dashboard HTML");
    fs::write(path, render_html(dashboard)?)?;
    Ok(())
}

fn ensure_parent(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
