//! Spatial binning and rating classification.
//!
//! This module buckets point-located restaurant records into a uniform
//! latitude/longitude grid over a bounding box, computes the mean rating of
//! each non-empty cell, and maps that mean to a discrete overlay color. It is
//! a pure, single-pass transformation; rendering consumers take its output
//! as-is.

pub mod aggregate;
pub mod bands;
pub mod types;
pub mod utility;

pub use aggregate::{aggregate, aggregate_with_summary};
pub use bands::color_for;
pub use types::{BoundingBox, CellResult, GridSpec, PHILADELPHIA, Record, RunSummary, TARGET_STATE};
