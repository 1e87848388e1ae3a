//! Data types used by the grid aggregation pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// One row of the source dataset.
///
/// Numeric fields are lenient on deserialization: an empty or unparseable
/// value becomes `None`, and the record is later excluded from aggregation
/// instead of failing the load.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Record {
    pub state: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub longitude: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub stars: Option<f64>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| s.trim().parse::<f64>().ok()))
}

/// Geographic rectangle within which aggregation occurs, degrees.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// Approximate bounding box for the Philadelphia metro area.
pub const PHILADELPHIA: BoundingBox = BoundingBox {
    north: 40.137992,
    south: 39.867004,
    east: -74.955763,
    west: -75.280303,
};

/// Region code the dataset is filtered to before any spatial work.
pub const TARGET_STATE: &str = "PA";

impl BoundingBox {
    /// Inclusive on all four edges, matching the source-data filter.
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        latitude >= self.south
            && latitude <= self.north
            && longitude >= self.west
            && longitude <= self.east
    }
}

/// Uniform cell size for the aggregation grid, degrees per cell.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct GridSpec {
    pub lat_step: f64,
    pub lon_step: f64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            lat_step: 0.01,
            lon_step: 0.01,
        }
    }
}

impl GridSpec {
    /// Latitude cell origins covering `bounds`, south to north.
    ///
    /// Origins are `south + i * lat_step` for every origin strictly below
    /// north. The last row may extend past the box edge; records are
    /// filtered to the box beforehand, so no point can land beyond it.
    pub fn lat_bins(&self, bounds: &BoundingBox) -> Vec<f64> {
        Self::bins(bounds.south, bounds.north, self.lat_step)
    }

    /// Longitude cell origins covering `bounds`, west to east.
    pub fn lon_bins(&self, bounds: &BoundingBox) -> Vec<f64> {
        Self::bins(bounds.west, bounds.east, self.lon_step)
    }

    fn bins(start: f64, stop: f64, step: f64) -> Vec<f64> {
        // start + i*step rather than a running sum, so float error does not
        // accumulate across a few hundred cells.
        (0..)
            .map(|i| start + i as f64 * step)
            .take_while(|&v| v < stop)
            .collect()
    }
}

/// One rectangle-draw command for the map overlay.
///
/// Field names serialize in the form the map consumer expects
/// (`fillColor`, `fillOpacity`).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CellResult {
    /// `[[south-west lat, lon], [north-east lat, lon]]` of the cell.
    pub bounds: [[f64; 2]; 2],
    pub color: &'static str,
    #[serde(rename = "fillColor")]
    pub fill_color: &'static str,
    #[serde(rename = "fillOpacity")]
    pub fill_opacity: f64,
    pub tooltip: String,
    #[serde(rename = "avgRating")]
    pub avg_rating: f64,
    pub restaurants: usize,
}

/// Counters describing one aggregation run, logged and embedded in artifacts.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub records_total: usize,
    pub records_in_state: usize,
    pub records_in_bounds: usize,
    pub records_skipped_invalid: usize,
    pub cells_occupied: usize,
    pub cells_by_color: BTreeMap<&'static str, usize>,
}
