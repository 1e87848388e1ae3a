use crate::grid::bands::color_for;
use crate::grid::types::{BoundingBox, CellResult, GridSpec, Record, RunSummary, TARGET_STATE};
use crate::grid::utility::mean;
use chrono::Utc;
use std::collections::BTreeMap;
use tracing::debug;

/// Fill opacity for every overlay rectangle.
const FILL_OPACITY: f64 = 0.2;

/// Buckets records into the grid and computes one [`CellResult`] per
/// non-empty cell.
///
/// Records are kept only when their `state` matches the target region, all
/// three numeric fields are present, and their coordinates lie inside
/// `bounds` (inclusive). Each surviving record lands in exactly one half-open
/// cell `[lat, lat + lat_step) × [lon, lon + lon_step)`. Cells with no
/// records emit nothing.
///
/// Output is ordered by cell origin, row-major from the south-west corner;
/// consumers accept any order. The input is never mutated.
pub fn aggregate(records: &[Record], bounds: &BoundingBox, grid: &GridSpec) -> Vec<CellResult> {
    aggregate_with_summary(records, bounds, grid).0
}

/// Same as [`aggregate`], additionally returning run counters for logging
/// and artifact embedding.
pub fn aggregate_with_summary(
    records: &[Record],
    bounds: &BoundingBox,
    grid: &GridSpec,
) -> (Vec<CellResult>, RunSummary) {
    let lat_bins = grid.lat_bins(bounds);
    let lon_bins = grid.lon_bins(bounds);

    let mut in_state = 0usize;
    let mut skipped_invalid = 0usize;
    let mut in_bounds = 0usize;

    // stars values grouped by (lat bin, lon bin) index
    let mut cells: BTreeMap<(usize, usize), Vec<f64>> = BTreeMap::new();

    for record in records {
        if record.state != TARGET_STATE {
            continue;
        }
        in_state += 1;

        let (Some(lat), Some(lon), Some(stars)) =
            (record.latitude, record.longitude, record.stars)
        else {
            skipped_invalid += 1;
            continue;
        };

        if !bounds.contains(lat, lon) {
            continue;
        }
        in_bounds += 1;

        // A point exactly on the north/east edge passes the inclusive box
        // filter but can sit past the last half-open cell; it joins no cell.
        let (Some(lat_idx), Some(lon_idx)) = (
            bin_index(lat, grid.lat_step, &lat_bins),
            bin_index(lon, grid.lon_step, &lon_bins),
        ) else {
            continue;
        };

        cells.entry((lat_idx, lon_idx)).or_default().push(stars);
    }

    let mut results = Vec::with_capacity(cells.len());
    let mut cells_by_color: BTreeMap<&'static str, usize> = BTreeMap::new();

    for ((lat_idx, lon_idx), stars) in cells {
        let lat = lat_bins[lat_idx];
        let lon = lon_bins[lon_idx];

        let avg_rating = mean(&stars);
        let color = color_for(avg_rating);
        *cells_by_color.entry(color).or_default() += 1;

        results.push(CellResult {
            bounds: [[lat, lon], [lat + grid.lat_step, lon + grid.lon_step]],
            color,
            fill_color: color,
            fill_opacity: FILL_OPACITY,
            tooltip: format!("Average Rating: {avg_rating:.2}"),
            avg_rating,
            restaurants: stars.len(),
        });
    }

    debug!(
        records = records.len(),
        in_state,
        in_bounds,
        skipped_invalid,
        cells = results.len(),
        "Aggregation pass complete"
    );

    let summary = RunSummary {
        generated_at: Utc::now(),
        records_total: records.len(),
        records_in_state: in_state,
        records_in_bounds: in_bounds,
        records_skipped_invalid: skipped_invalid,
        cells_occupied: results.len(),
        cells_by_color,
    };

    (results, summary)
}

/// Finds the bin holding `value` under the half-open intervals
/// `[bins[i], bins[i] + step)`, or `None` past the last bin.
///
/// Index arithmetic alone can land one bin off when `value` sits exactly on
/// a computed origin (`39.96 - 39.95` is just under `0.01` in f64), so the
/// candidate is nudged to agree with the interval definition.
fn bin_index(value: f64, step: f64, bins: &[f64]) -> Option<usize> {
    let first = *bins.first()?;
    let raw = (value - first) / step;
    if raw < 0.0 {
        return None;
    }

    let mut idx = (raw.floor() as usize).min(bins.len() - 1);
    if value < bins[idx] {
        idx = idx.checked_sub(1)?;
    } else if idx + 1 < bins.len() && value >= bins[idx + 1] {
        idx += 1;
    }

    (value < bins[idx] + step).then_some(idx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::types::PHILADELPHIA;

    fn record(state: &str, lat: f64, lon: f64, stars: f64) -> Record {
        Record {
            state: state.to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
            stars: Some(stars),
        }
    }

    fn small_box() -> BoundingBox {
        BoundingBox {
            north: 39.97,
            south: 39.95,
            east: -75.14,
            west: -75.16,
        }
    }

    #[test]
    fn test_two_records_same_cell_average() {
        let records = vec![
            record("PA", 39.95, -75.16, 5.0),
            record("PA", 39.95, -75.16, 4.0),
        ];

        let cells = aggregate(&records, &small_box(), &GridSpec::default());

        assert_eq!(cells.len(), 1);
        let cell = &cells[0];
        assert_eq!(cell.avg_rating, 4.5);
        assert_eq!(cell.color, "#00FF00");
        assert_eq!(cell.fill_color, "#00FF00");
        assert_eq!(cell.fill_opacity, 0.2);
        assert_eq!(cell.tooltip, "Average Rating: 4.50");
        assert_eq!(cell.restaurants, 2);
        assert_eq!(cell.bounds[0], [39.95, -75.16]);
        assert_eq!(cell.bounds[1][0], 39.96);
        assert!((cell.bounds[1][1] - (-75.15)).abs() < 1e-9);
    }

    #[test]
    fn test_bin_index_boundaries() {
        let grid = GridSpec::default();
        let bins = grid.lat_bins(&small_box());
        assert_eq!(bins.len(), 2);

        // exact origins land in their own bin
        assert_eq!(bin_index(39.95, 0.01, &bins), Some(0));
        assert_eq!(bin_index(39.96, 0.01, &bins), Some(1));
        assert_eq!(bin_index(39.9599, 0.01, &bins), Some(0));

        // the inclusive north edge sits past the last half-open cell
        assert_eq!(bin_index(39.97, 0.01, &bins), None);
        assert_eq!(bin_index(39.94, 0.01, &bins), None);
        assert_eq!(bin_index(1.0, 0.01, &[]), None);
    }

    #[test]
    fn test_out_of_bounds_records_excluded() {
        let records = vec![
            record("PA", 39.95, -75.16, 1.0),
            // Pittsburgh, well outside the box
            record("PA", 40.44, -79.99, 5.0),
        ];

        let (cells, summary) = aggregate_with_summary(&records, &small_box(), &GridSpec::default());

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].avg_rating, 1.0);
        assert_eq!(summary.records_in_state, 2);
        assert_eq!(summary.records_in_bounds, 1);
    }

    #[test]
    fn test_other_state_excluded_even_inside_bounds() {
        let records = vec![record("NJ", 39.95, -75.16, 5.0)];

        let (cells, summary) = aggregate_with_summary(&records, &small_box(), &GridSpec::default());

        assert!(cells.is_empty());
        assert_eq!(summary.records_in_state, 0);
    }

    #[test]
    fn test_missing_fields_excluded_silently() {
        let records = vec![
            Record {
                state: "PA".to_string(),
                latitude: Some(39.95),
                longitude: Some(-75.16),
                stars: None,
            },
            record("PA", 39.95, -75.16, 3.0),
        ];

        let (cells, summary) = aggregate_with_summary(&records, &small_box(), &GridSpec::default());

        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].avg_rating, 3.0);
        assert_eq!(summary.records_skipped_invalid, 1);
    }

    #[test]
    fn test_adjacent_cells_no_double_counting() {
        // 39.96 is the shared boundary; half-open cells put it in the upper cell
        let records = vec![
            record("PA", 39.955, -75.155, 2.0),
            record("PA", 39.96, -75.155, 4.0),
        ];

        let cells = aggregate(&records, &small_box(), &GridSpec::default());

        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].restaurants, 1);
        assert_eq!(cells[0].avg_rating, 2.0);
        assert_eq!(cells[1].restaurants, 1);
        assert_eq!(cells[1].avg_rating, 4.0);
    }

    #[test]
    fn test_cells_are_disjoint() {
        let grid = GridSpec::default();
        let cells = aggregate(
            &[
                record("PA", 39.951, -75.159, 3.0),
                record("PA", 39.965, -75.145, 4.0),
            ],
            &small_box(),
            &grid,
        );

        for (a, b) in cells.iter().zip(cells.iter().skip(1)) {
            let lat_disjoint = a.bounds[1][0] <= b.bounds[0][0] || b.bounds[1][0] <= a.bounds[0][0];
            let lon_disjoint = a.bounds[1][1] <= b.bounds[0][1] || b.bounds[1][1] <= a.bounds[0][1];
            assert!(lat_disjoint || lon_disjoint);
        }
    }

    #[test]
    fn test_empty_input_yields_no_cells() {
        let (cells, summary) = aggregate_with_summary(&[], &PHILADELPHIA, &GridSpec::default());
        assert!(cells.is_empty());
        assert_eq!(summary.records_total, 0);
        assert_eq!(summary.cells_occupied, 0);
    }

    #[test]
    fn test_idempotent_over_same_input() {
        let records = vec![
            record("PA", 39.95, -75.16, 5.0),
            record("PA", 39.96, -75.15, 2.0),
            record("PA", 39.955, -75.155, 3.5),
        ];
        let grid = GridSpec::default();

        let first = aggregate(&records, &small_box(), &grid);
        let second = aggregate(&records, &small_box(), &grid);

        assert_eq!(first, second);
    }

    #[test]
    fn test_philadelphia_grid_assignment() {
        // Center-city coordinates land in some cell of the real box
        let records = vec![record("PA", 39.9526, -75.1652, 4.2)];

        let cells = aggregate(&records, &PHILADELPHIA, &GridSpec::default());

        assert_eq!(cells.len(), 1);
        let cell = &cells[0];
        assert!(cell.bounds[0][0] <= 39.9526 && 39.9526 < cell.bounds[1][0]);
        assert!(cell.bounds[0][1] <= -75.1652 && -75.1652 < cell.bounds[1][1]);
    }
}
