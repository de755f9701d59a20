//! Fixed-grid density aggregation.
//!
//! Buckets incident points into fixed-size geographic cells, computes
//! per-cell counts and centroids, and classifies each populated cell into
//! a risk tier. Cells are rebuilt from scratch on every call; there is no
//! persistent cell identity across runs.

use std::collections::BTreeMap;

use relief_map_zones_models::{GridCell, IncidentPoint, RiskTier};

/// Default grid cell size in degrees (~22 km at the equator).
pub const DEFAULT_CELL_SIZE_DEG: f64 = 0.2;

#[derive(Default)]
struct CellAccumulator {
    count: u32,
    lat_sum: f64,
    lng_sum: f64,
}

/// Buckets points into grid cells of `cell_size` degrees.
///
/// Every input point lands in exactly one cell (no point is dropped or
/// double-counted) and cells with zero points are never emitted. Empty
/// input yields empty output.
#[must_use]
pub fn aggregate_grid(points: &[IncidentPoint], cell_size: f64) -> Vec<GridCell> {
    let mut cells: BTreeMap<(i64, i64), CellAccumulator> = BTreeMap::new();

    for point in points {
        let key = (cell_index(point.lat, cell_size), cell_index(point.lng, cell_size));
        let cell = cells.entry(key).or_default();
        cell.count += 1;
        cell.lat_sum += point.lat;
        cell.lng_sum += point.lng;
    }

    cells
        .into_iter()
        .map(|((cell_x, cell_y), acc)| GridCell {
            cell_x,
            cell_y,
            count: acc.count,
            centroid_lat: acc.lat_sum / f64::from(acc.count),
            centroid_lng: acc.lng_sum / f64::from(acc.count),
            tier: RiskTier::from_count(acc.count),
        })
        .collect()
}

/// Integer cell index for one coordinate: `floor(value / cell_size)`.
#[allow(clippy::cast_possible_truncation)]
fn cell_index(value: f64, cell_size: f64) -> i64 {
    (value / cell_size).floor() as i64
}
