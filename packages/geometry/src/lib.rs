#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `geo`-backed boolean geometry backend for the zone builder.
//!
//! Implements the [`GeometryCapability`] seam with real buffer, union, and
//! difference primitives: discs are approximated as polygons via the
//! spherical destination-point formula, and union/difference use
//! [`geo::BooleanOps`]. Deployments without this crate wire up
//! [`relief_map_zones::NoGeometry`] instead and get the circle fallback;
//! the zone builder treats either as a normal runtime state.

use geo::{BooleanOps, Coord, LineString, MultiPolygon, Polygon};
use relief_map_zones::density::EARTH_RADIUS_KM;
use relief_map_zones::{GeometryCapability, GeometryOpError};

/// Number of vertices used to approximate a disc polygon.
const DISC_SEGMENTS: usize = 48;

/// Boolean-geometry backend built on the `geo` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanGeometry;

impl GeometryCapability for BooleanGeometry {
    fn supports_buffer_and_union(&self) -> bool {
        true
    }

    fn buffer(
        &self,
        lat: f64,
        lng: f64,
        radius_km: f64,
    ) -> Result<MultiPolygon<f64>, GeometryOpError> {
        if !lat.is_finite() || !lng.is_finite() || radius_km <= 0.0 {
            return Err(GeometryOpError::Failed {
                message: format!("cannot buffer ({lat}, {lng}) at {radius_km} km"),
            });
        }
        Ok(MultiPolygon(vec![disc(lat, lng, radius_km)]))
    }

    fn union(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryOpError> {
        Ok(a.union(b))
    }

    fn difference(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryOpError> {
        Ok(a.difference(b))
    }
}

/// Polygonal disc of `radius_km` around a point, vertices placed with the
/// spherical destination-point formula on a 6371 km sphere.
fn disc(lat: f64, lng: f64, radius_km: f64) -> Polygon<f64> {
    let angular = radius_km / EARTH_RADIUS_KM;
    let lat_rad = lat.to_radians();
    let lng_rad = lng.to_radians();

    #[allow(clippy::cast_precision_loss)]
    let coords: Vec<Coord<f64>> = (0..DISC_SEGMENTS)
        .map(|segment| {
            let bearing = std::f64::consts::TAU * segment as f64 / DISC_SEGMENTS as f64;
            let dest_lat =
                (lat_rad.sin() * angular.cos() + lat_rad.cos() * angular.sin() * bearing.cos())
                    .asin();
            let dest_lng = lng_rad
                + (bearing.sin() * angular.sin() * lat_rad.cos())
                    .atan2(angular.cos() - lat_rad.sin() * dest_lat.sin());
            Coord {
                x: dest_lng.to_degrees(),
                y: dest_lat.to_degrees(),
            }
        })
        .collect();

    // Polygon::new closes the exterior ring.
    Polygon::new(LineString::from(coords), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Area, Contains, Point};
    use relief_map_zones::density::haversine_km;
    use relief_map_zones::{ZoneGeometry, aggregate_grid, build_zones};
    use relief_map_zones_models::{IncidentPoint, RiskTier};

    fn point(id: &str, lat: f64, lng: f64) -> IncidentPoint {
        IncidentPoint {
            id: id.to_string(),
            lat,
            lng,
            is_sos: false,
            status: None,
        }
    }

    fn bands_for(points: &[IncidentPoint]) -> relief_map_zones::ZoneBands {
        match build_zones(points, &BooleanGeometry) {
            ZoneGeometry::Bands(bands) => bands,
            ZoneGeometry::Circles(_) => panic!("expected exact bands"),
        }
    }

    #[test]
    fn buffer_vertices_sit_at_the_requested_radius() {
        let region = BooleanGeometry.buffer(26.2, 91.7, 7.0).unwrap();
        let exterior = region.0[0].exterior();
        for coord in exterior.coords() {
            let distance = haversine_km(26.2, 91.7, coord.y, coord.x);
            assert!((distance - 7.0).abs() < 0.01, "vertex at {distance} km");
        }
    }

    #[test]
    fn buffer_rejects_degenerate_input() {
        assert!(BooleanGeometry.buffer(f64::NAN, 91.7, 7.0).is_err());
        assert!(BooleanGeometry.buffer(26.2, 91.7, 0.0).is_err());
    }

    #[test]
    fn overlapping_discs_union_into_one_polygon() {
        // ~3 km apart, well under the 7 km radius.
        let a = BooleanGeometry.buffer(26.20, 91.70, 7.0).unwrap();
        let b = BooleanGeometry.buffer(26.23, 91.70, 7.0).unwrap();
        let merged = BooleanGeometry.union(&a, &b).unwrap();
        assert_eq!(merged.0.len(), 1);
        assert!(merged.unsigned_area() > a.unsigned_area());
    }

    #[test]
    fn distant_discs_stay_separate_in_the_union() {
        // ~110 km apart.
        let a = BooleanGeometry.buffer(26.2, 91.7, 7.0).unwrap();
        let b = BooleanGeometry.buffer(27.2, 91.7, 7.0).unwrap();
        let merged = BooleanGeometry.union(&a, &b).unwrap();
        assert_eq!(merged.0.len(), 2);
    }

    #[test]
    fn clustered_points_produce_a_danger_region_containing_them() {
        // Six points all within ~2 km of each other.
        let points: Vec<IncidentPoint> = (0..6)
            .map(|i| {
                let offset = f64::from(i) * 0.003;
                point(&format!("p{i}"), 26.20 + offset, 91.70 + offset)
            })
            .collect();

        let cells = aggregate_grid(&points, relief_map_zones::grid::DEFAULT_CELL_SIZE_DEG);
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].tier, RiskTier::Danger);

        let bands = bands_for(&points);
        let danger = bands.danger.expect("danger region");
        for p in &points {
            assert!(danger.contains(&Point::new(p.lng, p.lat)), "missing {}", p.id);
        }
    }

    #[test]
    fn bands_are_mutually_exclusive() {
        // Spread so all three bands have area.
        let points = vec![
            point("a", 26.20, 91.70),
            point("b", 26.30, 91.80),
            point("c", 26.40, 91.70),
        ];
        let bands = bands_for(&points);
        let regions: Vec<MultiPolygon<f64>> = [&bands.danger, &bands.cautious, &bands.safe_outer]
            .into_iter()
            .filter_map(|band| band.clone())
            .collect();
        assert_eq!(regions.len(), 3);

        for (i, a) in regions.iter().enumerate() {
            for b in &regions[i + 1..] {
                let overlap = a.intersection(b).unsigned_area();
                assert!(overlap < 1e-8, "band overlap area {overlap}");
            }
        }
    }

    #[test]
    fn cautious_band_excludes_the_danger_core() {
        let points = vec![point("a", 26.2, 91.7)];
        let bands = bands_for(&points);
        let cautious = bands.cautious.expect("cautious band");
        // The point itself is inside the 7 km core, not the 10 km band.
        assert!(!cautious.contains(&Point::new(91.7, 26.2)));
        // A point ~8.5 km north sits inside the band.
        assert!(cautious.contains(&Point::new(91.7, 26.2 + 0.077)));
    }

    #[test]
    fn single_point_bands_form_nested_annuli() {
        let points = vec![point("a", 26.2, 91.7)];
        let bands = bands_for(&points);
        let danger_area = bands.danger.unwrap().unsigned_area();
        let cautious_area = bands.cautious.unwrap().unsigned_area();
        let safe_area = bands.safe_outer.unwrap().unsigned_area();
        // Area ratios of perfect annuli over discs of 7/10/20 km:
        // (100-49)/49 and (400-100)/49.
        assert!((cautious_area / danger_area - 51.0 / 49.0).abs() < 0.05);
        assert!((safe_area / danger_area - 300.0 / 49.0).abs() < 0.3);
    }
}
