//! Local neighbor-density estimation.
//!
//! For every incident point, counts the points within three fixed radii
//! (7/10/20 km, Haversine great-circle distance). The scan is quadratic in
//! the number of points, which is fine at the expected scale (tens to low
//! hundreds of active tickets); it is isolated here so it can later be
//! swapped for an R-tree neighbor query without touching callers.

use relief_map_zones_models::{IncidentPoint, LocalDensity};

/// Inner density radius in kilometers.
pub const INNER_RADIUS_KM: f64 = 7.0;

/// Middle density radius in kilometers.
pub const MID_RADIUS_KM: f64 = 10.0;

/// Outer density radius in kilometers.
pub const OUTER_RADIUS_KM: f64 = 20.0;

/// Mean Earth radius in kilometers used for all great-circle math.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance between two points, in kilometers.
#[must_use]
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Computes neighbor counts for every point, in input order.
///
/// A point's distance to itself is zero, so every count includes the point
/// itself: for a nonempty set, `count7 >= 1`. Counts are monotone in the
/// radius: `count7 <= count10 <= count20`.
#[must_use]
pub fn local_densities(points: &[IncidentPoint]) -> Vec<LocalDensity> {
    points
        .iter()
        .map(|p| {
            let mut density = LocalDensity {
                count7: 0,
                count10: 0,
                count20: 0,
            };
            for q in points {
                let distance = haversine_km(p.lat, p.lng, q.lat, q.lng);
                if distance <= INNER_RADIUS_KM {
                    density.count7 += 1;
                }
                if distance <= MID_RADIUS_KM {
                    density.count10 += 1;
                }
                if distance <= OUTER_RADIUS_KM {
                    density.count20 += 1;
                }
            }
            density
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, lat: f64, lng: f64) -> IncidentPoint {
        IncidentPoint {
            id: id.to_string(),
            lat,
            lng,
            is_sos: false,
            status: None,
        }
    }

    #[test]
    fn empty_input_yields_no_densities() {
        assert!(local_densities(&[]).is_empty());
    }

    #[test]
    fn haversine_matches_known_distance() {
        // Guwahati to Shillong, roughly 55 km great-circle.
        let distance = haversine_km(26.1445, 91.7362, 25.5788, 91.8933);
        assert!((distance - 55.0).abs() < 10.0, "distance was {distance}");
    }

    #[test]
    fn haversine_is_zero_for_identical_points() {
        assert!(haversine_km(26.2, 91.7, 26.2, 91.7).abs() < 1e-12);
    }

    #[test]
    fn counts_include_self() {
        let densities = local_densities(&[point("a", 26.2, 91.7)]);
        assert_eq!(
            densities[0],
            LocalDensity {
                count7: 1,
                count10: 1,
                count20: 1
            }
        );
    }

    #[test]
    fn three_clustered_points_each_count_three() {
        let points = vec![
            point("a", 26.20, 91.70),
            point("b", 26.21, 91.71),
            point("c", 26.205, 91.705),
        ];
        for density in local_densities(&points) {
            assert_eq!(density.count7, 3);
        }
    }

    #[test]
    fn counts_are_monotone_in_radius() {
        // Mixed spacing: a tight pair, one mid-range, one far away.
        let points = vec![
            point("a", 26.20, 91.70),
            point("b", 26.22, 91.72),
            point("c", 26.32, 91.70),
            point("d", 27.50, 93.00),
        ];
        for density in local_densities(&points) {
            assert!(density.count7 <= density.count10);
            assert!(density.count10 <= density.count20);
        }
    }

    #[test]
    fn distant_points_only_count_themselves() {
        // Over 100 km apart.
        let points = vec![point("a", 26.2, 91.7), point("b", 27.5, 93.0)];
        for density in local_densities(&points) {
            assert_eq!(density.count20, 1);
        }
    }

    #[test]
    fn order_matches_input_order() {
        let points = vec![
            point("isolated", 0.0, 0.0),
            point("pair-1", 26.20, 91.70),
            point("pair-2", 26.21, 91.71),
        ];
        let densities = local_densities(&points);
        assert_eq!(densities[0].count20, 1);
        assert_eq!(densities[1].count7, 2);
        assert_eq!(densities[2].count7, 2);
    }
}
