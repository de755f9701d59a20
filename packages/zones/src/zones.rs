//! Risk-zone geometry construction.
//!
//! The builder turns a normalized point set into renderable zone geometry
//! using one of two paths, selected fresh on every call:
//!
//! * **Exact bands** — when the injected [`GeometryCapability`] supports
//!   buffer/union, every point is buffered at 7/10/20 km, each family is
//!   folded into a union, and nested differences produce three mutually
//!   exclusive bands (danger, cautious, safe-outer).
//! * **Fallback circles** — otherwise, every point gets three concentric
//!   circles whose opacity is derived from its local neighbor density.
//!
//! There are no fatal errors here: a failed pairwise union keeps the
//! running accumulator, a failed difference keeps the undifferenced union,
//! and an exact path that produces no region at all selects the fallback.
//! The output feeds a non-critical visualization layer.

use geo::{LineString, MultiPolygon};
use relief_map_zones_models::{DensityCircle, IncidentPoint, LocalDensity, RenderZones, Ring, RiskTier, ZoneBand};

use crate::capability::GeometryCapability;
use crate::density::{INNER_RADIUS_KM, MID_RADIUS_KM, OUTER_RADIUS_KM, local_densities};

/// Output of one zone build: exact nested bands or per-point circles.
///
/// Produced fresh per call and owned by the caller; the builder retains no
/// state between invocations, so rebuilding from the same point set yields
/// identical output.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneGeometry {
    /// Mutually exclusive risk bands from the boolean-geometry path.
    Bands(ZoneBands),
    /// Per-point concentric circles with density-derived opacity, outer
    /// radius first so denser inner rings draw on top.
    Circles(Vec<DensityCircle>),
}

/// The three nested risk bands of the exact path.
///
/// Bands are disjoint by construction: `cautious` is the 10 km union minus
/// the 7 km union, `safe_outer` the 20 km union minus the 10 km union.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ZoneBands {
    /// Union of all 7 km buffers.
    pub danger: Option<MultiPolygon<f64>>,
    /// 10 km band with the danger region carved out.
    pub cautious: Option<MultiPolygon<f64>>,
    /// 20 km band with the cautious-and-inward region carved out.
    pub safe_outer: Option<MultiPolygon<f64>>,
}

impl ZoneBands {
    /// True when no band holds any region.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.danger.is_none() && self.cautious.is_none() && self.safe_outer.is_none()
    }
}

impl ZoneGeometry {
    /// Flattens the geometry into the render-ready shape consumed by the
    /// map layer: bands as `(lat, lng)` rings, circles as-is.
    #[must_use]
    pub fn to_render(&self) -> RenderZones {
        match self {
            Self::Bands(bands) => {
                let tiers = [
                    (RiskTier::Safe, bands.safe_outer.as_ref()),
                    (RiskTier::Cautious, bands.cautious.as_ref()),
                    (RiskTier::Danger, bands.danger.as_ref()),
                ];
                RenderZones {
                    bands: tiers
                        .into_iter()
                        .filter_map(|(tier, region)| {
                            region.map(|r| ZoneBand {
                                tier,
                                rings: region_rings(r),
                            })
                        })
                        .collect(),
                    circles: Vec::new(),
                }
            }
            Self::Circles(circles) => RenderZones {
                bands: Vec::new(),
                circles: circles.clone(),
            },
        }
    }
}

/// Builds zone geometry for a point set.
///
/// Local densities for the fallback path are computed internally; callers
/// that already ran [`local_densities`] should use
/// [`build_zones_with_densities`] to avoid the second quadratic scan.
#[must_use]
pub fn build_zones(points: &[IncidentPoint], capability: &dyn GeometryCapability) -> ZoneGeometry {
    build_with(points, None, capability)
}

/// Builds zone geometry, reusing previously computed local densities for
/// the fallback path.
#[must_use]
pub fn build_zones_with_densities(
    points: &[IncidentPoint],
    densities: &[LocalDensity],
    capability: &dyn GeometryCapability,
) -> ZoneGeometry {
    build_with(points, Some(densities), capability)
}

fn build_with(
    points: &[IncidentPoint],
    densities: Option<&[LocalDensity]>,
    capability: &dyn GeometryCapability,
) -> ZoneGeometry {
    if capability.supports_buffer_and_union() {
        if let Some(bands) = build_bands(points, capability) {
            return ZoneGeometry::Bands(bands);
        }
        log::debug!("Exact geometry produced no regions; using circle fallback");
    }

    let computed;
    let densities = match densities {
        Some(existing) if existing.len() == points.len() => existing,
        Some(existing) => {
            log::warn!(
                "Density list length {} does not match point count {}; recomputing",
                existing.len(),
                points.len()
            );
            computed = local_densities(points);
            computed.as_slice()
        }
        None => {
            computed = local_densities(points);
            computed.as_slice()
        }
    };

    ZoneGeometry::Circles(density_circles(points, densities))
}

/// Runs the exact path. Returns `None` when no union succeeded at any
/// radius, which sends the builder to the fallback.
fn build_bands(points: &[IncidentPoint], capability: &dyn GeometryCapability) -> Option<ZoneBands> {
    let union7 = union_family(points, capability, INNER_RADIUS_KM);
    let union10 = union_family(points, capability, MID_RADIUS_KM);
    let union20 = union_family(points, capability, OUTER_RADIUS_KM);

    if union7.is_none() && union10.is_none() && union20.is_none() {
        return None;
    }

    let cautious = carve_band(union10.as_ref(), union7.as_ref(), capability);
    let safe_outer = carve_band(union20.as_ref(), union10.as_ref(), capability);

    Some(ZoneBands {
        danger: union7,
        cautious,
        safe_outer,
    })
}

/// Buffers every point at `radius_km` and folds the buffers into a union.
///
/// A failed buffer skips that point; a failed pairwise union keeps the
/// running accumulator. A partial union beats discarding all work.
fn union_family(
    points: &[IncidentPoint],
    capability: &dyn GeometryCapability,
    radius_km: f64,
) -> Option<MultiPolygon<f64>> {
    let mut acc: Option<MultiPolygon<f64>> = None;

    for point in points {
        let disc = match capability.buffer(point.lat, point.lng, radius_km) {
            Ok(disc) => disc,
            Err(err) => {
                log::warn!("Buffer at {radius_km} km failed for point {}: {err}", point.id);
                continue;
            }
        };
        acc = Some(match acc {
            None => disc,
            Some(current) => match capability.union(&current, &disc) {
                Ok(merged) => merged,
                Err(err) => {
                    log::warn!("Union at {radius_km} km failed for point {}: {err}", point.id);
                    current
                }
            },
        });
    }

    acc.filter(|region| !region.0.is_empty())
}

/// Carves the inner region out of the outer union to form a band.
///
/// Missing inner leaves the outer union whole; missing outer means no
/// band; a failed difference keeps the undifferenced outer union.
fn carve_band(
    outer: Option<&MultiPolygon<f64>>,
    inner: Option<&MultiPolygon<f64>>,
    capability: &dyn GeometryCapability,
) -> Option<MultiPolygon<f64>> {
    let outer = outer?;
    let Some(inner) = inner else {
        return Some(outer.clone());
    };
    match capability.difference(outer, inner) {
        Ok(band) if band.0.is_empty() => None,
        Ok(band) => Some(band),
        Err(err) => {
            log::warn!("Band difference failed: {err}");
            Some(outer.clone())
        }
    }
}

/// Fallback rendering: three concentric circles per point, outer first,
/// with opacity rising with the local density count and clamped per
/// radius.
fn density_circles(points: &[IncidentPoint], densities: &[LocalDensity]) -> Vec<DensityCircle> {
    let mut circles = Vec::with_capacity(points.len() * 3);

    for (point, density) in points.iter().zip(densities) {
        circles.push(DensityCircle {
            lat: point.lat,
            lng: point.lng,
            radius_meters: OUTER_RADIUS_KM * 1000.0,
            opacity: opacity(0.06, 0.02, density.count20, 0.28),
        });
        circles.push(DensityCircle {
            lat: point.lat,
            lng: point.lng,
            radius_meters: MID_RADIUS_KM * 1000.0,
            opacity: opacity(0.08, 0.03, density.count10, 0.36),
        });
        circles.push(DensityCircle {
            lat: point.lat,
            lng: point.lng,
            radius_meters: INNER_RADIUS_KM * 1000.0,
            opacity: opacity(0.12, 0.04, density.count7, 0.60),
        });
    }

    circles
}

fn opacity(base: f64, step: f64, count: u32, max: f64) -> f64 {
    f64::from(count).mul_add(step, base).min(max)
}

/// All rings of a region as `(lat, lng)` coordinate lists; each polygon's
/// interior rings follow its exterior.
fn region_rings(region: &MultiPolygon<f64>) -> Vec<Ring> {
    let mut rings = Vec::new();
    for polygon in &region.0 {
        rings.push(ring_coords(polygon.exterior()));
        for interior in polygon.interiors() {
            rings.push(ring_coords(interior));
        }
    }
    rings
}

/// geo stores coordinates as `x = lng`, `y = lat`; the render layer wants
/// `(lat, lng)`.
fn ring_coords(line: &LineString<f64>) -> Ring {
    line.coords().map(|c| [c.y, c.x]).collect()
}
