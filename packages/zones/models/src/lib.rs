#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Data types for the risk-zone aggregation engine.
//!
//! These types flow from the ticket/incident feeds through the aggregation
//! engine to the map render layer: normalized incident points, grid density
//! cells, per-point neighbor densities, and the render-ready zone output.
//! The render layer consumes these as plain data; all geometry construction
//! lives in `relief_map_zones`.

use serde::{Deserialize, Serialize};

/// Cell or neighbor count at or above which an area is classified `Danger`.
pub const DANGER_THRESHOLD: u32 = 5;

/// Cell or neighbor count at or above which an area is classified `Cautious`.
pub const CAUTIOUS_THRESHOLD: u32 = 2;

/// Discrete risk classification of local incident density.
///
/// Ordered: `Safe < Cautious < Danger`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    /// Fewer than 2 incidents.
    #[default]
    Safe,
    /// 2 to 4 incidents.
    Cautious,
    /// 5 or more incidents.
    Danger,
}

impl RiskTier {
    /// Classifies an incident count into a tier.
    ///
    /// Thresholds are fixed constants; callers wanting different cutoffs
    /// must change the count semantics upstream, not the classifier.
    #[must_use]
    pub const fn from_count(count: u32) -> Self {
        if count >= DANGER_THRESHOLD {
            Self::Danger
        } else if count >= CAUTIOUS_THRESHOLD {
            Self::Cautious
        } else {
            Self::Safe
        }
    }
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Cautious => write!(f, "cautious"),
            Self::Danger => write!(f, "danger"),
        }
    }
}

/// A normalized incident location from the ticket feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentPoint {
    /// Stable identity: the ticket identifier when present, otherwise
    /// derived from the coordinates rounded to 6 decimal places. Unique
    /// within one aggregation run.
    pub id: String,
    /// Latitude in signed degrees.
    pub lat: f64,
    /// Longitude in signed degrees.
    pub lng: f64,
    /// Whether the incident was flagged as an SOS, either explicitly or
    /// via an intensity above 0.8.
    pub is_sos: bool,
    /// Free-form ticket status, carried through for tooltips only.
    pub status: Option<String>,
}

/// A populated cell of the fixed-size density grid.
///
/// Cells are recomputed from scratch on every aggregation run; a cell
/// exists only while at least one point maps to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell {
    /// Integer grid column: `floor(lat / cell_size)`.
    pub cell_x: i64,
    /// Integer grid row: `floor(lng / cell_size)`.
    pub cell_y: i64,
    /// Number of points mapped to this cell.
    pub count: u32,
    /// Arithmetic mean latitude of the cell's points.
    pub centroid_lat: f64,
    /// Arithmetic mean longitude of the cell's points.
    pub centroid_lng: f64,
    /// Risk classification from the cell's count.
    pub tier: RiskTier,
}

/// Neighbor counts for one incident point at the three fixed radii.
///
/// Each count includes the point itself (self-distance is zero), so every
/// count is at least 1 whenever the point set is nonempty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalDensity {
    /// Points within 7 km.
    pub count7: u32,
    /// Points within 10 km.
    pub count10: u32,
    /// Points within 20 km.
    pub count20: u32,
}

/// A render-ready circle from the fallback path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DensityCircle {
    /// Center latitude.
    pub lat: f64,
    /// Center longitude.
    pub lng: f64,
    /// Circle radius in meters.
    pub radius_meters: f64,
    /// Fill opacity derived from the local density count at this radius.
    pub opacity: f64,
}

/// A closed linear ring in `(lat, lng)` vertex order.
pub type Ring = Vec<[f64; 2]>;

/// One risk band of the exact path, flattened to renderable rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBand {
    /// Tier this band represents.
    pub tier: RiskTier,
    /// Closed rings in `(lat, lng)` order; each polygon's interior rings
    /// follow its exterior (even-odd fill handles holes).
    pub rings: Vec<Ring>,
}

/// Render-ready output of one zone build.
///
/// Exactly one of the two collections is populated: `bands` when the
/// boolean-geometry path ran, `circles` when the fallback ran. Both are
/// empty for an empty point set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct RenderZones {
    /// Exact-path bands, outermost tier first.
    pub bands: Vec<ZoneBand>,
    /// Fallback circles, outer radius first per point.
    pub circles: Vec<DensityCircle>,
}
