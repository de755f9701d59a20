//! Point normalization and deduplication.
//!
//! Ingests heterogeneous incident records from the two upstream feeds
//! (GeoJSON ticket features and pre-rendered flat points) and produces a
//! uniform, deduplicated set of [`IncidentPoint`]s. Records missing
//! coordinates are dropped rather than reported; a live feed is expected
//! to contain partial data.

use std::collections::BTreeSet;

use relief_map_zones_models::IncidentPoint;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Intensity above which a point is treated as an SOS when no explicit
/// flag is present.
const SOS_INTENSITY: f64 = 0.8;

/// A raw incident record from one of the two upstream feeds.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawRecord {
    /// GeoJSON feature from the ticket feed, with
    /// `geometry.coordinates = [lng, lat]` and a `properties` bag carrying
    /// the ticket identifier, `isSOS`, and `status`.
    Feature(geojson::Feature),
    /// Pre-rendered flat point.
    Flat(FlatPoint),
}

/// Flat point shape: `{lat, lng, intensity, props}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatPoint {
    /// Latitude in signed degrees.
    pub lat: Option<f64>,
    /// Longitude in signed degrees.
    pub lng: Option<f64>,
    /// Continuous intensity in `[0, 1]`; above 0.8 counts as an SOS.
    pub intensity: Option<f64>,
    /// Opaque property bag carried from upstream (may hold the ticket
    /// identifier, an explicit `isSOS` flag, and `status`).
    #[serde(default)]
    pub props: Map<String, Value>,
}

/// Normalizes raw records into a deduplicated list of incident points.
///
/// Records missing either coordinate, or with a non-finite coordinate,
/// are dropped silently. Deduplication is by ticket identifier when one
/// is present, otherwise by the coordinates rounded to 6 decimal places
/// (~0.11 m); the first occurrence wins.
///
/// Re-normalizing an already-normalized list is a no-op.
#[must_use]
pub fn normalize(records: &[RawRecord]) -> Vec<IncidentPoint> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut points = Vec::with_capacity(records.len());

    for record in records {
        let Some(point) = project(record) else {
            log::debug!("Dropping record without usable coordinates");
            continue;
        };
        if seen.insert(point.id.clone()) {
            points.push(point);
        }
    }

    points
}

/// Projects a single raw record onto the uniform point shape.
///
/// Returns `None` when the record has no usable coordinates.
fn project(record: &RawRecord) -> Option<IncidentPoint> {
    let (lat, lng, intensity, props) = match record {
        RawRecord::Feature(feature) => {
            let geometry = feature.geometry.as_ref()?;
            let geojson::Value::Point(coordinates) = &geometry.value else {
                return None;
            };
            // GeoJSON coordinate order is [lng, lat].
            let lng = *coordinates.first()?;
            let lat = *coordinates.get(1)?;
            (lat, lng, None, feature.properties.as_ref())
        }
        RawRecord::Flat(flat) => (flat.lat?, flat.lng?, flat.intensity, Some(&flat.props)),
    };

    if !lat.is_finite() || !lng.is_finite() {
        return None;
    }

    let is_sos = props
        .and_then(|bag| bag.get("isSOS"))
        .and_then(Value::as_bool)
        .unwrap_or_else(|| intensity.is_some_and(|value| value > SOS_INTENSITY));

    let status = props
        .and_then(|bag| bag.get("status"))
        .and_then(Value::as_str)
        .map(ToString::to_string);

    let id = props
        .and_then(ticket_id)
        .unwrap_or_else(|| coordinate_key(lat, lng));

    Some(IncidentPoint {
        id,
        lat,
        lng,
        is_sos,
        status,
    })
}

/// Extracts the ticket identifier from a property bag.
///
/// Accepts either a string or numeric identifier under `ticketId` or `id`.
fn ticket_id(props: &Map<String, Value>) -> Option<String> {
    ["ticketId", "id"].iter().find_map(|key| {
        props.get(*key).and_then(|value| match value {
            Value::String(id) => Some(id.clone()),
            Value::Number(id) => Some(id.to_string()),
            _ => None,
        })
    })
}

/// Identity for points without a ticket id: coordinates rounded to 6
/// decimal places (~0.11 m).
fn coordinate_key(lat: f64, lng: f64) -> String {
    format!("{lat:.6},{lng:.6}")
}
