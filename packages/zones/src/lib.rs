#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Geospatial risk-zone aggregation engine for the incident heatmap.
//!
//! A pure function of point data to zone geometry: raw ticket/point records
//! are normalized and deduplicated, bucketed into a fixed density grid,
//! scanned for per-point neighbor densities, and finally turned into
//! renderable zone geometry. When a boolean-geometry backend is available
//! (injected via [`capability::GeometryCapability`]) the engine builds exact
//! nested risk bands by buffering and unioning every point; otherwise it
//! degrades to per-point concentric circles with density-derived opacity.
//!
//! The engine is synchronous, holds no state between calls, and never
//! returns an error: malformed records are dropped, missing geometry
//! support selects the fallback path, and partial geometric failures keep
//! whatever was built so far.

pub mod capability;
pub mod density;
pub mod grid;
pub mod normalize;
pub mod zones;

pub use capability::{GeometryCapability, GeometryOpError, NoGeometry};
pub use density::local_densities;
pub use grid::aggregate_grid;
pub use normalize::{FlatPoint, RawRecord, normalize};
pub use zones::{ZoneBands, ZoneGeometry, build_zones, build_zones_with_densities};
