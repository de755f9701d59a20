//! Seam for the optional boolean-geometry backend.
//!
//! Buffer/union/difference support is a runtime capability, not a hard
//! dependency: [`crate::zones::build_zones`] probes
//! [`GeometryCapability::supports_buffer_and_union`] on every call and
//! selects the fallback path when it reports false. Absence is a normal
//! state, never an error.

use geo::MultiPolygon;
use thiserror::Error;

/// Error from a single buffer/union/difference operation.
///
/// These never escape the zone builder: a failed union keeps the running
/// accumulator, a failed difference keeps the undifferenced union, and a
/// backend that fails before producing any region selects the fallback.
#[derive(Debug, Error)]
pub enum GeometryOpError {
    /// The backend could not produce a region for this operation.
    #[error("geometry operation failed: {message}")]
    Failed {
        /// Description of what went wrong.
        message: String,
    },
    /// No geometry backend is available.
    #[error("no geometry backend available")]
    Unavailable,
}

/// Boolean-geometry primitives, present-or-absent at runtime.
pub trait GeometryCapability {
    /// Whether the buffer/union/difference primitives are usable.
    ///
    /// Re-checked on every zone build; expected to be a cheap probe.
    fn supports_buffer_and_union(&self) -> bool;

    /// Builds a polygonal disc of `radius_km` around a point.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot produce a disc polygon.
    fn buffer(&self, lat: f64, lng: f64, radius_km: f64)
    -> Result<MultiPolygon<f64>, GeometryOpError>;

    /// Geometric union of two regions.
    ///
    /// # Errors
    ///
    /// Returns an error if the union operation fails.
    fn union(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryOpError>;

    /// Geometric difference `a − b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the difference operation fails.
    fn difference(
        &self,
        a: &MultiPolygon<f64>,
        b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryOpError>;
}

/// Null object for environments without a geometry backend.
///
/// Always reports no support, so the zone builder renders concentric
/// circles instead of exact bands.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoGeometry;

impl GeometryCapability for NoGeometry {
    fn supports_buffer_and_union(&self) -> bool {
        false
    }

    fn buffer(
        &self,
        _lat: f64,
        _lng: f64,
        _radius_km: f64,
    ) -> Result<MultiPolygon<f64>, GeometryOpError> {
        Err(GeometryOpError::Unavailable)
    }

    fn union(
        &self,
        _a: &MultiPolygon<f64>,
        _b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryOpError> {
        Err(GeometryOpError::Unavailable)
    }

    fn difference(
        &self,
        _a: &MultiPolygon<f64>,
        _b: &MultiPolygon<f64>,
    ) -> Result<MultiPolygon<f64>, GeometryOpError> {
        Err(GeometryOpError::Unavailable)
    }
}
