//! # Planar Geometry Primitives
//!
//! `GeoPoint` and `Polygon` as consumed by the point classifier.
//!
//! ## Planar Approximation
//!
//! Latitude and longitude are treated as Cartesian `y`/`x` axes. Edges are
//! straight lines in degree space, not great-circle arcs. Delivery zones are
//! city-scale, so the distortion is negligible in practice; zones spanning
//! hundreds of kilometres or crossing the antimeridian are not supported.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Minimum number of vertices for a polygon that encloses any area.
pub const MIN_POLYGON_VERTICES: usize = 3;

/// A geographic coordinate. Immutable value type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl GeoPoint {
    /// Create a point. No validation is performed.
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validate a point received from an external collaborator.
    ///
    /// Rejects NaN/infinite components and values outside
    /// `lat ∈ [-90, 90]`, `lng ∈ [-180, 180]`. Classification does not
    /// require this; it is applied at input boundaries only.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_component("lat", self.lat, 90.0)?;
        check_component("lng", self.lng, 180.0)?;
        Ok(())
    }

    /// Whether both components are finite.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.lat, self.lng)
    }
}

fn check_component(field: &'static str, value: f64, bound: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteCoordinate { field, value });
    }
    if !(-bound..=bound).contains(&value) {
        return Err(ValidationError::CoordinateOutOfRange {
            field,
            value,
            min: -bound,
            max: bound,
        });
    }
    Ok(())
}

/// An implicitly closed ring of vertices.
///
/// The last vertex connects back to the first; do not repeat the first
/// vertex at the end. Self-intersection is neither checked nor handled.
///
/// Construction accepts any vertex count so that malformed configuration
/// can still be loaded and reported. A polygon with fewer than
/// [`MIN_POLYGON_VERTICES`] vertices is degenerate and contains no point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Polygon(Vec<GeoPoint>);

impl Polygon {
    /// Create a polygon from its vertices in ring order.
    pub fn new(vertices: Vec<GeoPoint>) -> Self {
        Self(vertices)
    }

    /// Build a polygon from `(lat, lng)` pairs.
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Self {
        Self(pairs.iter().map(|&(lat, lng)| GeoPoint::new(lat, lng)).collect())
    }

    /// The vertices in ring order.
    pub fn vertices(&self) -> &[GeoPoint] {
        &self.0
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the polygon has too few vertices to enclose an area.
    pub fn is_degenerate(&self) -> bool {
        self.0.len() < MIN_POLYGON_VERTICES
    }

    /// Axis-aligned bounds, or `None` for an empty polygon.
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.0.first()?;
        let init = BoundingBox {
            min: *first,
            max: *first,
        };
        Some(self.0.iter().skip(1).fold(init, |mut bb, v| {
            bb.min.lat = bb.min.lat.min(v.lat);
            bb.min.lng = bb.min.lng.min(v.lng);
            bb.max.lat = bb.max.lat.max(v.lat);
            bb.max.lng = bb.max.lng.max(v.lng);
            bb
        }))
    }
}

/// Axis-aligned rectangle in degree space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// South-west corner.
    pub min: GeoPoint,
    /// North-east corner.
    pub max: GeoPoint,
}

impl BoundingBox {
    /// Whether `p` lies within the rectangle, edges included.
    pub fn contains(&self, p: &GeoPoint) -> bool {
        p.lat >= self.min.lat && p.lat <= self.max.lat && p.lng >= self.min.lng && p.lng <= self.max.lng
    }
}
