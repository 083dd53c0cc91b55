//! Core geometric value types.
//!
//! A [`Coordinate`] is a latitude/longitude pair in degrees, convertible to a
//! point on the unit sphere. All distances inside the engine are central
//! angles in radians on the unit sphere; multiply by
//! [`EARTH_RADIUS_METERS`] to obtain meters.

use s2::latlng::LatLng;
use s2::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean Earth radius in meters, used for all meter <-> radian conversions.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Maximum central angle between two points on the unit sphere.
pub const MAX_RADIANS_BETWEEN_POINTS: f64 = std::f64::consts::PI;

/// A latitude/longitude pair in degrees.
///
/// Latitude in `[-90, 90]`, longitude in `[-180, 180]`. Equality is
/// componentwise `f64` equality.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lon")]
    pub longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate. Does not validate; see [`Coordinate::is_valid`].
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within range.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Convert to a point on the unit sphere.
    pub fn to_point(&self) -> Point {
        Point::from(LatLng::from_degrees(self.latitude, self.longitude))
    }

    /// Central angle in radians between this coordinate and another.
    pub fn angle_to(&self, other: &Coordinate) -> f64 {
        angle_between(&self.to_point(), &other.to_point())
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}

/// Central angle in radians between two points on the unit sphere.
pub fn angle_between(a: &Point, b: &Point) -> f64 {
    a.distance(b).rad()
}

/// Opaque document identifier assigned by the storage engine.
///
/// The total order is used only for hashing and de-duplication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalDocumentId(pub u64);

impl fmt::Display for LocalDocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a near query: a document id and its distance from the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Document {
    /// Storage-engine document id.
    pub id: LocalDocumentId,

    /// Central angle in radians between the query origin and the document
    /// centroid on the unit sphere.
    pub dist_rad: f64,
}

impl Document {
    pub fn new(id: LocalDocumentId, dist_rad: f64) -> Self {
        Self { id, dist_rad }
    }

    /// Distance from the origin in meters.
    pub fn distance_meters(&self) -> f64 {
        self.dist_rad * EARTH_RADIUS_METERS
    }
}
