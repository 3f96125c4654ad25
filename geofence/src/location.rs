//! Location related module
//!
//! A `Coordinate` is a validated (latitude, longitude) pair in degrees, WGS84.  Out of range
//! values are rejected at construction time and when deserializing, so everything downstream
//! can assume sane input.
//!

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::GeoError;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.;

/// A point on the globe, in degrees.
///
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    #[serde(rename = "latitude")]
    lat: f64,
    #[serde(rename = "longitude")]
    lon: f64,
}

/// Unchecked on-the-wire form of a `Coordinate`.
///
#[derive(Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(value: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(value.latitude, value.longitude)
    }
}

impl Coordinate {
    /// Build a coordinate, rejecting NaN, infinities and out of range values.
    ///
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90. ..=90.).contains(&lat) {
            return Err(GeoError::BadLatitude(lat));
        }
        if !lon.is_finite() || !(-180. ..=180.).contains(&lon) {
            return Err(GeoError::BadLongitude(lon));
        }
        Ok(Coordinate { lat, lon })
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[inline]
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Re-check the invariants, used by the evaluator on every input.
    ///
    pub fn validate(&self) -> Result<(), GeoError> {
        Coordinate::new(self.lat, self.lon).map(|_| ())
    }

    /// Great-circle distance to `other` in kilometers.
    ///
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        distance(self, other)
    }
}

/// Haversine distance between two points, in kilometers.
///
/// Never fails, always positive or zero and symmetric.
///
pub fn distance(p1: &Coordinate, p2: &Coordinate) -> f64 {
    if p1 == p2 {
        return 0.;
    }

    let d_lat = (p2.lat - p1.lat).to_radians();
    let d_lon = (p2.lon - p1.lon).to_radians();

    let a = (d_lat / 2.).sin().powi(2)
        + p1.lat.to_radians().cos() * p2.lat.to_radians().cos() * (d_lon / 2.).sin().powi(2);

    // Rounding can push `a` past 1 for antipodal points
    let a = a.clamp(0., 1.);

    let c = 2. * a.sqrt().atan2((1. - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// One position report from a user's device.
///
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationSample {
    pub user_id: String,
    #[serde(flatten)]
    pub location: Coordinate,
    pub timestamp: DateTime<Utc>,
}

impl LocationSample {
    pub fn new(user_id: &str, location: Coordinate, timestamp: DateTime<Utc>) -> Self {
        LocationSample {
            user_id: user_id.to_string(),
            location,
            timestamp,
        }
    }
}
