//! Geographic coordinates and great-circle distance.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the haversine formula.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Error returned for coordinates outside the valid range.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("invalid coordinates ({latitude}, {longitude}): latitude must be -90 to 90, longitude -180 to 180")]
pub struct InvalidLocation {
    latitude: f64,
    longitude: f64,
}

/// A point on the Earth's surface in WGS84 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Create a location, rejecting out-of-range (or NaN) coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidLocation> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidLocation {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other` in metres (haversine).
    ///
    /// No projection or road network is involved: this is the distance as
    /// the crow flies.
    pub fn distance_m(&self, other: &Location) -> f64 {
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (lat1.cos() * lat2.cos())
            .mul_add((delta_lon / 2.0).sin().powi(2), (delta_lat / 2.0).sin().powi(2));
        // Rounding can push `a` a hair above 1 for antipodal points.
        let a = a.clamp(0.0, 1.0);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}
