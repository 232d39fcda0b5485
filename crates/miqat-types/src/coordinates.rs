use serde::{Serialize, Deserialize};
use std::fmt;

use crate::error::MiqatError;

/// Latitude magnitude from which the midnight sun / polar night can occur.
pub const UNSAFE_LATITUDE: f64 = 65.0;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = MiqatError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Coordinates::new(raw.latitude, raw.longitude)
    }
}

impl Coordinates {
    /// Creates coordinates, rejecting latitudes outside [-90, 90] and
    /// longitudes outside [-180, 180] (NaN included).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, MiqatError> {
        if !Self::is_valid(latitude, longitude) {
            return Err(MiqatError::InvalidCoordinates { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// Creates coordinates without range checks.
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Range guard shared with callers that validate raw request input.
    pub fn is_valid(latitude: f64, longitude: f64) -> bool {
        (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// True when twilight may be unreachable for weeks at a time.
    pub fn is_unsafe(&self) -> bool {
        self.latitude.abs() >= UNSAFE_LATITUDE
    }

    /// Same longitude, different latitude.
    pub fn with_latitude(&self, latitude: f64) -> Self {
        Self { latitude, longitude: self.longitude }
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°, {:.4}°", self.latitude, self.longitude)
    }
}
