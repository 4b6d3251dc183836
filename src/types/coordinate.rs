//! The point a pipeline run works on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoordinateError {
    #[error("Coordinate id '{0}' is not a filesystem-safe token")]
    InvalidId(String),

    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Expected 'id,lat,lon', got '{0}'")]
    Malformed(String),
}

/// Identifies one point to process.
///
/// `id` names the final weather file (`<id>.WTH`), so it is restricted to ASCII
/// letters, digits, `_` and `-`.
///
/// # Examples
///
/// ```
/// use nasa_power_sync::CoordinateRequest;
///
/// let point: CoordinateRequest = "example1,-28,-51".parse().unwrap();
/// assert_eq!(point.id(), "example1");
/// assert_eq!(point.latitude(), -28.0);
/// assert_eq!(point.longitude(), -51.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateRequest {
    id: String,
    latitude: f64,
    longitude: f64,
}

impl CoordinateRequest {
    pub fn new(
        id: impl Into<String>,
        latitude: f64,
        longitude: f64,
    ) -> Result<Self, CoordinateError> {
        let id = id.into();
        if id.is_empty()
            || !id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(CoordinateError::InvalidId(id));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            id,
            latitude,
            longitude,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for CoordinateRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.id, self.latitude, self.longitude)
    }
}

impl FromStr for CoordinateRequest {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [id, lat, lon] = parts.as_slice() else {
            return Err(CoordinateError::Malformed(s.to_string()));
        };
        let lat = lat
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;
        let lon = lon
            .parse::<f64>()
            .map_err(|_| CoordinateError::Malformed(s.to_string()))?;
        Self::new(*id, lat, lon)
    }
}
