//! Geographic point geometry derived from geocoding.

use std::fmt;

/// Errors raised when coordinates fall outside WGS84 ranges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GeometryValidationError {
    NonFinite,
    LongitudeOutOfRange { value: f64 },
    LatitudeOutOfRange { value: f64 },
}

impl fmt::Display for GeometryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonFinite => write!(f, "coordinates must be finite"),
            Self::LongitudeOutOfRange { value } => {
                write!(f, "longitude {value} must be within [-180, 180]")
            }
            Self::LatitudeOutOfRange { value } => {
                write!(f, "latitude {value} must be within [-90, 90]")
            }
        }
    }
}

impl std::error::Error for GeometryValidationError {}

/// A WGS84 point, serialised as GeoJSON `[longitude, latitude]`.
///
/// # Examples
/// ```
/// use townsquare::domain::GeoPoint;
///
/// let austin = GeoPoint::try_new(-97.7431, 30.2672).unwrap();
/// assert_eq!(austin.coordinates(), [-97.7431, 30.2672]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    longitude: f64,
    latitude: f64,
}

impl GeoPoint {
    /// Validate and construct a point.
    pub fn try_new(longitude: f64, latitude: f64) -> Result<Self, GeometryValidationError> {
        if !longitude.is_finite() || !latitude.is_finite() {
            return Err(GeometryValidationError::NonFinite);
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeometryValidationError::LongitudeOutOfRange { value: longitude });
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeometryValidationError::LatitudeOutOfRange { value: latitude });
        }
        Ok(Self {
            longitude,
            latitude,
        })
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// GeoJSON coordinate pair.
    pub fn coordinates(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}
