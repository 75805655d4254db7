//! Driven port for forward geocoding (address to coordinates).
//!
//! The domain owns the request shape and the error taxonomy so retry policy
//! and service logic stay adapter-agnostic.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::domain::GeoPoint;

use super::define_port_error;

/// One candidate returned by the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeMatch {
    /// Provider's canonical name for the place.
    pub place_name: String,
    /// Point geometry of the place.
    pub point: GeoPoint,
}

define_port_error! {
    /// Errors surfaced while calling the geocoding provider.
    pub enum GeocoderError {
        /// Network transport failed before receiving a response.
        Transport { message: String } => "geocoder transport failed: {message}",
        /// The call exceeded its timeout.
        Timeout { message: String } => "geocoder timeout: {message}",
        /// The provider rate-limited the request.
        RateLimited { message: String } => "geocoder rate limited request: {message}",
        /// The provider rejected the request (bad token, malformed query).
        Rejected { message: String } => "geocoder rejected request: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "geocoder response decode failed: {message}",
    }
}

impl GeocoderError {
    /// Return whether retrying this error is expected to help.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Timeout { .. } | Self::RateLimited { .. }
        )
    }
}

/// Port for resolving free-text addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Return up to `limit` matches for `query`, best first.
    async fn forward_geocode(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<GeocodeMatch>, GeocoderError>;
}

/// Offline geocoder for development and tests.
///
/// Blank queries return no matches. Any other query resolves to a point
/// derived from the SHA-256 of its lower-cased text, so the same address
/// always lands in the same place across builds and different addresses
/// yield different geometry without network access.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureGeocoder;

impl FixtureGeocoder {
    fn point_for(query: &str) -> Option<GeoPoint> {
        let digest = Sha256::digest(query.to_lowercase().as_bytes());
        let hash = digest
            .iter()
            .take(8)
            .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
        let lng_centi = i32::try_from(hash % 36_000).ok()?;
        let lat_centi = i32::try_from((hash >> 32) % 18_000).ok()?;
        let longitude = f64::from(lng_centi - 18_000) / 100.0;
        let latitude = f64::from(lat_centi - 9_000) / 100.0;
        GeoPoint::try_new(longitude, latitude).ok()
    }
}

#[async_trait]
impl Geocoder for FixtureGeocoder {
    async fn forward_geocode(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<GeocodeMatch>, GeocoderError> {
        let trimmed = query.trim();
        if trimmed.is_empty() || limit == 0 {
            return Ok(Vec::new());
        }
        let point = Self::point_for(trimmed)
            .ok_or_else(|| GeocoderError::decode("fixture point out of range"))?;
        Ok(vec![GeocodeMatch {
            place_name: trimmed.to_owned(),
            point,
        }])
    }
}
