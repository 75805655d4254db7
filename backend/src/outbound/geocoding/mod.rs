//! Geocoding outbound adapters.
//!
//! [`MapboxGeocoder`] implements the `Geocoder` port over the Mapbox Places
//! HTTP API. [`RetryingGeocoder`] wraps any geocoder with a single retry on
//! transient failures.

mod dto;
mod mapbox;
mod retry;

pub use mapbox::MapboxGeocoder;
pub use retry::RetryingGeocoder;
