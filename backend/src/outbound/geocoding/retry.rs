//! Single-retry decorator for geocoders.

use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{GeocodeMatch, Geocoder, GeocoderError};

const DEFAULT_BACKOFF: Duration = Duration::from_millis(200);

/// Wraps a geocoder and repeats a call once after a retryable failure.
///
/// Non-retryable failures and the second failure are returned unchanged.
#[derive(Debug)]
pub struct RetryingGeocoder<G> {
    inner: G,
    backoff: Duration,
}

impl<G> RetryingGeocoder<G> {
    /// Wrap `inner` with the default backoff between attempts.
    pub fn new(inner: G) -> Self {
        Self::with_backoff(inner, DEFAULT_BACKOFF)
    }

    /// Wrap `inner` with an explicit pause before the retry.
    pub fn with_backoff(inner: G, backoff: Duration) -> Self {
        Self { inner, backoff }
    }
}

#[async_trait]
impl<G> Geocoder for RetryingGeocoder<G>
where
    G: Geocoder,
{
    async fn forward_geocode(
        &self,
        query: &str,
        limit: u8,
    ) -> Result<Vec<GeocodeMatch>, GeocoderError> {
        match self.inner.forward_geocode(query, limit).await {
            Err(error) if error.is_retryable() => {
                warn!(%error, backoff_ms = self.backoff.as_millis(), "retrying geocode");
                if !self.backoff.is_zero() {
                    tokio::time::sleep(self.backoff).await;
                }
                self.inner.forward_geocode(query, limit).await
            }
            outcome => outcome,
        }
    }
}
