//! Application settings loaded via OrthoConfig.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_POOL_SIZE: u32 = 10;
const DEFAULT_GEOCODER_ENDPOINT: &str = "https://api.mapbox.com";
const DEFAULT_GEOCODER_TIMEOUT_MS: u64 = 5_000;

/// Raised when a configured value cannot be interpreted.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid geocoder endpoint {value:?}: {source}")]
    GeocoderEndpoint {
        value: String,
        #[source]
        source: url::ParseError,
    },
}

/// Process-wide settings layered from CLI arguments, environment and files.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "TOWNSQUARE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL; the in-memory directory is used when unset.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Mapbox access token used for forward geocoding.
    pub mapbox_token: Option<String>,
    /// Base URL of the geocoding API.
    pub geocoder_endpoint: Option<String>,
    /// Per-request geocoder timeout in milliseconds.
    pub geocoder_timeout_ms: Option<u64>,
    /// Retry a failed geocoding request once; enabled unless set to `false`.
    pub geocoder_retry: Option<bool>,
}

impl AppSettings {
    /// Return the bind address, falling back to all interfaces on port 8080.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE)
    }

    /// Return the geocoder base URL, defaulting to the public Mapbox API.
    pub fn geocoder_endpoint(&self) -> Result<Url, SettingsError> {
        let value = self
            .geocoder_endpoint
            .as_deref()
            .unwrap_or(DEFAULT_GEOCODER_ENDPOINT);
        Url::parse(value).map_err(|source| SettingsError::GeocoderEndpoint {
            value: value.to_owned(),
            source,
        })
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_millis(
            self.geocoder_timeout_ms
                .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_MS),
        )
    }

    pub fn geocoder_retry(&self) -> bool {
        self.geocoder_retry.unwrap_or(true)
    }

    /// Return the Mapbox token when one is configured and non-blank.
    pub fn mapbox_token(&self) -> Option<&str> {
        self.mapbox_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }
}
