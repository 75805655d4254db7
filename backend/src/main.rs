//! Backend entry-point: loads settings, wires adapters and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{AppSettings, ServerConfig, create_server};
use townsquare::domain::ports::{FixtureGeocoder, Geocoder};
use townsquare::inbound::http::health::HealthState;
use townsquare::inbound::http::session_config::{BuildMode, session_settings_from_env};
use townsquare::outbound::geocoding::{MapboxGeocoder, RetryingGeocoder};
use townsquare::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = color_eyre::install() {
        warn!(error = %error, "color-eyre install failed");
    }
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.fingerprint(), "session signing key loaded");

    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let geocoder = build_geocoder(&settings, BuildMode::from_debug_assertions())?;
    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
        geocoder,
    );

    if let Some(database_url) = settings.database_url.as_deref() {
        run_pending_migrations(database_url)
            .await
            .map_err(std::io::Error::other)?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_pool_size()),
        )
        .await
        .map_err(std::io::Error::other)?;
        info!("using PostgreSQL directory");
        config = config.with_db_pool(pool);
    } else {
        warn!("TOWNSQUARE_DATABASE_URL not set; using in-memory directory");
    }

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting HTTP server");
    let server = create_server(health_state, config)?;
    server.await
}

/// Select the geocoder adapter from settings.
///
/// Release builds refuse to start without a Mapbox token.
fn build_geocoder(settings: &AppSettings, mode: BuildMode) -> std::io::Result<Arc<dyn Geocoder>> {
    let Some(token) = settings.mapbox_token() else {
        if mode == BuildMode::Release {
            return Err(std::io::Error::other(
                "TOWNSQUARE_MAPBOX_TOKEN must be set in release builds",
            ));
        }
        warn!("TOWNSQUARE_MAPBOX_TOKEN not set; using fixture geocoder");
        return Ok(Arc::new(FixtureGeocoder));
    };

    let endpoint = settings
        .geocoder_endpoint()
        .map_err(std::io::Error::other)?;
    let mapbox = MapboxGeocoder::new(endpoint, token, settings.geocoder_timeout())
        .map_err(std::io::Error::other)?;
    if settings.geocoder_retry() {
        Ok(Arc::new(RetryingGeocoder::new(mapbox)))
    } else {
        Ok(Arc::new(mapbox))
    }
}
