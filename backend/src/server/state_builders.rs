//! Builders wiring repositories and services into the HTTP state.

use std::sync::Arc;

use actix_web::web;

use townsquare::domain::ports::{CommunityRepository, Geocoder, UserRepository};
use townsquare::domain::{AccountService, CommunityService};
use townsquare::inbound::http::state::{HttpState, HttpStatePorts};
use townsquare::outbound::memory::InMemoryDirectory;
use townsquare::outbound::password::Argon2PasswordHasher;
use townsquare::outbound::persistence::{DieselCommunityRepository, DieselUserRepository};

use super::ServerConfig;

/// Assemble the driving ports over one pair of repositories.
fn ports_for<U, C>(users: Arc<U>, communities: Arc<C>, geocoder: Arc<dyn Geocoder>) -> HttpStatePorts
where
    U: UserRepository + 'static,
    C: CommunityRepository + 'static,
{
    let accounts = Arc::new(AccountService::new(
        users,
        Arc::clone(&communities),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let community_service = Arc::new(CommunityService::new(communities, geocoder));

    HttpStatePorts {
        login: accounts.clone(),
        accounts: accounts.clone(),
        profile: accounts,
        communities: community_service.clone(),
        community_commands: community_service,
    }
}

/// Build the shared HTTP state.
///
/// Uses the Diesel repositories when a pool is configured, otherwise a single
/// in-memory directory backs both the user and community ports.
pub fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let geocoder = Arc::clone(&config.geocoder);
    let ports = match &config.db_pool {
        Some(pool) => ports_for(
            Arc::new(DieselUserRepository::new(pool.clone())),
            Arc::new(DieselCommunityRepository::new(pool.clone())),
            geocoder,
        ),
        None => {
            let directory = Arc::new(InMemoryDirectory::new());
            ports_for(Arc::clone(&directory), directory, geocoder)
        }
    };
    web::Data::new(HttpState::new(ports))
}
