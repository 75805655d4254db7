//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountCommand, CommunityCommand, CommunityQuery, LoginService, UserProfileQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub communities: Arc<dyn CommunityQuery>,
    pub community_commands: Arc<dyn CommunityCommand>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub accounts: Arc<dyn AccountCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
    pub communities: Arc<dyn CommunityQuery>,
    pub community_commands: Arc<dyn CommunityCommand>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use townsquare::domain::ports::FixtureGeocoder;
    /// use townsquare::domain::{AccountService, CommunityService};
    /// use townsquare::inbound::http::state::{HttpState, HttpStatePorts};
    /// use townsquare::outbound::memory::InMemoryDirectory;
    /// use townsquare::outbound::password::Argon2PasswordHasher;
    ///
    /// let directory = Arc::new(InMemoryDirectory::default());
    /// let accounts = Arc::new(AccountService::new(
    ///     directory.clone(),
    ///     directory.clone(),
    ///     Arc::new(Argon2PasswordHasher::new()),
    /// ));
    /// let communities = Arc::new(CommunityService::new(directory, Arc::new(FixtureGeocoder)));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: accounts.clone(),
    ///     accounts: accounts.clone(),
    ///     profile: accounts,
    ///     communities: communities.clone(),
    ///     community_commands: communities,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            accounts,
            profile,
            communities,
            community_commands,
        } = ports;
        Self {
            login,
            accounts,
            profile,
            communities,
            community_commands,
        }
    }
}
