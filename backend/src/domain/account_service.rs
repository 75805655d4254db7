//! Account registration, login and profile reads.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::community_service::map_community_repository_error;
use crate::domain::ports::{
    AccountCommand, CommunityRepository, LoginService, PasswordHashError, PasswordHasher,
    UserPersistenceError, UserProfileQuery, UserRepository,
};
use crate::domain::{
    CommunitySummary, Error, LoginCredentials, PasswordDigest, Registration, User, UserId,
};

const INVALID_CREDENTIALS: &str = "invalid email or password";

fn map_user_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            warn!(%message, "user repository unavailable");
            Error::service_unavailable("user store unavailable")
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { .. } => {
            Error::conflict("an account with this email already exists")
                .with_details(json!({ "field": "email" }))
        }
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(format!("password hashing failed: {error}"))
}

/// Account service implementing [`AccountCommand`], [`LoginService`] and
/// [`UserProfileQuery`].
#[derive(Clone)]
pub struct AccountService<U, C> {
    users: Arc<U>,
    communities: Arc<C>,
    hasher: Arc<dyn PasswordHasher>,
}

impl<U, C> AccountService<U, C> {
    /// Create a service over the user and community repositories.
    pub fn new(users: Arc<U>, communities: Arc<C>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            users,
            communities,
            hasher,
        }
    }

    async fn hash(&self, password: &str) -> Result<PasswordDigest, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(password.as_str()))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(map_hash_error)
    }

    async fn verify(&self, password: &str, digest: PasswordDigest) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let password = Zeroizing::new(password.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(password.as_str(), &digest))
            .await
            .map_err(|err| Error::internal(format!("password verification task failed: {err}")))?
            .map_err(map_hash_error)
    }
}

#[async_trait]
impl<U, C> AccountCommand for AccountService<U, C>
where
    U: UserRepository,
    C: CommunityRepository,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let digest = self.hash(registration.password()).await?;
        let user = registration.profile().clone();
        self.users
            .insert(&user, &digest)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id, "account registered");
        Ok(user)
    }
}

#[async_trait]
impl<U, C> LoginService for AccountService<U, C>
where
    U: UserRepository,
    C: CommunityRepository,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(map_user_repository_error)?;

        let Some(stored) = stored else {
            warn!("login attempt for unknown account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if self.verify(credentials.password(), stored.password).await? {
            info!(user_id = %stored.user_id, "login succeeded");
            Ok(stored.user_id)
        } else {
            warn!(user_id = %stored.user_id, "login rejected");
            Err(Error::unauthorized(INVALID_CREDENTIALS))
        }
    }
}

#[async_trait]
impl<U, C> UserProfileQuery for AccountService<U, C>
where
    U: UserRepository,
    C: CommunityRepository,
{
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::unauthorized("session user no longer exists"))
    }

    async fn my_communities(&self, user_id: &UserId) -> Result<Vec<CommunitySummary>, Error> {
        self.communities
            .list_for_member(user_id)
            .await
            .map_err(map_community_repository_error)
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
