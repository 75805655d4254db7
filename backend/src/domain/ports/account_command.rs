//! Driving port for creating accounts.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

/// Domain use-case port for registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Store a new account and return its profile.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}
