//! Driving port for user profile queries.
//!
//! Inbound adapters use this port to load the signed-in user's profile and
//! community list without importing persistence details.

use async_trait::async_trait;

use crate::domain::{CommunitySummary, Error, User, UserId};

/// Domain use-case port for reading the current user's data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the profile for the authenticated user.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;

    /// Return summaries of communities the user has joined, in join order.
    async fn my_communities(&self, user_id: &UserId) -> Result<Vec<CommunitySummary>, Error>;
}
