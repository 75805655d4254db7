//! Driving port for reading communities.

use async_trait::async_trait;

use crate::domain::{CommunityDetail, CommunityId, CommunitySummary, Error};

/// Domain use-case port for community reads.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityQuery: Send + Sync {
    /// Every community with its creator summary. An empty store yields an
    /// empty list, not an error.
    async fn list_communities(&self) -> Result<Vec<CommunitySummary>, Error>;

    /// Full community detail, or `not_found`.
    async fn get_community(&self, id: &CommunityId) -> Result<CommunityDetail, Error>;
}
