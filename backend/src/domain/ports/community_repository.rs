//! Driven port for community storage.
//!
//! Memberships live in one relation shared by the community's member list
//! and the user's community list, so every membership write updates both
//! views at once. Adapters must make each mutating call atomic.

use async_trait::async_trait;

use crate::domain::{
    Community, CommunityChanges, CommunityDetail, CommunityId, CommunitySummary, ContentItem,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by community repository adapters.
    pub enum CommunityPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "community repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "community repository query failed: {message}",
    }
}

/// Outcome of adding a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinOutcome {
    Joined,
    AlreadyMember,
    CommunityMissing,
}

/// Outcome of a creator-guarded update.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Community),
    NotCreator,
    CommunityMissing,
}

/// Outcome of a member-guarded content insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    Posted,
    NotMember,
    CommunityMissing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityRepository: Send + Sync {
    /// All communities in creation order, with creator profiles.
    async fn list_summaries(&self) -> Result<Vec<CommunitySummary>, CommunityPersistenceError>;

    /// Communities `user` belongs to, in join order.
    async fn list_for_member(
        &self,
        user: &UserId,
    ) -> Result<Vec<CommunitySummary>, CommunityPersistenceError>;

    /// Bare community record.
    async fn find(&self, id: &CommunityId) -> Result<Option<Community>, CommunityPersistenceError>;

    /// Community with members, contents and creator populated.
    async fn find_detail(
        &self,
        id: &CommunityId,
    ) -> Result<Option<CommunityDetail>, CommunityPersistenceError>;

    /// Insert the community and its creator's membership as one unit.
    async fn create_with_creator(&self, community: &Community)
    -> Result<(), CommunityPersistenceError>;

    /// Add `user` to the community unless already present.
    async fn add_member(
        &self,
        id: &CommunityId,
        user: &UserId,
    ) -> Result<JoinOutcome, CommunityPersistenceError>;

    /// Apply `changes` only when `actor` is the creator.
    async fn update_as_creator(
        &self,
        id: &CommunityId,
        actor: &UserId,
        changes: &CommunityChanges,
    ) -> Result<UpdateOutcome, CommunityPersistenceError>;

    /// Insert `item` only when its author is a member of the community.
    async fn add_content(&self, item: &ContentItem) -> Result<PostOutcome, CommunityPersistenceError>;
}
