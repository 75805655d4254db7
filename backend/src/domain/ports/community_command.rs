//! Driving port for community lifecycle mutations.

use async_trait::async_trait;

use crate::domain::{
    CommunityDetail, CommunityDraft, CommunityId, CommunityPatch, ContentDraft, ContentEntry,
    Error, UserId,
};

/// Domain use-case port for creating, joining, editing and posting into
/// communities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommunityCommand: Send + Sync {
    /// Geocode the draft's location and create the community with `actor`
    /// as creator and sole member.
    async fn create_community(
        &self,
        actor: &UserId,
        draft: CommunityDraft,
    ) -> Result<CommunityDetail, Error>;

    /// Add `actor` to the community; `already_member` when already present.
    async fn join_community(
        &self,
        actor: &UserId,
        id: &CommunityId,
    ) -> Result<CommunityDetail, Error>;

    /// Apply `patch` when `actor` is the creator, re-geocoding a new location.
    async fn edit_community(
        &self,
        actor: &UserId,
        id: &CommunityId,
        patch: CommunityPatch,
    ) -> Result<CommunityDetail, Error>;

    /// Post content into a community `actor` belongs to.
    async fn post_content(
        &self,
        actor: &UserId,
        id: &CommunityId,
        draft: ContentDraft,
    ) -> Result<ContentEntry, Error>;
}
