//! Community lifecycle service.
//!
//! Implements the community driving ports on top of a
//! [`CommunityRepository`] and a [`Geocoder`]. Geocoding always happens
//! before any write, so an upstream failure leaves storage untouched.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::ports::{
    CommunityCommand, CommunityPersistenceError, CommunityQuery, CommunityRepository, Geocoder,
    JoinOutcome, PostOutcome, UpdateOutcome,
};
use crate::domain::{
    Community, CommunityDetail, CommunityDraft, CommunityId, CommunityPatch, CommunitySummary,
    ContentDraft, ContentEntry, ContentItem, Error, GeoPoint, UserId,
};

pub(crate) fn map_community_repository_error(error: CommunityPersistenceError) -> Error {
    match error {
        CommunityPersistenceError::Connection { message } => {
            warn!(%message, "community repository unavailable");
            Error::service_unavailable("community store unavailable")
        }
        CommunityPersistenceError::Query { message } => {
            Error::internal(format!("community repository error: {message}"))
        }
    }
}

fn community_not_found(id: &CommunityId) -> Error {
    Error::not_found(format!("community {id} not found"))
}

/// Community service implementing [`CommunityQuery`] and [`CommunityCommand`].
#[derive(Clone)]
pub struct CommunityService<R> {
    communities: Arc<R>,
    geocoder: Arc<dyn Geocoder>,
}

impl<R> CommunityService<R> {
    /// Create a service over the given repository and geocoder.
    pub fn new(communities: Arc<R>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            communities,
            geocoder,
        }
    }

    /// Resolve a free-text location to the first geocoder match.
    async fn resolve_location(&self, location: &str) -> Result<GeoPoint, Error> {
        let matches = self
            .geocoder
            .forward_geocode(location, 1)
            .await
            .map_err(|error| {
                warn!(%error, location, "geocoding failed");
                Error::upstream_geocode_failure(format!("could not geocode location: {error}"))
                    .with_details(json!({ "field": "location" }))
            })?;

        matches
            .into_iter()
            .next()
            .map(|best| best.point)
            .ok_or_else(|| {
                warn!(location, "geocoder returned no match");
                Error::upstream_geocode_failure(format!("no match found for location '{location}'"))
                    .with_details(json!({ "field": "location" }))
            })
    }
}

impl<R> CommunityService<R>
where
    R: CommunityRepository,
{
    async fn load_detail(&self, id: &CommunityId) -> Result<CommunityDetail, Error> {
        self.communities
            .find_detail(id)
            .await
            .map_err(map_community_repository_error)?
            .ok_or_else(|| community_not_found(id))
    }

    async fn load(&self, id: &CommunityId) -> Result<Community, Error> {
        self.communities
            .find(id)
            .await
            .map_err(map_community_repository_error)?
            .ok_or_else(|| community_not_found(id))
    }
}

#[async_trait]
impl<R> CommunityQuery for CommunityService<R>
where
    R: CommunityRepository,
{
    async fn list_communities(&self) -> Result<Vec<CommunitySummary>, Error> {
        self.communities
            .list_summaries()
            .await
            .map_err(map_community_repository_error)
    }

    async fn get_community(&self, id: &CommunityId) -> Result<CommunityDetail, Error> {
        self.load_detail(id).await
    }
}

#[async_trait]
impl<R> CommunityCommand for CommunityService<R>
where
    R: CommunityRepository,
{
    async fn create_community(
        &self,
        actor: &UserId,
        draft: CommunityDraft,
    ) -> Result<CommunityDetail, Error> {
        let geometry = self.resolve_location(draft.location()).await?;
        let community = Community::from_draft(draft, geometry, actor.clone());

        self.communities
            .create_with_creator(&community)
            .await
            .map_err(map_community_repository_error)?;

        info!(community_id = %community.id, creator = %actor, "community created");
        self.load_detail(&community.id).await
    }

    async fn join_community(
        &self,
        actor: &UserId,
        id: &CommunityId,
    ) -> Result<CommunityDetail, Error> {
        let outcome = self
            .communities
            .add_member(id, actor)
            .await
            .map_err(map_community_repository_error)?;

        match outcome {
            JoinOutcome::Joined => {
                info!(community_id = %id, user_id = %actor, "user joined community");
                self.load_detail(id).await
            }
            JoinOutcome::AlreadyMember => Err(Error::already_member(
                "you are already a member of this community",
            )
            .with_details(json!({ "communityId": id.to_string() }))),
            JoinOutcome::CommunityMissing => Err(community_not_found(id)),
        }
    }

    async fn edit_community(
        &self,
        actor: &UserId,
        id: &CommunityId,
        patch: CommunityPatch,
    ) -> Result<CommunityDetail, Error> {
        // Reject non-creators before spending a geocoder call.
        let current = self.load(id).await?;
        if &current.creator != actor {
            return Err(Error::forbidden("only the creator may edit this community"));
        }

        let geometry = match patch.location() {
            Some(location) => Some(self.resolve_location(location).await?),
            None => None,
        };
        let changes = patch.resolve(geometry);

        let outcome = self
            .communities
            .update_as_creator(id, actor, &changes)
            .await
            .map_err(map_community_repository_error)?;

        match outcome {
            UpdateOutcome::Updated(_) => {
                info!(community_id = %id, "community updated");
                self.load_detail(id).await
            }
            UpdateOutcome::NotCreator => {
                Err(Error::forbidden("only the creator may edit this community"))
            }
            UpdateOutcome::CommunityMissing => Err(community_not_found(id)),
        }
    }

    async fn post_content(
        &self,
        actor: &UserId,
        id: &CommunityId,
        draft: ContentDraft,
    ) -> Result<ContentEntry, Error> {
        let item = ContentItem::from_draft(draft, *id, actor.clone());
        let outcome = self
            .communities
            .add_content(&item)
            .await
            .map_err(map_community_repository_error)?;

        match outcome {
            PostOutcome::Posted => {}
            PostOutcome::NotMember => {
                return Err(Error::forbidden(
                    "only members may post content in this community",
                ));
            }
            PostOutcome::CommunityMissing => return Err(community_not_found(id)),
        }

        info!(community_id = %id, content_id = %item.id, "content posted");
        let detail = self.load_detail(id).await?;
        detail
            .contents
            .into_iter()
            .find(|entry| entry.item.id == item.id)
            .ok_or_else(|| Error::internal("posted content missing after write"))
    }
}

#[cfg(test)]
#[path = "community_service_tests.rs"]
mod tests;
