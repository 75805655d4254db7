//! In-process directory implementing the user and community repositories.
//!
//! Used when no database is configured and by integration tests. All state
//! sits behind one mutex, so each port call observes and mutates a
//! consistent snapshot; a membership write updates the community's member
//! list and the user's community list at once.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{
    CommunityPersistenceError, CommunityRepository, JoinOutcome, PostOutcome, StoredCredentials,
    UpdateOutcome, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Community, CommunityChanges, CommunityDetail, CommunityId, CommunitySummary, ContentEntry,
    ContentItem, PasswordDigest, User, UserId,
};

#[derive(Debug)]
struct Membership {
    community: CommunityId,
    user: UserId,
    joined_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct DirectoryState {
    users: HashMap<UserId, User>,
    credentials: HashMap<String, StoredCredentials>,
    communities: Vec<Community>,
    memberships: Vec<Membership>,
    contents: Vec<ContentItem>,
}

impl DirectoryState {
    fn community(&self, id: &CommunityId) -> Option<&Community> {
        self.communities.iter().find(|community| &community.id == id)
    }

    fn is_member(&self, community: &CommunityId, user: &UserId) -> bool {
        self.memberships
            .iter()
            .any(|m| &m.community == community && &m.user == user)
    }

    fn user(&self, id: &UserId) -> Result<User, CommunityPersistenceError> {
        self.users
            .get(id)
            .cloned()
            .ok_or_else(|| CommunityPersistenceError::query(format!("user {id} missing")))
    }

    fn summary(&self, community: &Community) -> Result<CommunitySummary, CommunityPersistenceError> {
        Ok(CommunitySummary {
            id: community.id,
            title: community.title.clone(),
            description: community.description.clone(),
            location: community.location.clone(),
            image: community.image.clone(),
            creator: self.user(&community.creator)?,
        })
    }
}

/// Mutex-guarded in-memory directory.
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    state: Mutex<DirectoryState>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock_users(&self) -> Result<MutexGuard<'_, DirectoryState>, UserPersistenceError> {
        self.state
            .lock()
            .map_err(|_| UserPersistenceError::query("directory lock poisoned"))
    }

    fn lock_communities(&self) -> Result<MutexGuard<'_, DirectoryState>, CommunityPersistenceError> {
        self.state
            .lock()
            .map_err(|_| CommunityPersistenceError::query("directory lock poisoned"))
    }
}

#[async_trait]
impl UserRepository for InMemoryDirectory {
    async fn insert(
        &self,
        user: &User,
        password: &PasswordDigest,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock_users()?;
        let email = user.email.as_ref().to_owned();
        if state.credentials.contains_key(&email) {
            return Err(UserPersistenceError::duplicate_email(email));
        }
        state.credentials.insert(
            email,
            StoredCredentials {
                user_id: user.id.clone(),
                password: password.clone(),
            },
        );
        state.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock_users()?.users.get(id).cloned())
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self.lock_users()?.credentials.get(email).cloned())
    }
}

#[async_trait]
impl CommunityRepository for InMemoryDirectory {
    async fn list_summaries(&self) -> Result<Vec<CommunitySummary>, CommunityPersistenceError> {
        let state = self.lock_communities()?;
        state
            .communities
            .iter()
            .map(|community| state.summary(community))
            .collect()
    }

    async fn list_for_member(
        &self,
        user: &UserId,
    ) -> Result<Vec<CommunitySummary>, CommunityPersistenceError> {
        let state = self.lock_communities()?;
        let mut joined: Vec<&Membership> =
            state.memberships.iter().filter(|m| &m.user == user).collect();
        joined.sort_by_key(|m| m.joined_at);
        joined
            .into_iter()
            .filter_map(|m| state.community(&m.community))
            .map(|community| state.summary(community))
            .collect()
    }

    async fn find(&self, id: &CommunityId) -> Result<Option<Community>, CommunityPersistenceError> {
        Ok(self.lock_communities()?.community(id).cloned())
    }

    async fn find_detail(
        &self,
        id: &CommunityId,
    ) -> Result<Option<CommunityDetail>, CommunityPersistenceError> {
        let state = self.lock_communities()?;
        let Some(community) = state.community(id) else {
            return Ok(None);
        };

        let members = state
            .memberships
            .iter()
            .filter(|m| &m.community == id)
            .map(|m| state.user(&m.user))
            .collect::<Result<Vec<_>, _>>()?;
        let contents = state
            .contents
            .iter()
            .filter(|item| &item.community_id == id)
            .map(|item| {
                Ok(ContentEntry {
                    item: item.clone(),
                    author: state.user(&item.author)?,
                })
            })
            .collect::<Result<Vec<_>, CommunityPersistenceError>>()?;

        Ok(Some(CommunityDetail {
            community: community.clone(),
            creator: state.user(&community.creator)?,
            members,
            contents,
        }))
    }

    async fn create_with_creator(
        &self,
        community: &Community,
    ) -> Result<(), CommunityPersistenceError> {
        let mut state = self.lock_communities()?;
        if !state.users.contains_key(&community.creator) {
            return Err(CommunityPersistenceError::query(format!(
                "creator {} does not exist",
                community.creator
            )));
        }
        if state.community(&community.id).is_some() {
            return Err(CommunityPersistenceError::query("duplicate community id"));
        }
        state.communities.push(community.clone());
        state.memberships.push(Membership {
            community: community.id,
            user: community.creator.clone(),
            joined_at: community.created_at,
        });
        Ok(())
    }

    async fn add_member(
        &self,
        id: &CommunityId,
        user: &UserId,
    ) -> Result<JoinOutcome, CommunityPersistenceError> {
        let mut state = self.lock_communities()?;
        if state.community(id).is_none() {
            return Ok(JoinOutcome::CommunityMissing);
        }
        if state.is_member(id, user) {
            return Ok(JoinOutcome::AlreadyMember);
        }
        state.memberships.push(Membership {
            community: *id,
            user: user.clone(),
            joined_at: Utc::now(),
        });
        Ok(JoinOutcome::Joined)
    }

    async fn update_as_creator(
        &self,
        id: &CommunityId,
        actor: &UserId,
        changes: &CommunityChanges,
    ) -> Result<UpdateOutcome, CommunityPersistenceError> {
        let mut state = self.lock_communities()?;
        let Some(community) = state.communities.iter_mut().find(|c| &c.id == id) else {
            return Ok(UpdateOutcome::CommunityMissing);
        };
        if &community.creator != actor {
            return Ok(UpdateOutcome::NotCreator);
        }
        changes.apply_to(community);
        Ok(UpdateOutcome::Updated(community.clone()))
    }

    async fn add_content(&self, item: &ContentItem) -> Result<PostOutcome, CommunityPersistenceError> {
        let mut state = self.lock_communities()?;
        if state.community(&item.community_id).is_none() {
            return Ok(PostOutcome::CommunityMissing);
        }
        if !state.is_member(&item.community_id, &item.author) {
            return Ok(PostOutcome::NotMember);
        }
        state.contents.push(item.clone());
        Ok(PostOutcome::Posted)
    }
}
