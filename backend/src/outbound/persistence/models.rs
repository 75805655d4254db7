//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain aggregates
//! re-run domain validation so a corrupt row surfaces as a query error.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    Community, CommunityChanges, CommunityId, ContentId, ContentItem, GeoPoint, ProfileFields,
    User, UserId,
};

use super::schema::{communities, community_contents, community_members, users};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Public profile columns of the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub location: Option<String>,
    pub avatar: Option<String>,
}

impl UserRow {
    pub(crate) fn into_domain(self) -> Result<User, String> {
        User::try_new(
            UserId::from_uuid(self.id),
            ProfileFields {
                email: &self.email,
                first_name: &self.first_name,
                last_name: &self.last_name,
                location: self.location.as_deref(),
                avatar: self.avatar.as_deref(),
            },
        )
        .map_err(|err| format!("stored user {} is invalid: {err}", self.id))
    }
}

/// Credential columns used at login.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub id: Uuid,
    pub password_hash: String,
}

/// Insertable struct for new accounts.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub location: Option<&'a str>,
    pub avatar: Option<&'a str>,
    pub password_hash: &'a str,
}

impl<'a> NewUserRow<'a> {
    pub(crate) fn from_domain(user: &'a User, password_hash: &'a str) -> Self {
        Self {
            id: *user.id.as_uuid(),
            email: user.email.as_ref(),
            first_name: user.first_name.as_ref(),
            last_name: user.last_name.as_ref(),
            location: user.location.as_deref(),
            avatar: user.avatar.as_deref(),
            password_hash,
        }
    }
}

// ---------------------------------------------------------------------------
// Communities
// ---------------------------------------------------------------------------

/// Row struct for reading from the communities table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = communities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CommunityRow {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub longitude: f64,
    pub latitude: f64,
    pub image: Option<String>,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl CommunityRow {
    pub(crate) fn into_domain(self) -> Result<Community, String> {
        let geometry = GeoPoint::try_new(self.longitude, self.latitude)
            .map_err(|err| format!("stored community {} has invalid geometry: {err}", self.id))?;
        Ok(Community {
            id: CommunityId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            location: self.location,
            geometry,
            image: self.image,
            creator: UserId::from_uuid(self.creator_id),
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for new communities.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = communities)]
pub(crate) struct NewCommunityRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub description: &'a str,
    pub location: &'a str,
    pub longitude: f64,
    pub latitude: f64,
    pub image: Option<&'a str>,
    pub creator_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewCommunityRow<'a> {
    pub(crate) fn from_domain(community: &'a Community) -> Self {
        Self {
            id: *community.id.as_uuid(),
            title: &community.title,
            description: &community.description,
            location: &community.location,
            longitude: community.geometry.longitude(),
            latitude: community.geometry.latitude(),
            image: community.image.as_deref(),
            creator_id: *community.creator.as_uuid(),
            created_at: community.created_at,
        }
    }
}

/// Partial update; `None` fields are left untouched and `Some(None)` writes NULL.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = communities)]
pub(crate) struct CommunityUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub location: Option<&'a str>,
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub image: Option<Option<&'a str>>,
}

impl<'a> CommunityUpdate<'a> {
    pub(crate) fn from_changes(changes: &'a CommunityChanges) -> Self {
        let (location, geometry) = match &changes.location {
            Some((location, geometry)) => (Some(location.as_str()), Some(*geometry)),
            None => (None, None),
        };
        Self {
            title: changes.title.as_deref(),
            description: changes.description.as_deref(),
            location,
            longitude: geometry.map(|point| point.longitude()),
            latitude: geometry.map(|point| point.latitude()),
            image: changes.image.as_ref().map(Option::as_deref),
        }
    }
}

/// Insertable struct for membership rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = community_members)]
pub(crate) struct NewMemberRow {
    pub community_id: Uuid,
    pub user_id: Uuid,
    pub joined_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Contents
// ---------------------------------------------------------------------------

/// Row struct for reading from the community_contents table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = community_contents)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContentRow {
    pub id: Uuid,
    pub community_id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub category: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ContentRow {
    pub(crate) fn into_domain(self) -> Result<ContentItem, String> {
        let category = self
            .category
            .parse()
            .map_err(|err| format!("stored content {} is invalid: {err}", self.id))?;
        Ok(ContentItem {
            id: ContentId::from_uuid(self.id),
            community_id: CommunityId::from_uuid(self.community_id),
            author: UserId::from_uuid(self.author_id),
            title: self.title,
            category,
            body: self.body,
            created_at: self.created_at,
        })
    }
}

/// Insertable struct for new content items.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = community_contents)]
pub(crate) struct NewContentRow<'a> {
    pub id: Uuid,
    pub community_id: Uuid,
    pub author_id: Uuid,
    pub title: &'a str,
    pub category: &'a str,
    pub body: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewContentRow<'a> {
    pub(crate) fn from_domain(item: &'a ContentItem) -> Self {
        Self {
            id: *item.id.as_uuid(),
            community_id: *item.community_id.as_uuid(),
            author_id: *item.author.as_uuid(),
            title: &item.title,
            category: item.category.as_str(),
            body: &item.body,
            created_at: item.created_at,
        }
    }
}
