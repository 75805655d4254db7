//! Community aggregate, drafts and read projections.
//!
//! A community is created from a [`CommunityDraft`], edited through a
//! [`CommunityPatch`], and read either as a [`CommunitySummary`] (list view)
//! or a [`CommunityDetail`] (members, contents and creator populated).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::content::ContentEntry;
use super::geometry::GeoPoint;
use super::text::{self, TextError};
use super::user::{User, UserId};

/// Maximum length of a community title.
pub const TITLE_MAX: usize = 120;
/// Maximum length of a community description.
pub const DESCRIPTION_MAX: usize = 2000;
/// Maximum length of a community location.
pub const LOCATION_MAX: usize = 200;

/// Stable community identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommunityId(Uuid);

impl CommunityId {
    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CommunityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for CommunityId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Validation failures for community drafts and patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommunityValidationError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize },
    InvalidImage,
    EmptyPatch,
}

impl CommunityValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } => Some(field),
            Self::InvalidImage => Some("image"),
            Self::EmptyPatch => None,
        }
    }

    fn from_text(field: &'static str, err: TextError) -> Self {
        match err {
            TextError::Empty => Self::Empty { field },
            TextError::TooLong { max } => Self::TooLong { field, max },
        }
    }
}

impl fmt::Display for CommunityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max } => write!(f, "{field} must be at most {max} characters"),
            Self::InvalidImage => write!(f, "image must be an absolute http(s) URL"),
            Self::EmptyPatch => write!(f, "at least one field must be provided"),
        }
    }
}

impl std::error::Error for CommunityValidationError {}

fn title(raw: &str) -> Result<String, CommunityValidationError> {
    text::bounded(raw, TITLE_MAX).map_err(|e| CommunityValidationError::from_text("title", e))
}

fn description(raw: &str) -> Result<String, CommunityValidationError> {
    text::bounded(raw, DESCRIPTION_MAX)
        .map_err(|e| CommunityValidationError::from_text("description", e))
}

fn location(raw: &str) -> Result<String, CommunityValidationError> {
    text::bounded(raw, LOCATION_MAX)
        .map_err(|e| CommunityValidationError::from_text("location", e))
}

fn image(raw: Option<&str>) -> Result<Option<String>, CommunityValidationError> {
    text::optional_http_url(raw).map_err(|()| CommunityValidationError::InvalidImage)
}

/// Validated input for creating a community.
///
/// # Examples
/// ```
/// use townsquare::domain::CommunityDraft;
///
/// let draft = CommunityDraft::try_new(" Runners ", "Weekly runs", "Austin, TX", None).unwrap();
/// assert_eq!(draft.title(), "Runners");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityDraft {
    title: String,
    description: String,
    location: String,
    image: Option<String>,
}

impl CommunityDraft {
    /// Trim and validate every field.
    pub fn try_new(
        title_raw: &str,
        description_raw: &str,
        location_raw: &str,
        image_raw: Option<&str>,
    ) -> Result<Self, CommunityValidationError> {
        Ok(Self {
            title: title(title_raw)?,
            description: description(description_raw)?,
            location: location(location_raw)?,
            image: image(image_raw)?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

/// Validated partial update; at least one field is present.
///
/// `image` is tri-state: `None` keeps the current image, `Some(None)` clears
/// it and `Some(Some(url))` replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityPatch {
    title: Option<String>,
    description: Option<String>,
    location: Option<String>,
    image: Option<Option<String>>,
}

impl CommunityPatch {
    /// Validate each supplied field and reject an empty patch.
    ///
    /// A blank `image_raw` clears the image rather than counting as absent.
    ///
    /// # Examples
    /// ```
    /// use townsquare::domain::CommunityPatch;
    ///
    /// let patch = CommunityPatch::try_new(None, None, None, Some("")).unwrap();
    /// assert_eq!(patch.image(), Some(None));
    /// ```
    pub fn try_new(
        title_raw: Option<&str>,
        description_raw: Option<&str>,
        location_raw: Option<&str>,
        image_raw: Option<&str>,
    ) -> Result<Self, CommunityValidationError> {
        let patch = Self {
            title: title_raw.map(title).transpose()?,
            description: description_raw.map(description).transpose()?,
            location: location_raw.map(location).transpose()?,
            image: image_raw.map(|raw| image(Some(raw))).transpose()?,
        };
        if patch.title.is_none()
            && patch.description.is_none()
            && patch.location.is_none()
            && patch.image.is_none()
        {
            return Err(CommunityValidationError::EmptyPatch);
        }
        Ok(patch)
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn image(&self) -> Option<Option<&str>> {
        self.image.as_ref().map(Option::as_deref)
    }

    /// Pair the patch with the geometry resolved for its new location.
    pub fn resolve(self, geometry: Option<GeoPoint>) -> CommunityChanges {
        CommunityChanges {
            title: self.title,
            description: self.description,
            location: self.location.zip(geometry),
            image: self.image,
        }
    }
}

/// Changes ready to apply to storage.
///
/// Location and geometry travel together so one is never updated without
/// the other.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<(String, GeoPoint)>,
    /// `Some(None)` clears the stored image.
    pub image: Option<Option<String>>,
}

impl CommunityChanges {
    /// Apply the changes to an in-memory community record.
    pub fn apply_to(&self, community: &mut Community) {
        if let Some(title) = &self.title {
            community.title.clone_from(title);
        }
        if let Some(description) = &self.description {
            community.description.clone_from(description);
        }
        if let Some((location, geometry)) = &self.location {
            community.location.clone_from(location);
            community.geometry = *geometry;
        }
        if let Some(image) = &self.image {
            community.image.clone_from(image);
        }
    }
}

/// Stored community record.
#[derive(Debug, Clone, PartialEq)]
pub struct Community {
    pub id: CommunityId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub geometry: GeoPoint,
    pub image: Option<String>,
    pub creator: UserId,
    pub created_at: DateTime<Utc>,
}

impl Community {
    /// Build a new record from a draft and its resolved geometry.
    pub fn from_draft(draft: CommunityDraft, geometry: GeoPoint, creator: UserId) -> Self {
        Self {
            id: CommunityId::random(),
            title: draft.title,
            description: draft.description,
            location: draft.location,
            geometry,
            image: draft.image,
            creator,
            created_at: Utc::now(),
        }
    }
}

/// List projection: scalar fields plus the creator's profile.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunitySummary {
    pub id: CommunityId,
    pub title: String,
    pub description: String,
    pub location: String,
    pub image: Option<String>,
    pub creator: User,
}

/// Fully populated community view.
#[derive(Debug, Clone, PartialEq)]
pub struct CommunityDetail {
    pub community: Community,
    pub creator: User,
    /// Members in join order; the creator is always first.
    pub members: Vec<User>,
    /// Content items in posting order.
    pub contents: Vec<ContentEntry>,
}

impl CommunityDetail {
    /// Whether `user` appears among the members.
    pub fn has_member(&self, user: &UserId) -> bool {
        self.members.iter().any(|member| &member.id == user)
    }
}
