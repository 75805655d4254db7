//! Content items members post into a community.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::community::CommunityId;
use super::text::{self, TextError};
use super::user::{User, UserId};

/// Maximum length of a content title.
pub const CONTENT_TITLE_MAX: usize = 120;
/// Maximum length of a content body.
pub const CONTENT_BODY_MAX: usize = 5000;

/// Stable content identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(Uuid);

impl ContentId {
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of content posted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentCategory {
    /// General discussion post.
    Post,
    /// Report of something happening in the area.
    Incident,
}

impl ContentCategory {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Incident => "incident",
        }
    }
}

impl FromStr for ContentCategory {
    type Err = ContentValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "post" => Ok(Self::Post),
            "incident" => Ok(Self::Incident),
            _ => Err(ContentValidationError::UnknownCategory {
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ContentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failures for content drafts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentValidationError {
    Empty { field: &'static str },
    TooLong { field: &'static str, max: usize },
    UnknownCategory { value: String },
}

impl ContentValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field } | Self::TooLong { field, .. } => field,
            Self::UnknownCategory { .. } => "category",
        }
    }

    fn from_text(field: &'static str, err: TextError) -> Self {
        match err {
            TextError::Empty => Self::Empty { field },
            TextError::TooLong { max } => Self::TooLong { field, max },
        }
    }
}

impl fmt::Display for ContentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty { field } => write!(f, "{field} must not be empty"),
            Self::TooLong { field, max } => write!(f, "{field} must be at most {max} characters"),
            Self::UnknownCategory { value } => {
                write!(f, "category '{value}' must be one of post, incident")
            }
        }
    }
}

impl std::error::Error for ContentValidationError {}

/// Validated content input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDraft {
    title: String,
    category: ContentCategory,
    body: String,
}

impl ContentDraft {
    /// Validate the title, category and body.
    pub fn try_new(title: &str, category: &str, body: &str) -> Result<Self, ContentValidationError> {
        Ok(Self {
            title: text::bounded(title, CONTENT_TITLE_MAX)
                .map_err(|e| ContentValidationError::from_text("title", e))?,
            category: category.parse()?,
            body: text::bounded(body, CONTENT_BODY_MAX)
                .map_err(|e| ContentValidationError::from_text("body", e))?,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn category(&self) -> ContentCategory {
        self.category
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Stored content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentItem {
    pub id: ContentId,
    pub community_id: CommunityId,
    pub author: UserId,
    pub title: String,
    pub category: ContentCategory,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

impl ContentItem {
    /// Build a new item authored by `author` in `community_id`.
    pub fn from_draft(draft: ContentDraft, community_id: CommunityId, author: UserId) -> Self {
        Self {
            id: ContentId::random(),
            community_id,
            author,
            title: draft.title,
            category: draft.category,
            body: draft.body,
            created_at: Utc::now(),
        }
    }
}

/// Content item populated with its author's profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    pub item: ContentItem,
    pub author: User,
}
