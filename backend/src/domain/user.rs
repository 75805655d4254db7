//! User data model.
//!
//! A [`User`] is the public profile exposed to other members. Credentials
//! never live on this type; see [`crate::domain::PasswordDigest`].

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::text::{self, TextError};

/// Validation errors raised while constructing user values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyName { field: &'static str },
    NameTooLong { field: &'static str, max: usize },
    LocationTooLong { max: usize },
    InvalidAvatar,
}

impl UserValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyId | Self::InvalidId => "id",
            Self::EmptyEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::EmptyName { field } | Self::NameTooLong { field, .. } => field,
            Self::LocationTooLong { .. } => "location",
            Self::InvalidAvatar => "avatar",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyName { field } => write!(f, "{field} must not be empty"),
            Self::NameTooLong { field, max } => {
                write!(f, "{field} must be at most {max} characters")
            }
            Self::LocationTooLong { max } => {
                write!(f, "location must be at most {max} characters")
            }
            Self::InvalidAvatar => write!(f, "avatar must be an absolute http(s) URL"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Maximum length of an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum length of a first or last name.
pub const NAME_MAX: usize = 64;
/// Maximum length of a free-text location.
pub const LOCATION_MAX: usize = 200;

/// Email address normalised to lower case.
///
/// Only the overall shape is checked: one `@`, a non-empty local part, and
/// a domain containing a dot that neither starts nor ends the domain.
///
/// # Examples
/// ```
/// use townsquare::domain::EmailAddress;
///
/// let email = EmailAddress::new(" Ada@Example.COM ").unwrap();
/// assert_eq!(email.as_ref(), "ada@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        let (local, domain) = trimmed
            .split_once('@')
            .ok_or(UserValidationError::InvalidEmail)?;
        let domain_ok = domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !domain.contains('@');
        if local.is_empty() || !domain_ok || trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// First or last name of a person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    /// Validate a name; `field` labels the error (`firstName`, `lastName`).
    pub fn new(raw: impl AsRef<str>, field: &'static str) -> Result<Self, UserValidationError> {
        text::bounded(raw.as_ref(), NAME_MAX)
            .map(Self)
            .map_err(|err| match err {
                TextError::Empty => UserValidationError::EmptyName { field },
                TextError::TooLong { max } => UserValidationError::NameTooLong { field, max },
            })
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: EmailAddress,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub location: Option<String>,
    pub avatar: Option<String>,
}

/// Raw profile fields prior to validation.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields<'a> {
    pub email: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub location: Option<&'a str>,
    pub avatar: Option<&'a str>,
}

impl User {
    /// Validate profile fields and build a user with the given id.
    pub fn try_new(id: UserId, fields: ProfileFields<'_>) -> Result<Self, UserValidationError> {
        let location = text::optional_bounded(fields.location, LOCATION_MAX)
            .map_err(|_| UserValidationError::LocationTooLong { max: LOCATION_MAX })?;
        let avatar = text::optional_http_url(fields.avatar)
            .map_err(|()| UserValidationError::InvalidAvatar)?;
        Ok(Self {
            id,
            email: EmailAddress::new(fields.email)?,
            first_name: PersonName::new(fields.first_name, "firstName")?,
            last_name: PersonName::new(fields.last_name, "lastName")?,
            location,
            avatar,
        })
    }
}

#[cfg(test)]
mod tests;
