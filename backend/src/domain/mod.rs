//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, plus the services that implement the driving ports.
//! Keep types immutable and document invariants in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - User, Community, ContentItem: validated aggregates.
//! - CommunityService, AccountService: use-case implementations.

pub mod account_service;
pub mod auth;
pub mod community;
pub mod community_service;
pub mod content;
pub mod error;
pub mod geometry;
pub mod ports;
pub(crate) mod text;
pub mod trace_id;
pub mod user;

pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MAX, PASSWORD_MIN, PasswordDigest,
    Registration, RegistrationValidationError,
};
pub use self::community::{
    Community, CommunityChanges, CommunityDetail, CommunityDraft, CommunityId, CommunityPatch,
    CommunitySummary, CommunityValidationError,
};
pub use self::community_service::CommunityService;
pub use self::content::{
    ContentCategory, ContentDraft, ContentEntry, ContentId, ContentItem, ContentValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::geometry::{GeoPoint, GeometryValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, PersonName, ProfileFields, User, UserId, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use townsquare::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
