//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`Geocoder`], [`PasswordHasher`]) are
//! implemented by outbound adapters. Driving ports (`*Command`, `*Query`,
//! [`LoginService`]) are implemented by domain services and called by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod community_command;
mod community_query;
mod community_repository;
mod geocoder;
mod login_service;
mod password_hasher;
mod user_profile_query;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::AccountCommand;
#[cfg(test)]
pub use community_command::MockCommunityCommand;
pub use community_command::CommunityCommand;
#[cfg(test)]
pub use community_query::MockCommunityQuery;
pub use community_query::CommunityQuery;
#[cfg(test)]
pub use community_repository::MockCommunityRepository;
pub use community_repository::{
    CommunityPersistenceError, CommunityRepository, JoinOutcome, PostOutcome, UpdateOutcome,
};
#[cfg(test)]
pub use geocoder::MockGeocoder;
pub use geocoder::{FixtureGeocoder, GeocodeMatch, Geocoder, GeocoderError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserPersistenceError, UserRepository};
