//! Shared Diesel error mapping for the directory repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::{CommunityPersistenceError, UserPersistenceError};

use super::pool::PoolError;

/// Coarse classification of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    Connection(&'static str),
    Query(&'static str),
    UniqueViolation,
}

pub(crate) fn classify(error: &DieselError) -> DieselFailure {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::BrokenTransactionManager => {
            DieselFailure::Connection("database transaction manager broken")
        }
        _ => DieselFailure::Query("database error"),
    }
}

pub(crate) fn map_user_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.into_message())
}

/// Map a Diesel error raised while writing `email`.
pub(crate) fn map_user_diesel_error(error: DieselError, email: &str) -> UserPersistenceError {
    match classify(&error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation => UserPersistenceError::duplicate_email(email),
    }
}

pub(crate) fn map_community_pool_error(error: PoolError) -> CommunityPersistenceError {
    CommunityPersistenceError::connection(error.into_message())
}

pub(crate) fn map_community_diesel_error(error: DieselError) -> CommunityPersistenceError {
    match classify(&error) {
        DieselFailure::Connection(message) => CommunityPersistenceError::connection(message),
        DieselFailure::Query(message) => CommunityPersistenceError::query(message),
        DieselFailure::UniqueViolation => {
            CommunityPersistenceError::query("unexpected unique constraint violation")
        }
    }
}
