//! Driven port for hashing and verifying account passwords.

use crate::domain::PasswordDigest;

use super::define_port_error;

define_port_error! {
    /// Failures raised by password hashing adapters.
    pub enum PasswordHashError {
        /// Hashing the password failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored digest could not be parsed.
        MalformedDigest { message: String } => "stored password digest is malformed: {message}",
    }
}

/// Hash new passwords and verify candidates against stored digests.
///
/// Implementations are CPU-bound and synchronous; callers decide whether to
/// move the work off the async executor.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted digest for `password`.
    fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError>;

    /// Return whether `password` matches `digest`.
    fn verify(&self, password: &str, digest: &PasswordDigest) -> Result<bool, PasswordHashError>;
}
