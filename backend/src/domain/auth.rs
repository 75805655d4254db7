//! Authentication primitives: login credentials, registrations and password
//! digests.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::user::{ProfileFields, User, UserId, UserValidationError};

/// Minimum password length accepted at registration.
pub const PASSWORD_MIN: usize = 8;
/// Maximum password length accepted at registration.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed, lower-cased and must not be empty.
/// - `password` must be non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use townsquare::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@Example.com", "hunter22").unwrap();
/// assert_eq!(creds.email(), "ada@example.com");
/// assert_eq!(creds.password(), "hunter22");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_lowercase(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for user lookups.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Errors raised while validating a registration request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// A profile field failed validation.
    Profile(UserValidationError),
    /// Password shorter than [`PASSWORD_MIN`].
    PasswordTooShort { min: usize },
    /// Password longer than [`PASSWORD_MAX`].
    PasswordTooLong { max: usize },
}

impl RegistrationValidationError {
    /// Request field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Profile(err) => err.field(),
            Self::PasswordTooShort { .. } | Self::PasswordTooLong { .. } => "password",
        }
    }
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(err) => err.fmt(f),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

impl From<UserValidationError> for RegistrationValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Profile(value)
    }
}

/// A validated request to create a local account.
///
/// The profile is assigned a fresh id at validation time so services can
/// persist it without further mutation.
#[derive(Debug, Clone)]
pub struct Registration {
    profile: User,
    password: Zeroizing<String>,
}

impl Registration {
    /// Validate the profile fields and password.
    pub fn try_new(
        fields: ProfileFields<'_>,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(RegistrationValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        let profile = User::try_new(UserId::random(), fields)?;
        Ok(Self {
            profile,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Profile to store for the new account.
    pub fn profile(&self) -> &User {
        &self.profile
    }

    /// Plain-text password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Encoded password hash in PHC string format.
///
/// The inner value is never logged; `Debug` prints a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Wrap an encoded hash produced by a password hasher.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded PHC string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", LoginValidationError::EmptyEmail)]
    #[case("   ", "pw", LoginValidationError::EmptyEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn credentials_keep_password_whitespace() {
        let creds = LoginCredentials::try_from_parts(" ADA@example.com ", " secret ")
            .expect("valid inputs should succeed");
        assert_eq!(creds.email(), "ada@example.com");
        assert_eq!(creds.password(), " secret ");
    }

    fn fields() -> ProfileFields<'static> {
        ProfileFields {
            email: "grace@example.com",
            first_name: "Grace",
            last_name: "Hopper",
            location: None,
            avatar: None,
        }
    }

    #[rstest]
    #[case("short".to_owned(), RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN })]
    #[case(
        "p".repeat(PASSWORD_MAX + 1),
        RegistrationValidationError::PasswordTooLong { max: PASSWORD_MAX }
    )]
    fn registration_checks_password_length(
        #[case] password: String,
        #[case] expected: RegistrationValidationError,
    ) {
        let err = Registration::try_new(fields(), &password).expect_err("bad password");
        assert_eq!(err, expected);
        assert_eq!(err.field(), "password");
    }

    #[rstest]
    fn registration_surfaces_profile_errors() {
        let mut raw = fields();
        raw.email = "nope";
        let err = Registration::try_new(raw, "long enough").expect_err("bad email");
        assert_eq!(err.field(), "email");
    }

    #[rstest]
    fn digest_debug_hides_value() {
        let digest = PasswordDigest::new("$argon2id$secret");
        assert_eq!(format!("{digest:?}"), "PasswordDigest(..)");
    }
}
