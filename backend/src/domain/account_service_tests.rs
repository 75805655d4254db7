//! Tests for registration, login and profile reads.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockCommunityRepository, MockPasswordHasher, MockUserRepository, StoredCredentials,
};
use crate::domain::{ErrorCode, ProfileFields};

fn registration() -> Registration {
    Registration::try_new(
        ProfileFields {
            email: "Ada@Example.com",
            first_name: "Ada",
            last_name: "Lovelace",
            location: Some("London"),
            avatar: None,
        },
        "correct horse",
    )
    .expect("valid registration")
}

fn hasher_producing(digest: &'static str) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .times(1)
        .returning(move |_| Ok(PasswordDigest::new(digest)));
    hasher
}

fn hasher_verifying(result: bool) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .times(1)
        .returning(move |_, _| Ok(result));
    hasher
}

fn service(
    users: MockUserRepository,
    communities: MockCommunityRepository,
    hasher: MockPasswordHasher,
) -> AccountService<MockUserRepository, MockCommunityRepository> {
    AccountService::new(Arc::new(users), Arc::new(communities), Arc::new(hasher))
}

#[rstest]
#[tokio::test]
async fn register_stores_hashed_password() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .withf(|user, digest| {
            user.email.as_ref() == "ada@example.com" && digest.as_str() == "$argon2id$stub"
        })
        .times(1)
        .returning(|_, _| Ok(()));

    let user = service(
        users,
        MockCommunityRepository::new(),
        hasher_producing("$argon2id$stub"),
    )
    .register(registration())
    .await
    .expect("registration succeeds");

    assert_eq!(user.first_name.as_ref(), "Ada");
}

#[rstest]
#[tokio::test]
async fn register_duplicate_email_is_conflict() {
    let mut users = MockUserRepository::new();
    users
        .expect_insert()
        .times(1)
        .returning(|user, _| Err(UserPersistenceError::duplicate_email(user.email.as_ref())));

    let error = service(
        users,
        MockCommunityRepository::new(),
        hasher_producing("$argon2id$stub"),
    )
    .register(registration())
    .await
    .expect_err("duplicate rejected");

    assert_eq!(error.code(), ErrorCode::Conflict);
    assert_eq!(
        error.details(),
        Some(&serde_json::json!({ "field": "email" }))
    );
}

#[rstest]
#[tokio::test]
async fn authenticate_returns_user_id_for_matching_password() {
    let user_id = UserId::random();
    let expected = user_id.clone();
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials()
        .withf(|email| email == "ada@example.com")
        .times(1)
        .returning(move |_| {
            Ok(Some(StoredCredentials {
                user_id: user_id.clone(),
                password: PasswordDigest::new("$argon2id$stub"),
            }))
        });

    let credentials =
        LoginCredentials::try_from_parts("ADA@example.com", "correct horse").expect("credentials");
    let authenticated = service(users, MockCommunityRepository::new(), hasher_verifying(true))
        .authenticate(&credentials)
        .await
        .expect("login succeeds");

    assert_eq!(authenticated, expected);
}

#[rstest]
#[tokio::test]
async fn authenticate_rejects_wrong_password() {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().times(1).returning(|_| {
        Ok(Some(StoredCredentials {
            user_id: UserId::random(),
            password: PasswordDigest::new("$argon2id$stub"),
        }))
    });

    let credentials =
        LoginCredentials::try_from_parts("ada@example.com", "wrong").expect("credentials");
    let error = service(users, MockCommunityRepository::new(), hasher_verifying(false))
        .authenticate(&credentials)
        .await
        .expect_err("login rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn authenticate_unknown_email_matches_wrong_password_message() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_credentials()
        .times(1)
        .returning(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().never();

    let credentials =
        LoginCredentials::try_from_parts("nobody@example.com", "whatever").expect("credentials");
    let error = service(users, MockCommunityRepository::new(), hasher)
        .authenticate(&credentials)
        .await
        .expect_err("login rejected");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), INVALID_CREDENTIALS);
}

#[rstest]
#[case(UserPersistenceError::connection("refused"), ErrorCode::ServiceUnavailable)]
#[case(UserPersistenceError::query("bad sql"), ErrorCode::InternalError)]
#[tokio::test]
async fn profile_maps_repository_failures(
    #[case] failure: UserPersistenceError,
    #[case] expected: ErrorCode,
) {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Err(failure));

    let error = service(users, MockCommunityRepository::new(), MockPasswordHasher::new())
        .fetch_profile(&UserId::random())
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), expected);
}

#[rstest]
#[tokio::test]
async fn unavailable_store_detail_is_not_exposed() {
    let mut users = MockUserRepository::new();
    users
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Err(UserPersistenceError::connection("10.0.0.7:5432 refused")));

    let error = service(users, MockCommunityRepository::new(), MockPasswordHasher::new())
        .fetch_profile(&UserId::random())
        .await
        .expect_err("repository failure");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(error.message(), "user store unavailable");
}

#[rstest]
#[tokio::test]
async fn profile_for_deleted_user_is_unauthorized() {
    let mut users = MockUserRepository::new();
    users.expect_find_by_id().times(1).returning(|_| Ok(None));

    let error = service(users, MockCommunityRepository::new(), MockPasswordHasher::new())
        .fetch_profile(&UserId::random())
        .await
        .expect_err("missing user");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn my_communities_delegates_to_membership_listing() {
    let user_id = UserId::random();
    let expected = user_id.clone();
    let mut communities = MockCommunityRepository::new();
    communities
        .expect_list_for_member()
        .withf(move |user| *user == expected)
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let listed = service(
        MockUserRepository::new(),
        communities,
        MockPasswordHasher::new(),
    )
    .my_communities(&user_id)
    .await
    .expect("listing succeeds");

    assert!(listed.is_empty());
}
