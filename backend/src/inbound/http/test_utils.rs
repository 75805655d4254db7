//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::test;
use chrono::Utc;

use crate::domain::ports::{
    MockAccountCommand, MockCommunityCommand, MockCommunityQuery, MockLoginService,
    MockUserProfileQuery,
};
use crate::domain::{Community, CommunityDetail, CommunityId, GeoPoint, ProfileFields, User, UserId};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation, names the cookie `session` and
/// disables the `Secure` flag for local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the `session` cookie set by a response.
///
/// # Panics
/// Panics when the response does not set the cookie.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Identifier every mocked login resolves to.
pub const SIGNED_IN_USER: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Profile fixture with the given id.
pub fn fixture_user(id: &UserId) -> User {
    User::try_new(
        id.clone(),
        ProfileFields {
            email: "ada@example.com",
            first_name: "Ada",
            last_name: "Lovelace",
            location: Some("London"),
            avatar: None,
        },
    )
    .expect("fixture user is valid")
}

/// Id of the mocked signed-in user.
pub fn signed_in_user() -> UserId {
    UserId::new(SIGNED_IN_USER).expect("fixture id")
}

/// Community fixture created by `creator`, who is its only member.
pub fn fixture_detail(creator: &UserId) -> CommunityDetail {
    let creator_profile = fixture_user(creator);
    CommunityDetail {
        community: Community {
            id: CommunityId::random(),
            title: "Runners".to_owned(),
            description: "Weekly runs".to_owned(),
            location: "Austin, TX".to_owned(),
            geometry: GeoPoint::try_new(-97.7431, 30.2672).expect("valid point"),
            image: None,
            creator: creator.clone(),
            created_at: Utc::now(),
        },
        creator: creator_profile.clone(),
        members: vec![creator_profile],
        contents: Vec::new(),
    }
}

/// Port mocks for handler tests.
///
/// Login and profile lookups are pre-wired so `POST /api/v1/login` signs in
/// [`SIGNED_IN_USER`]; the remaining mocks start without expectations.
pub struct MockPorts {
    pub login: MockLoginService,
    pub accounts: MockAccountCommand,
    pub profile: MockUserProfileQuery,
    pub communities: MockCommunityQuery,
    pub community_commands: MockCommunityCommand,
}

impl Default for MockPorts {
    fn default() -> Self {
        let mut login = MockLoginService::new();
        login
            .expect_authenticate()
            .returning(|_| Ok(signed_in_user()));
        let mut profile = MockUserProfileQuery::new();
        profile
            .expect_fetch_profile()
            .returning(|id| Ok(fixture_user(id)));
        Self {
            login,
            accounts: MockAccountCommand::new(),
            profile,
            communities: MockCommunityQuery::new(),
            community_commands: MockCommunityCommand::new(),
        }
    }
}

impl MockPorts {
    /// Wrap the mocks in handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            login: Arc::new(self.login),
            accounts: Arc::new(self.accounts),
            profile: Arc::new(self.profile),
            communities: Arc::new(self.communities),
            community_commands: Arc::new(self.community_commands),
        })
    }
}

/// Sign in through `POST /api/v1/login` and return the session cookie.
///
/// # Panics
/// Panics when the login request fails.
pub async fn login_and_get_cookie(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(serde_json::json!({"email": "ada@example.com", "password": "correct horse"}))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    session_cookie(&response)
}
