//! Account and current-user HTTP handlers.
//!
//! ```text
//! POST /api/v1/register {"email":"ada@example.com","password":"...","firstName":"Ada","lastName":"Lovelace"}
//! POST /api/v1/login {"email":"ada@example.com","password":"..."}
//! POST /api/v1/logout
//! GET /api/v1/users/me
//! GET /api/v1/users/me/communities
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Error, LoginCredentials, LoginValidationError, ProfileFields, Registration,
    RegistrationValidationError, User,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::communities::CommunitySummaryResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, login_validation_error, registration_validation_error, required,
};

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub location: Option<String>,
    pub avatar: Option<String>,
}

impl RegisterRequest {
    fn into_registration(self) -> Result<Registration, Error> {
        let email = required(self.email, FieldName::new("email"))?;
        let password = required(self.password, FieldName::new("password"))?;
        let first_name = required(self.first_name, FieldName::new("firstName"))?;
        let last_name = required(self.last_name, FieldName::new("lastName"))?;
        let fields = ProfileFields {
            email: &email,
            first_name: &first_name,
            last_name: &last_name,
            location: self.location.as_deref(),
            avatar: self.avatar.as_deref(),
        };
        Registration::try_new(fields, &password)
            .map_err(|err: RegistrationValidationError| registration_validation_error(&err))
    }
}

/// Login request body for `POST /api/v1/login`.
///
/// Example JSON:
/// `{"email":"ada@example.com","password":"correct horse"}`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Public user profile.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl From<User> for UserResponse {
    fn from(value: User) -> Self {
        Self {
            id: value.id.to_string(),
            email: value.email.as_ref().to_owned(),
            first_name: value.first_name.as_ref().to_owned(),
            last_name: value.last_name.as_ref().to_owned(),
            location: value.location,
            avatar: value.avatar,
        }
    }
}

/// Create an account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = payload.into_inner().into_registration()?;
    let user = state.accounts.register(registration).await?;
    session.persist_user(&user.id)?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = UserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())
        .map_err(|err| login_validation_error(&err))?;
    let user_id = state.login.authenticate(&credentials).await?;
    let user = state.profile.fetch_profile(&user_id).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

/// Clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["users"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<UserResponse>> {
    let user_id = session.require_user_id()?;
    let user = state.profile.fetch_profile(&user_id).await?;
    Ok(web::Json(UserResponse::from(user)))
}

/// Communities the signed-in user has joined, in join order.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/communities",
    responses(
        (status = 200, description = "Joined communities", body = [CommunitySummaryResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "myCommunities"
)]
#[get("/users/me/communities")]
pub async fn my_communities(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<CommunitySummaryResponse>>> {
    let user_id = session.require_user_id()?;
    let communities = state.profile.my_communities(&user_id).await?;
    Ok(web::Json(
        communities
            .into_iter()
            .map(CommunitySummaryResponse::from)
            .collect(),
    ))
}
