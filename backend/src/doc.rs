//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the request and response bodies
//! they exchange, the shared error envelope and the session cookie security
//! scheme. Swagger UI serves it in debug builds and the `openapi-dump` binary
//! prints it for external tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::communities::{
    CommunitiesEnvelope, CommunityEnvelope, CommunityResponse, CommunitySummaryResponse,
    ContentRequest, ContentResponse, CreateCommunityRequest, EditCommunityRequest, JoinResponse,
    PointGeometry,
};
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Private session cookie issued by POST /api/v1/register or /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Townsquare API",
        description = "Community directory: accounts, communities, membership and posts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::logout,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::my_communities,
        crate::inbound::http::communities::list_communities,
        crate::inbound::http::communities::get_community,
        crate::inbound::http::communities::create_community,
        crate::inbound::http::communities::join_community,
        crate::inbound::http::communities::edit_community,
        crate::inbound::http::communities::post_content,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        UserResponse,
        PointGeometry,
        CommunitySummaryResponse,
        CommunityResponse,
        ContentResponse,
        CommunitiesEnvelope,
        CommunityEnvelope,
        JoinResponse,
        CreateCommunityRequest,
        EditCommunityRequest,
        ContentRequest,
    )),
    tags(
        (name = "users", description = "Accounts and the signed-in user"),
        (name = "communities", description = "Community lifecycle and content"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
