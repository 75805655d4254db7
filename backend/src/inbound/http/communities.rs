//! Community lifecycle HTTP handlers.
//!
//! ```text
//! GET   /api/v1/communities
//! GET   /api/v1/communities/{id}
//! POST  /api/v1/communities {"title":"Runners","description":"...","location":"Austin, TX"}
//! PATCH /api/v1/communities/{id}/join
//! PATCH /api/v1/communities/{id} {"location":"Dallas, TX"}
//! POST  /api/v1/communities/{id}/contents {"title":"...","category":"post","body":"..."}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    CommunityDetail, CommunityDraft, CommunityPatch, CommunitySummary, ContentDraft, ContentEntry,
    Error, GeoPoint,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::users::UserResponse;
use crate::inbound::http::validation::{
    FieldName, community_validation_error, content_validation_error, parse_community_id,
    required,
};

const ID_FIELD: FieldName = FieldName::new("id");

/// GeoJSON point with `[longitude, latitude]` coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct PointGeometry {
    #[serde(rename = "type")]
    #[schema(example = "Point")]
    pub kind: String,
    #[schema(example = json!([-97.7431, 30.2672]))]
    pub coordinates: [f64; 2],
}

impl From<GeoPoint> for PointGeometry {
    fn from(value: GeoPoint) -> Self {
        Self {
            kind: "Point".to_owned(),
            coordinates: value.coordinates(),
        }
    }
}

/// List projection of a community.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySummaryResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub creator: UserResponse,
}

impl From<CommunitySummary> for CommunitySummaryResponse {
    fn from(value: CommunitySummary) -> Self {
        Self {
            id: value.id.to_string(),
            title: value.title,
            description: value.description,
            location: value.location,
            image: value.image,
            creator: value.creator.into(),
        }
    }
}

/// Content item with its author.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: String,
    pub title: String,
    #[schema(example = "post")]
    pub category: String,
    pub body: String,
    pub author: UserResponse,
    pub created_at: String,
}

impl From<ContentEntry> for ContentResponse {
    fn from(value: ContentEntry) -> Self {
        let ContentEntry { item, author } = value;
        Self {
            id: item.id.to_string(),
            title: item.title,
            category: item.category.as_str().to_owned(),
            body: item.body,
            author: author.into(),
            created_at: item.created_at.to_rfc3339(),
        }
    }
}

/// Fully populated community.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommunityResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub geometry: PointGeometry,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub creator: UserResponse,
    /// Members in join order.
    pub members: Vec<UserResponse>,
    /// Content in posting order.
    pub contents: Vec<ContentResponse>,
    pub created_at: String,
}

impl From<CommunityDetail> for CommunityResponse {
    fn from(value: CommunityDetail) -> Self {
        let CommunityDetail {
            community,
            creator,
            members,
            contents,
        } = value;
        Self {
            id: community.id.to_string(),
            title: community.title,
            description: community.description,
            location: community.location,
            geometry: community.geometry.into(),
            image: community.image,
            creator: creator.into(),
            members: members.into_iter().map(UserResponse::from).collect(),
            contents: contents.into_iter().map(ContentResponse::from).collect(),
            created_at: community.created_at.to_rfc3339(),
        }
    }
}

/// `{ "communities": [...] }`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommunitiesEnvelope {
    pub communities: Vec<CommunitySummaryResponse>,
}

/// `{ "community": {...} }`
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CommunityEnvelope {
    pub community: CommunityResponse,
}

/// Confirmation returned after joining.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct JoinResponse {
    #[schema(example = "joined community")]
    pub message: String,
    pub community: CommunityResponse,
}

/// Request body for creating a community.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommunityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
}

impl CreateCommunityRequest {
    fn into_draft(self) -> Result<CommunityDraft, Error> {
        let title = required(self.title, FieldName::new("title"))?;
        let description = required(self.description, FieldName::new("description"))?;
        let location = required(self.location, FieldName::new("location"))?;
        CommunityDraft::try_new(&title, &description, &location, self.image.as_deref())
            .map_err(|err| community_validation_error(&err))
    }
}

/// Request body for editing a community; at least one field is required.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditCommunityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    /// Absolute http(s) URL; an empty string removes the current image.
    pub image: Option<String>,
}

impl EditCommunityRequest {
    fn into_patch(self) -> Result<CommunityPatch, Error> {
        CommunityPatch::try_new(
            self.title.as_deref(),
            self.description.as_deref(),
            self.location.as_deref(),
            self.image.as_deref(),
        )
        .map_err(|err| community_validation_error(&err))
    }
}

/// Request body for posting content.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub title: Option<String>,
    #[schema(example = "incident")]
    pub category: Option<String>,
    pub body: Option<String>,
}

impl ContentRequest {
    fn into_draft(self) -> Result<ContentDraft, Error> {
        let title = required(self.title, FieldName::new("title"))?;
        let category = required(self.category, FieldName::new("category"))?;
        let body = required(self.body, FieldName::new("body"))?;
        ContentDraft::try_new(&title, &category, &body)
            .map_err(|err| content_validation_error(&err))
    }
}

/// List every community with its creator.
#[utoipa::path(
    get,
    path = "/api/v1/communities",
    responses(
        (status = 200, description = "Communities", body = CommunitiesEnvelope),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["communities"],
    operation_id = "listCommunities",
    security([])
)]
#[get("/communities")]
pub async fn list_communities(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<CommunitiesEnvelope>> {
    let communities = state.communities.list_communities().await?;
    Ok(web::Json(CommunitiesEnvelope {
        communities: communities
            .into_iter()
            .map(CommunitySummaryResponse::from)
            .collect(),
    }))
}

/// Fetch one community with members and content.
#[utoipa::path(
    get,
    path = "/api/v1/communities/{id}",
    params(("id" = String, Path, description = "Community identifier")),
    responses(
        (status = 200, description = "Community", body = CommunityEnvelope),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["communities"],
    operation_id = "getCommunity",
    security([])
)]
#[get("/communities/{id}")]
pub async fn get_community(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CommunityEnvelope>> {
    let id = parse_community_id(&path.into_inner(), ID_FIELD)?;
    let detail = state.communities.get_community(&id).await?;
    Ok(web::Json(CommunityEnvelope {
        community: detail.into(),
    }))
}

/// Create a community; the caller becomes its creator and first member.
#[utoipa::path(
    post,
    path = "/api/v1/communities",
    request_body = CreateCommunityRequest,
    responses(
        (status = 201, description = "Community created", body = CommunityEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 502, description = "Location could not be geocoded", body = Error),
        (status = 503, description = "Store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["communities"],
    operation_id = "createCommunity"
)]
#[post("/communities")]
pub async fn create_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCommunityRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let draft = payload.into_inner().into_draft()?;
    let detail = state
        .community_commands
        .create_community(&actor, draft)
        .await?;
    Ok(HttpResponse::Created().json(CommunityEnvelope {
        community: detail.into(),
    }))
}

/// Join a community.
#[utoipa::path(
    patch,
    path = "/api/v1/communities/{id}/join",
    params(("id" = String, Path, description = "Community identifier")),
    responses(
        (status = 200, description = "Joined", body = JoinResponse),
        (status = 400, description = "Malformed identifier", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Already a member", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["communities"],
    operation_id = "joinCommunity"
)]
#[patch("/communities/{id}/join")]
pub async fn join_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<JoinResponse>> {
    let actor = session.require_user_id()?;
    let id = parse_community_id(&path.into_inner(), ID_FIELD)?;
    let detail = state.community_commands.join_community(&actor, &id).await?;
    Ok(web::Json(JoinResponse {
        message: "joined community".to_owned(),
        community: detail.into(),
    }))
}

/// Edit a community; only its creator may do so.
#[utoipa::path(
    patch,
    path = "/api/v1/communities/{id}",
    params(("id" = String, Path, description = "Community identifier")),
    request_body = EditCommunityRequest,
    responses(
        (status = 200, description = "Updated", body = CommunityEnvelope),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not the creator", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 502, description = "Location could not be geocoded", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["communities"],
    operation_id = "editCommunity"
)]
#[patch("/communities/{id}")]
pub async fn edit_community(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EditCommunityRequest>,
) -> ApiResult<web::Json<CommunityEnvelope>> {
    let actor = session.require_user_id()?;
    let id = parse_community_id(&path.into_inner(), ID_FIELD)?;
    let patch = payload.into_inner().into_patch()?;
    let detail = state
        .community_commands
        .edit_community(&actor, &id, patch)
        .await?;
    Ok(web::Json(CommunityEnvelope {
        community: detail.into(),
    }))
}

/// Post content into a community the caller belongs to.
#[utoipa::path(
    post,
    path = "/api/v1/communities/{id}/contents",
    params(("id" = String, Path, description = "Community identifier")),
    request_body = ContentRequest,
    responses(
        (status = 201, description = "Content posted", body = ContentResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Not a member", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["communities"],
    operation_id = "postContent"
)]
#[post("/communities/{id}/contents")]
pub async fn post_content(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ContentRequest>,
) -> ApiResult<HttpResponse> {
    let actor = session.require_user_id()?;
    let id = parse_community_id(&path.into_inner(), ID_FIELD)?;
    let draft = payload.into_inner().into_draft()?;
    let entry = state
        .community_commands
        .post_content(&actor, &id, draft)
        .await?;
    Ok(HttpResponse::Created().json(ContentResponse::from(entry)))
}

#[cfg(test)]
#[path = "communities_tests.rs"]
mod tests;
