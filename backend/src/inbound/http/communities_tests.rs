//! Tests for community HTTP handlers.

use super::*;
use crate::domain::{
    CommunityId, ContentCategory, ContentId, ContentItem, ErrorCode, UserId,
};
use crate::inbound::http::test_utils::{
    MockPorts, SIGNED_IN_USER, fixture_detail, fixture_user, login_and_get_cookie,
    signed_in_user, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use chrono::Utc;
use rstest::rstest;
use serde_json::{Value, json};

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(crate::inbound::http::validation::json_config())
        .wrap(test_session_middleware())
        .service(
            web::scope("/api/v1")
                .service(crate::inbound::http::users::login)
                .service(list_communities)
                .service(create_community)
                .service(join_community)
                .service(post_content)
                .service(get_community)
                .service(edit_community),
        )
}

#[actix_web::test]
async fn empty_directory_lists_no_communities() {
    let mut ports = MockPorts::default();
    ports
        .communities
        .expect_list_communities()
        .times(1)
        .returning(|| Ok(Vec::new()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/communities").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!({"communities": []}));
}

#[rstest]
#[case(json!({"title": 5, "description": "d", "location": "Austin, TX"}), "malformed_body")]
#[case(json!(["not", "an", "object"]), "malformed_body")]
#[actix_web::test]
async fn malformed_bodies_render_the_error_envelope(
    #[case] body: Value,
    #[case] detail_code: &str,
) {
    let ports = MockPorts::default();
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/communities")
            .cookie(cookie)
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], detail_code);
}

#[actix_web::test]
async fn bodies_without_json_content_type_are_rejected_as_json() {
    let ports = MockPorts::default();
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/communities")
            .cookie(cookie)
            .insert_header(("content-type", "text/plain"))
            .set_payload("title=Runners")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "unsupported_content_type");
}

#[actix_web::test]
async fn store_outage_is_service_unavailable() {
    let mut ports = MockPorts::default();
    ports
        .communities
        .expect_list_communities()
        .returning(|| Err(Error::service_unavailable("community store unavailable")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/communities").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn detail_renders_geojson_and_members() {
    let detail = fixture_detail(&signed_in_user());
    let id = detail.community.id;
    let mut ports = MockPorts::default();
    ports
        .communities
        .expect_get_community()
        .withf(move |requested| requested == &id)
        .returning(move |_| Ok(detail.clone()));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/communities/{id}"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    let community = &body["community"];
    assert_eq!(community["id"], json!(id.to_string()));
    assert_eq!(
        community["geometry"],
        json!({"type": "Point", "coordinates": [-97.7431, 30.2672]})
    );
    assert_eq!(community["members"][0]["id"], json!(SIGNED_IN_USER));
    assert_eq!(community["creator"]["firstName"], json!("Ada"));
    assert_eq!(community["contents"], json!([]));
}

#[rstest]
#[case("not-a-uuid", StatusCode::BAD_REQUEST)]
#[case("00000000-0000-0000-0000-000000000000", StatusCode::NOT_FOUND)]
#[actix_web::test]
async fn unresolvable_ids_are_reported(#[case] raw: &str, #[case] status: StatusCode) {
    let mut ports = MockPorts::default();
    ports
        .communities
        .expect_get_community()
        .returning(|_| Err(Error::not_found("community not found")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/communities/{raw}"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), status);
}

#[actix_web::test]
async fn create_requires_a_session() {
    let mut ports = MockPorts::default();
    ports.community_commands.expect_create_community().never();
    let app = actix_test::init_service(test_app(ports.into_state())).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/communities")
            .set_json(json!({"title": "Runners", "description": "d", "location": "Austin, TX"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_returns_created_community() {
    let mut ports = MockPorts::default();
    ports
        .community_commands
        .expect_create_community()
        .withf(|actor, draft| actor == &signed_in_user() && draft.location() == "Austin, TX")
        .times(1)
        .returning(|actor, _| Ok(fixture_detail(actor)));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/communities")
            .cookie(cookie)
            .set_json(json!({
                "title": "Runners",
                "description": "Weekly runs",
                "location": " Austin, TX "
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: CommunityEnvelope = actix_test::read_body_json(response).await;
    assert_eq!(body.community.members.len(), 1);
    assert_eq!(body.community.creator.id, SIGNED_IN_USER);
}

#[actix_web::test]
async fn create_validates_before_calling_the_service() {
    let mut ports = MockPorts::default();
    ports.community_commands.expect_create_community().never();
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/communities")
            .cookie(cookie)
            .set_json(json!({"title": "Runners", "description": "Weekly runs"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error: Error = actix_test::read_body_json(response).await;
    assert_eq!(
        error.details(),
        Some(&json!({"field": "location", "code": "missing_field"}))
    );
}

#[actix_web::test]
async fn geocode_failures_are_bad_gateway() {
    let mut ports = MockPorts::default();
    ports
        .community_commands
        .expect_create_community()
        .returning(|_, _| Err(Error::upstream_geocode_failure("no match for location")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/communities")
            .cookie(cookie)
            .set_json(json!({"title": "Runners", "description": "d", "location": "Nowhere"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let error: Error = actix_test::read_body_json(response).await;
    assert_eq!(error.code(), ErrorCode::UpstreamGeocodeFailure);
}

#[actix_web::test]
async fn join_wraps_detail_with_message() {
    let mut ports = MockPorts::default();
    ports
        .community_commands
        .expect_join_community()
        .times(1)
        .returning(|actor, _| {
            let mut detail = fixture_detail(&UserId::random());
            detail.members.push(fixture_user(actor));
            Ok(detail)
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/communities/{}/join", CommunityId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: JoinResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.message, "joined community");
    assert_eq!(body.community.members.len(), 2);
}

#[actix_web::test]
async fn joining_twice_is_a_conflict() {
    let mut ports = MockPorts::default();
    ports
        .community_commands
        .expect_join_community()
        .returning(|_, _| Err(Error::already_member("already a member of this community")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/communities/{}/join", CommunityId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let error: Error = actix_test::read_body_json(response).await;
    assert_eq!(error.code(), ErrorCode::AlreadyMember);
}

#[actix_web::test]
async fn empty_edit_is_rejected() {
    let mut ports = MockPorts::default();
    ports.community_commands.expect_edit_community().never();
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/communities/{}", CommunityId::random()))
            .cookie(cookie)
            .set_json(json!({}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn non_creator_edit_is_forbidden() {
    let mut ports = MockPorts::default();
    ports
        .community_commands
        .expect_edit_community()
        .withf(|_, _, patch| patch.location() == Some("Dallas, TX"))
        .returning(|_, _, _| Err(Error::forbidden("only the creator may edit this community")));
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::patch()
            .uri(&format!("/api/v1/communities/{}", CommunityId::random()))
            .cookie(cookie)
            .set_json(json!({"location": "Dallas, TX"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn members_can_post_content() {
    let mut ports = MockPorts::default();
    ports
        .community_commands
        .expect_post_content()
        .withf(|_, _, draft| draft.category() == ContentCategory::Incident)
        .times(1)
        .returning(|actor, id, draft| {
            Ok(ContentEntry {
                item: ContentItem {
                    id: ContentId::random(),
                    community_id: *id,
                    author: actor.clone(),
                    title: draft.title().to_owned(),
                    category: draft.category(),
                    body: draft.body().to_owned(),
                    created_at: Utc::now(),
                },
                author: fixture_user(actor),
            })
        });
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/communities/{}/contents", CommunityId::random()))
            .cookie(cookie)
            .set_json(json!({"title": "Broken light", "category": "incident", "body": "Oak St"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: ContentResponse = actix_test::read_body_json(response).await;
    assert_eq!(body.category, "incident");
    assert_eq!(body.author.id, SIGNED_IN_USER);
}

#[actix_web::test]
async fn unknown_category_is_rejected() {
    let mut ports = MockPorts::default();
    ports.community_commands.expect_post_content().never();
    let app = actix_test::init_service(test_app(ports.into_state())).await;
    let cookie = login_and_get_cookie(&app).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/communities/{}/contents", CommunityId::random()))
            .cookie(cookie)
            .set_json(json!({"title": "t", "category": "gossip", "body": "b"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
