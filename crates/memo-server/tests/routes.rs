//! Route tests driving the router without a listener

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use memo_server::{build_app, ServerConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> Router {
    let mut config = ServerConfig {
        max_content_length: 32,
        ..ServerConfig::default()
    };
    config.sessions.insert("tok-alice".into(), "alice".into());
    config.sessions.insert("tok-bob".into(), "bob".into());
    build_app(&config)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::COOKIE, format!("memo-session={token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn create(app: &Router, token: &str, content: &str, visibility: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/memo",
        Some(token),
        Some(json!({ "content": content, "visibility": visibility })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

async fn seeded() -> Router {
    let app = app();
    create(&app, "tok-alice", "a-private", "PRIVATE").await;
    create(&app, "tok-alice", "a-protected", "PROTECTED").await;
    create(&app, "tok-alice", "a-public", "PUBLIC").await;
    create(&app, "tok-bob", "b-public", "PUBLIC").await;
    app
}

fn contents(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|memo| memo["content"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_is_wrapped_in_envelope() {
    let (status, body) = send(&app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "code": 200, "message": "success", "data": "ok" }));
}

#[tokio::test]
async fn create_sets_owner_from_session() {
    let app = app();
    let memo = create(&app, "tok-alice", "hello", "PUBLIC").await;
    assert_eq!(memo["creatorId"], "alice");
    assert_eq!(memo["visibility"], "PUBLIC");
    assert_eq!(memo["id"], 1);
}

#[tokio::test]
async fn anonymous_mutations_are_forbidden() {
    let app = seeded().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/memo",
        None,
        Some(json!({ "content": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 403);
    assert_eq!(body["data"], Value::Null);

    let (status, _) = send(&app, Method::DELETE, "/api/memo/1", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::GET, "/api/memo/1", None, None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn anonymous_listing_without_owner_is_not_acceptable() {
    let app = seeded().await;
    let (status, body) = send(&app, Method::GET, "/api/memo", None, None).await;
    assert_eq!(status, StatusCode::NOT_ACCEPTABLE);
    assert_eq!(body["code"], 406);
}

#[tokio::test]
async fn anonymous_listing_with_owner_sees_public() {
    let app = seeded().await;
    let (status, body) = send(&app, Method::GET, "/api/memo?creatorId=alice", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contents(&body), ["a-public"]);
}

#[tokio::test]
async fn owner_listing_is_unrestricted() {
    let app = seeded().await;
    let (_, body) = send(&app, Method::GET, "/api/memo", Some("tok-alice"), None).await;
    assert_eq!(contents(&body), ["a-public", "a-protected", "a-private"]);
}

#[tokio::test]
async fn viewer_listing_of_other_owner_sees_shared_levels() {
    let app = seeded().await;
    let (_, body) = send(
        &app,
        Method::GET,
        "/api/memo?creatorId=alice",
        Some("tok-bob"),
        None,
    )
    .await;
    assert_eq!(contents(&body), ["a-public", "a-protected"]);
}

#[tokio::test]
async fn explicit_visibility_filter_is_used_verbatim() {
    let app = seeded().await;
    let (_, body) = send(
        &app,
        Method::GET,
        "/api/memo?visibility=PRIVATE",
        Some("tok-alice"),
        None,
    )
    .await;
    assert_eq!(contents(&body), ["a-private"]);
}

#[tokio::test]
async fn private_memos_stay_with_their_owner() {
    let app = seeded().await;
    for token in [None, Some("tok-bob")] {
        for uri in [
            "/api/memo?creatorId=alice&visibility=PRIVATE",
            "/api/memo/all?visibility=PRIVATE",
            "/api/memo/all?creatorId=alice&visibility=PRIVATE",
        ] {
            let (status, body) = send(&app, Method::GET, uri, token, None).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(contents(&body).is_empty(), "{uri} as {token:?}: {body}");
        }
    }

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/memo/all?visibility=PRIVATE",
        Some("tok-alice"),
        None,
    )
    .await;
    assert_eq!(contents(&body), ["a-private"]);
}

#[tokio::test]
async fn unknown_visibility_is_bad_request() {
    let app = seeded().await;
    let (status, _) = send(
        &app,
        Method::GET,
        "/api/memo?creatorId=alice&visibility=SECRET",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn all_memos_route_is_not_shadowed_by_id_route() {
    let app = seeded().await;
    let (status, anon) = send(&app, Method::GET, "/api/memo/all", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(contents(&anon), ["b-public", "a-public"]);

    let (_, signed_in) = send(&app, Method::GET, "/api/memo/all", Some("tok-bob"), None).await;
    assert_eq!(contents(&signed_in), ["b-public", "a-public", "a-protected"]);
}

#[tokio::test]
async fn listing_honors_page_window() {
    let app = seeded().await;
    let (_, body) = send(
        &app,
        Method::GET,
        "/api/memo?offset=1&limit=1",
        Some("tok-alice"),
        None,
    )
    .await;
    assert_eq!(contents(&body), ["a-protected"]);
}

#[tokio::test]
async fn patch_stats_and_delete_round() {
    let app = seeded().await;
    let (status, body) = send(
        &app,
        Method::PATCH,
        "/api/memo/2",
        Some("tok-alice"),
        Some(json!({ "content": "two words", "visibility": "PUBLIC" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["visibility"], "PUBLIC");

    let (status, body) = send(&app, Method::GET, "/api/memo/2", Some("tok-alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["words"], 2);
    assert_eq!(body["data"]["characters"], 9);

    let (status, _) = send(&app, Method::DELETE, "/api/memo/2", Some("tok-alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, Method::GET, "/api/memo/2", Some("tok-alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = seeded().await;
    let too_long = "x".repeat(33);
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/memo",
        Some("tok-alice"),
        Some(json!({ "content": too_long })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/memo",
        Some("tok-alice"),
        Some(json!({ "content": "ok", "visibility": "HIDDEN" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/api/memo/abc",
        Some("tok-alice"),
        Some(json!({ "visibility": "PUBLIC" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn bearer_token_authenticates() {
    let app = seeded().await;
    let request = Request::builder()
        .uri("/api/memo")
        .header(header::AUTHORIZATION, "Bearer tok-bob")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(contents(&body), ["b-public"]);
}
