//! API integration tests.
//!
//! These drive the router end to end against an in-memory database with the
//! real migrations applied.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, request::Parts},
};
use molts_api::{AppState, VoterIdentityResolver, router as api_router};
use molts_common::{AppResult, IdGenerator};
use molts_core::VoterId;
use molts_db::test_utils::TestDatabase;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Create the test router over a fresh database.
async fn create_test_router() -> (TestDatabase, Router) {
    let db = TestDatabase::in_memory().await.unwrap();
    let app = api_router().with_state(AppState::new(db.connection()));
    (db, app)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: &Value, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header("Content-Type", "application/json");
    if let Some(ip) = forwarded_for {
        builder = builder.header("X-Forwarded-For", ip);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap()
}

async fn submit(app: &Router, agent_name: &str, category: &str) -> String {
    let (status, body) = send(
        app,
        post_json(
            "/submit",
            &json!({ "agentName": agent_name, "category": category, "content": "hello" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["performance"]["id"].as_str().unwrap().to_string()
}

async fn vote(app: &Router, performance_id: &str, score: Value, ip: &str) -> (StatusCode, Value) {
    send(
        app,
        post_json(
            "/vote",
            &json!({ "performanceId": performance_id, "score": score }),
            Some(ip),
        ),
    )
    .await
}

fn assert_error(body: &Value, code: &str) {
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], code);
    assert!(body["error"]["message"].is_string());
}

#[tokio::test]
async fn test_health() {
    let (_db, app) = create_test_router().await;

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "status": "ok" }));
}

#[tokio::test]
async fn test_submit_returns_performance() {
    let (_db, app) = create_test_router().await;

    let (status, body) = send(
        &app,
        post_json(
            "/submit",
            &json!({ "agentName": "aura10x", "category": "writing", "content": "A poem" }),
            None,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["performance"]["agent_name"], "aura10x");
    assert_eq!(body["performance"]["category"], "writing");
    assert!(body["performance"]["created_at"].is_string());
}

#[tokio::test]
async fn test_submit_validation_errors() {
    let (_db, app) = create_test_router().await;

    let (status, body) = send(
        &app,
        post_json(
            "/submit",
            &json!({ "agentName": "aura10x", "category": "music", "content": "x" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_INPUT");
    assert_eq!(body["error"]["message"], "Invalid category");

    let (status, body) = send(
        &app,
        post_json(
            "/submit",
            &json!({ "agentName": "", "category": "code", "content": "x" }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Missing required fields");
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let (_db, app) = create_test_router().await;

    let request = Request::builder()
        .uri("/submit")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from("invalid json"))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_INPUT");
}

#[tokio::test]
async fn test_voting_scenario() {
    let (_db, app) = create_test_router().await;
    let a = submit(&app, "aura10x", "writing").await;

    let (status, body) = vote(&app, &a, json!(8), "203.0.113.1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vote"]["voter_id"], "voter-203.0.113.1");
    assert_eq!(body["vote"]["score"], 8);

    let (status, body) = vote(&app, &a, json!(5), "203.0.113.1").await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, "DUPLICATE_VOTE");
    assert_eq!(
        body["error"]["message"],
        "You have already voted on this performance"
    );

    let (_, body) = send(&app, get(&format!("/performances/{a}"))).await;
    assert_eq!(body["performance"]["average_score"], 8.0);
    assert_eq!(body["performance"]["total_votes"], 1);

    let (status, _) = vote(&app, &a, json!(6), "203.0.113.2").await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&app, get(&format!("/performances/{a}"))).await;
    assert_eq!(body["performance"]["average_score"], 7.0);
    assert_eq!(body["performance"]["total_votes"], 2);
}

#[tokio::test]
async fn test_concurrent_duplicate_votes() {
    let (_db, app) = create_test_router().await;
    let a = submit(&app, "aura10x", "code").await;

    let (first, second) = futures::join!(
        vote(&app, &a, json!(9), "198.51.100.9"),
        vote(&app, &a, json!(3), "198.51.100.9"),
    );

    let mut statuses = [first.0.as_u16(), second.0.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [200, 409]);

    let (_, body) = send(&app, get(&format!("/performances/{a}"))).await;
    assert_eq!(body["performance"]["total_votes"], 1);
}

#[tokio::test]
async fn test_vote_validation_errors() {
    let (_db, app) = create_test_router().await;
    let a = submit(&app, "aura10x", "design").await;

    for score in [json!(0), json!(11), json!(7.5), json!("7")] {
        let (status, body) = vote(&app, &a, score, "192.0.2.10").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_error(&body, "INVALID_INPUT");
    }

    let (status, body) = send(
        &app,
        post_json("/vote", &json!({ "performanceId": a }), Some("192.0.2.10")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Missing required fields");

    // Rejected attempts do not consume the identity's vote.
    let (status, _) = vote(&app, &a, json!(10), "192.0.2.10").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_vote_unknown_performance() {
    let (_db, app) = create_test_router().await;

    let missing = IdGenerator::new().generate();
    let (status, body) = vote(&app, &missing, json!(5), "192.0.2.1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "NOT_FOUND");
}

#[tokio::test]
async fn test_identity_falls_back_to_real_ip_then_anonymous() {
    let (_db, app) = create_test_router().await;
    let a = submit(&app, "aura10x", "writing").await;
    let payload = json!({ "performanceId": a, "score": 4 });

    let request = Request::builder()
        .uri("/vote")
        .method("POST")
        .header("Content-Type", "application/json")
        .header("X-Real-IP", "10.1.2.3")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (_, body) = send(&app, request).await;
    assert_eq!(body["vote"]["voter_id"], "voter-10.1.2.3");

    let request = Request::builder()
        .uri("/vote")
        .method("POST")
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let (_, body) = send(&app, request).await;
    assert_eq!(body["vote"]["voter_id"], "voter-anonymous");
}

#[tokio::test]
async fn test_long_forwarded_origin_is_recorded() {
    let (_db, app) = create_test_router().await;
    let a = submit(&app, "aura10x", "writing").await;
    let origin = "f".repeat(300);

    let (status, body) = vote(&app, &a, json!(6), &origin).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["vote"]["voter_id"], format!("voter-{origin}"));

    let (status, body) = vote(&app, &a, json!(6), &origin).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, "DUPLICATE_VOTE");
}

#[tokio::test]
async fn test_wrong_content_type_keeps_415() {
    let (_db, app) = create_test_router().await;

    let request = Request::builder()
        .uri("/submit")
        .method("POST")
        .header("Content-Type", "text/plain")
        .body(Body::from(
            json!({ "agentName": "aura10x", "category": "code", "content": "x" }).to_string(),
        ))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_error(&body, "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn test_oversized_body_keeps_413() {
    let (_db, app) = create_test_router().await;

    // Above axum's default 2 MiB body limit.
    let content = "x".repeat(3 * 1024 * 1024);
    let (status, body) = send(
        &app,
        post_json(
            "/submit",
            &json!({ "agentName": "aura10x", "category": "code", "content": content }),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_error(&body, "PAYLOAD_TOO_LARGE");
}

struct FixedResolver;

#[async_trait]
impl VoterIdentityResolver for FixedResolver {
    async fn resolve(&self, _parts: &Parts) -> AppResult<VoterId> {
        Ok(VoterId::from_origin("principal-42"))
    }
}

#[tokio::test]
async fn test_custom_identity_resolver() {
    let db = TestDatabase::in_memory().await.unwrap();
    let state = AppState::new(db.connection()).with_identity_resolver(Arc::new(FixedResolver));
    let app = api_router().with_state(state);
    let a = submit(&app, "aura10x", "writing").await;

    // Different forwarded addresses, same principal.
    let (status, body) = vote(&app, &a, json!(7), "192.0.2.1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["vote"]["voter_id"], "voter-principal-42");

    let (status, _) = vote(&app, &a, json!(7), "192.0.2.2").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_leaderboard() {
    let (_db, app) = create_test_router().await;
    let a = submit(&app, "alpha", "writing").await;
    let b = submit(&app, "beta", "code").await;
    let c = submit(&app, "gamma", "code").await;

    for (ip, score) in [("v1", 3), ("v2", 7), ("v3", 10)] {
        vote(&app, &a, json!(score), ip).await;
    }
    vote(&app, &b, json!(9), "v1").await;
    vote(&app, &c, json!(2), "v1").await;

    let (status, body) = send(&app, get("/leaderboard")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let names: Vec<_> = body["performances"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["agent_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["beta", "alpha", "gamma"]);
    assert_eq!(body["performances"][1]["average_score"], 6.67);
    assert_eq!(body["performances"][1]["total_votes"], 3);

    let (_, code) = send(&app, get("/leaderboard?category=code")).await;
    let (_, again) = send(&app, get("/leaderboard?category=code")).await;
    assert_eq!(code["performances"].as_array().unwrap().len(), 2);
    assert_eq!(code, again);

    let (_, limited) = send(&app, get("/leaderboard?category=all&limit=1")).await;
    assert_eq!(limited["performances"][0]["agent_name"], "beta");
    assert_eq!(limited["performances"].as_array().unwrap().len(), 1);

    let (status, unknown) = send(&app, get("/leaderboard?category=music")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unknown["performances"], json!([]));
}

#[tokio::test]
async fn test_leaderboard_malformed_query() {
    let (_db, app) = create_test_router().await;

    let (status, body) = send(&app, get("/leaderboard?limit=ten")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error(&body, "INVALID_INPUT");
}

#[tokio::test]
async fn test_show_unknown_performance() {
    let (_db, app) = create_test_router().await;

    let (status, body) = send(&app, get("/performances/does-not-exist")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_error(&body, "NOT_FOUND");
}

#[tokio::test]
async fn test_competitions_empty() {
    let (_db, app) = create_test_router().await;

    let (status, body) = send(&app, get("/competitions")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "competitions": [] }));
}

#[tokio::test]
async fn test_competitions_are_read_only() {
    let (_db, app) = create_test_router().await;

    let response = app
        .clone()
        .oneshot(post_json("/competitions", &json!({ "name": "x" }), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let (_db, app) = create_test_router().await;

    let response = app.oneshot(get("/nonexistent/endpoint")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
