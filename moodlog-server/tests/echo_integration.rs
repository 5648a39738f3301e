//! HTTP integration tests for the transcription echo service

use axum::body::Body;
use axum::http::{Request, StatusCode};
use moodlog_server::echo::build_echo_router;
use serde_json::{json, Value};
use tower::ServiceExt;

async fn post_transcribe(body: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method("POST")
        .uri("/transcribe")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let resp = build_echo_router().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

// ===========================================================================
// TEST 1: text comes back exactly as sent
// ===========================================================================
#[tokio::test]
async fn test_echo_returns_exact_envelope() {
    let (status, body) = post_transcribe(r#"{"transcription":"hello world"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "transcription": "hello world" }));
}

// ===========================================================================
// TEST 2: missing field echoes null instead of failing
// ===========================================================================
#[tokio::test]
async fn test_echo_missing_field_is_null() {
    let (status, body) = post_transcribe("{}").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "transcription": null }));
}

// ===========================================================================
// TEST 3: non-JSON body or a non-string transcription is a 400
// ===========================================================================
#[tokio::test]
async fn test_echo_rejects_non_json() {
    let (status, body) = post_transcribe("hello world").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");

    let (status, body) = post_transcribe(r#"{"transcription":123}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
}

// ===========================================================================
// TEST 4: index page and no journal routes
// ===========================================================================
#[tokio::test]
async fn test_echo_index_and_unknown_routes() {
    let resp = build_echo_router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = build_echo_router()
        .oneshot(Request::builder().uri("/entries").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
