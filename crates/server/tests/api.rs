//! HTTP-level integration tests: requests go through the full router,
//! middleware included, against an in-memory enrollment store.

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use server::server::build_router;
use server::{ServerConfig, ServerState};
use std::sync::Arc;
use tower::ServiceExt;

const BOUNDARY: &str = "facegate-test-boundary";

fn test_router(upload_dir: &str) -> Router {
    let config = ServerConfig {
        upload_dir: upload_dir.to_string(),
        ..ServerConfig::default()
    };
    let state = Arc::new(ServerState::new(config).expect("state init"));
    build_router(state)
}

/// Build a multipart body with a single `photo` field.
fn photo_body(bytes: &[u8]) -> Body {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"photo\"; filename=\"photo.jpg\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Body::from(body)
}

fn multipart_request(uri: &str, bytes: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(photo_body(bytes))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = test_router("target/test-uploads/health");

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn unknown_route_is_404_with_error_body() {
    let app = test_router("target/test-uploads/missing");

    let response = app
        .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path().to_str().unwrap());

    let response = app
        .clone()
        .oneshot(multipart_request("/auth/register", b"alice-photo-bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let registered = json_body(response).await;
    let identity_ref = registered["identity_ref"].as_str().unwrap().to_string();
    assert!(!identity_ref.is_empty());

    // Same photo bytes must verify and yield a bearer token.
    let response = app
        .oneshot(multipart_request("/auth/login", b"alice-photo-bytes"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login = json_body(response).await;
    assert_eq!(login["identity_ref"], identity_ref.as_str());
    assert_eq!(login["token_type"], "bearer");
    assert!(!login["access_token"].as_str().unwrap().is_empty());
    assert!(login["distance"].as_f64().unwrap().abs() < 1e-12);
}

#[tokio::test]
async fn session_round_trip_and_logout() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path().to_str().unwrap());

    let response = app
        .clone()
        .oneshot(multipart_request("/auth/register", b"carol-photo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let identity_ref = json_body(response).await["identity_ref"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(multipart_request("/auth/login", b"carol-photo"))
        .await
        .unwrap();
    let token = json_body(response).await["access_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::get("/auth/session")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["identity_ref"], identity_ref.as_str());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The revoked token no longer resolves.
    let response = app
        .oneshot(
            Request::get("/auth/session")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_without_enrollment_is_unauthorized() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path().to_str().unwrap());

    let response = app
        .oneshot(multipart_request("/auth/login", b"stranger-photo"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "VERIFICATION_FAILED");
}

#[tokio::test]
async fn register_with_empty_photo_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path().to_str().unwrap());

    let response = app
        .oneshot(multipart_request("/auth/register", b""))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn register_without_photo_field_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path().to_str().unwrap());

    let mut raw = Vec::new();
    raw.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    raw.extend_from_slice(b"Content-Disposition: form-data; name=\"other\"\r\n\r\n");
    raw.extend_from_slice(b"value");
    raw.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    let request = Request::builder()
        .method("POST")
        .uri("/auth/register")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(raw))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn identities_can_be_listed_and_deleted() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_router(dir.path().to_str().unwrap());

    let response = app
        .clone()
        .oneshot(multipart_request("/auth/register", b"bob-photo"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let identity_ref = json_body(response).await["identity_ref"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/v1/identities")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = json_body(response).await;
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["identities"][0]["identity_ref"], identity_ref.as_str());

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/identities/{identity_ref}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Deleting again is a 404: the identity is gone.
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/v1/identities/{identity_ref}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_request_id_header() {
    let app = test_router("target/test-uploads/reqid");

    let response = app
        .oneshot(
            Request::get("/health")
                .header("x-request-id", "test-id-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "test-id-123"
    );
}
