//! Integration tests for authentication guards and request validation.
//!
//! Every request here terminates before any database query runs (the
//! harness pool is lazy and never connects), which pins down the
//! check-before-touch ordering: auth first, then payload validation,
//! then persistence.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use common::{bearer_token, build_test_app};

/// Helper: run one request and return status + parsed JSON body.
async fn send(request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let app = build_test_app();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value =
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

fn json_post(uri: &str, auth: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = auth {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

// ---------------------------------------------------------------------------
// Authentication guards
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_token_is_rejected_with_401() {
    let request = Request::builder()
        .uri("/api/v1/lockers")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn non_bearer_authorization_is_rejected_with_401() {
    let request = Request::builder()
        .uri("/api/v1/lockers")
        .header(header::AUTHORIZATION, "Token abcdef")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("Bearer"));
}

#[tokio::test]
async fn garbage_token_is_rejected_with_401() {
    let request = Request::builder()
        .uri("/api/v1/lockers")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn admin_surface_rejects_regular_users_with_403() {
    let request = Request::builder()
        .uri("/api/v1/admin/users")
        .header(header::AUTHORIZATION, bearer_token(7, "user"))
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

// ---------------------------------------------------------------------------
// Payload validation (runs after auth, before persistence)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn locker_create_rejects_malformed_code() {
    let request = json_post(
        "/api/v1/lockers",
        Some(&bearer_token(1, "user")),
        serde_json::json!({ "code": "abc1", "name": "Shelf 1" }),
    );

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["error"].as_str().unwrap().contains("format"));
}

#[tokio::test]
async fn register_rejects_short_passwords() {
    let request = json_post(
        "/api/v1/auth/register",
        None,
        serde_json::json!({
            "username": "newuser",
            "email": "new@example.com",
            "password": "short",
            "display_name": "New User"
        }),
    );

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("at least 8"));
}

#[tokio::test]
async fn bulk_item_delete_rejects_empty_id_list() {
    let request = json_post(
        "/api/v1/items/bulk-delete",
        Some(&bearer_token(1, "user")),
        serde_json::json!({ "item_ids": [] }),
    );

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn bulk_item_move_requires_a_destination() {
    let request = json_post(
        "/api/v1/items/bulk-move",
        Some(&bearer_token(1, "user")),
        serde_json::json!({ "item_ids": [1, 2, 3] }),
    );

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("new_category_id and/or new_locker_id"));
}

#[tokio::test]
async fn bulk_locker_delete_rejects_empty_id_list() {
    let request = json_post(
        "/api/v1/lockers/bulk-delete",
        Some(&bearer_token(1, "user")),
        serde_json::json!({ "locker_ids": [] }),
    );

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn export_requires_at_least_one_selection() {
    let request = Request::builder()
        .uri("/api/v1/transfer/export")
        .header(header::AUTHORIZATION, bearer_token(1, "user"))
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("at least one"));
}

#[tokio::test]
async fn import_rejects_unsupported_document_versions() {
    let request = json_post(
        "/api/v1/transfer/import",
        Some(&bearer_token(1, "user")),
        serde_json::json!({ "version": "1.0", "data": {} }),
    );

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("version"));
}

#[tokio::test]
async fn import_rejects_negative_quantities() {
    let request = json_post(
        "/api/v1/transfer/import",
        Some(&bearer_token(1, "user")),
        serde_json::json!({
            "data": {
                "items": [{
                    "name": "Cable",
                    "quantity": -3,
                    "categoryName": "Electronics",
                    "lockerCode": "A001"
                }]
            }
        }),
    );

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"]
        .as_str()
        .unwrap()
        .contains("items[0].quantity"));
}

// ---------------------------------------------------------------------------
// Health endpoint
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_degraded_without_a_database() {
    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let (status, json) = send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["db_healthy"], false);
}
