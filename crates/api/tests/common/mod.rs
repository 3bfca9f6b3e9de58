//! Shared helpers for API integration tests.
//!
//! Builds the production router via `build_app_router` so tests exercise the
//! same middleware stack (CORS, request ID, timeout, tracing, panic
//! recovery) that production uses. JWTs are minted directly with the test
//! secret -- this service has no login endpoint.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use campus_api::auth::jwt::{generate_access_token, JwtConfig};
use campus_api::config::{QrConfig, ServerConfig};
use campus_api::router::build_app_router;
use campus_api::state::AppState;
use campus_core::token::TicketCodec;
use campus_core::types::DbId;
use campus_db::models::event::CreateEvent;
use campus_db::models::user::CreateUser;
use campus_db::repositories::{EventRepo, UserRepo};

/// Signing secret for ticket tokens in tests. Tests that need to craft
/// payloads directly build a codec from this via [`test_codec`].
pub const TEST_QR_SECRET: &str = "test-qr-secret";

/// Signing secret for JWTs in tests.
pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
        qr: QrConfig {
            secret: TEST_QR_SECRET.to_string(),
            validity_hours: 48,
        },
    }
}

/// A codec signing with the same secret as the test app.
pub fn test_codec() -> TicketCodec {
    TicketCodec::new(TEST_QR_SECRET.as_bytes().to_vec())
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        codec: Arc::new(test_codec()),
    };
    build_app_router(state, &config)
}

/// Mint a Bearer token for the given user id and role.
pub fn auth_token(user_id: DbId, role: &str) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
    };
    generate_access_token(user_id, role, &config).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

/// Send an authenticated GET request.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// Send an authenticated POST request with a JSON body.
pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// Send an unauthenticated POST request with a JSON body.
pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request construction should succeed");
    app.oneshot(request).await.expect("request should complete")
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collection should succeed")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

/// Assert a response carries the given status and error `code`.
pub async fn assert_error_code(response: Response, status: StatusCode, code: &str) {
    assert_eq!(response.status(), status);
    let json = body_json(response).await;
    assert_eq!(json["code"], code, "unexpected error code: {json}");
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a user with the given role directly in the database.
pub async fn seed_user(pool: &PgPool, tag: &str, role: &str) -> campus_db::models::user::User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: format!("User {tag}"),
            email: format!("{tag}@campus.test"),
            role: role.to_string(),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Create an event owned by the given organizer.
pub async fn seed_event(
    pool: &PgPool,
    organizer_id: DbId,
    title: &str,
    is_paid: bool,
) -> campus_db::models::event::Event {
    EventRepo::create(
        pool,
        &CreateEvent {
            organizer_id,
            title: title.to_string(),
            venue: Some("Auditorium".into()),
            starts_at: Utc::now() + Duration::hours(2),
            ends_at: Utc::now() + Duration::hours(4),
            is_paid,
        },
    )
    .await
    .expect("event creation should succeed")
}
