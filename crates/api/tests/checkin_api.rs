//! HTTP-level integration tests for the scan, manual check-in, and history
//! endpoints, driven through the production router.

mod common;

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;

use campus_core::token::TokenPayload;
use campus_core::types::DbId;
use campus_db::models::registration::RegistrationStatus;
use campus_db::models::ticket::CreateTicket;
use campus_db::repositories::{RegistrationRepo, TicketRepo};

use common::{
    assert_error_code, auth_token, body_json, build_test_app, get_auth, post_json,
    post_json_auth, seed_event, seed_user, test_codec,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Register a student for an event through the API and return the minted
/// ticket's id plus its signed token (fetched from the QR-code endpoint).
async fn register_and_fetch_token(
    app: axum::Router,
    student_id: DbId,
    event_id: DbId,
) -> (DbId, String) {
    let student_token = auth_token(student_id, "student");

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/events/{event_id}/register"),
        &student_token,
        json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    let ticket_id = body["data"]["ticket"]["id"]
        .as_i64()
        .expect("free-event registration must mint a ticket");

    let response = get_auth(
        app,
        &format!("/api/v1/tickets/{ticket_id}/qrcode"),
        &student_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["data"]["token"]
        .as_str()
        .expect("qrcode endpoint must return the token")
        .to_string();

    (ticket_id, token)
}

/// Insert a ticket whose token carries an arbitrary payload, bypassing the
/// issuer. Returns the ticket id and the signed token.
async fn seed_ticket_with_payload(
    pool: &PgPool,
    user_id: DbId,
    event_id: DbId,
    payload_event_id: DbId,
    exp: i64,
) -> (DbId, String) {
    let registration =
        RegistrationRepo::create(pool, user_id, event_id, RegistrationStatus::Confirmed)
            .await
            .expect("registration creation should succeed");

    let ticket_id = TicketRepo::next_id(pool).await.expect("next_id should succeed");
    let token = test_codec().encode(&TokenPayload {
        ticket_id,
        event_id: payload_event_id,
        exp,
    });
    TicketRepo::create(
        pool,
        &CreateTicket {
            id: ticket_id,
            user_id,
            event_id,
            registration_id: registration.id,
            token: token.clone(),
        },
    )
    .await
    .expect("ticket creation should succeed");

    (ticket_id, token)
}

async fn log_count_for_ticket(pool: &PgPool, ticket_id: DbId) -> i64 {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*)::BIGINT FROM check_in_logs WHERE ticket_id = $1",
    )
    .bind(ticket_id)
    .fetch_one(pool)
    .await
    .expect("log count query should succeed")
}

async fn checked_in_at(pool: &PgPool, ticket_id: DbId) -> Option<chrono::DateTime<Utc>> {
    TicketRepo::find_by_id(pool, ticket_id)
        .await
        .expect("ticket lookup should succeed")
        .expect("ticket must exist")
        .checked_in_at
}

fn far_future_ms() -> i64 {
    Utc::now().timestamp_millis() + 60 * 60 * 1000
}

// ---------------------------------------------------------------------------
// Authorization gates
// ---------------------------------------------------------------------------

/// Scanning without a token is 401.
#[sqlx::test(migrations = "../db/migrations")]
async fn scan_requires_authentication(pool: PgPool) {
    let app = build_test_app(pool);
    let response = post_json(app, "/api/v1/check-in/scan", json!({"token": "x"})).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

/// Students cannot operate the scanner.
#[sqlx::test(migrations = "../db/migrations")]
async fn scan_requires_staff_role(pool: PgPool) {
    let student = seed_user(&pool, "scan-student", "student").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/check-in/scan",
        &auth_token(student.id, "student"),
        json!({"token": "x"}),
    )
    .await;
    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}

// ---------------------------------------------------------------------------
// Scan pipeline
// ---------------------------------------------------------------------------

/// End-to-end: register for a free event, scan once (first-use), scan again
/// (idempotent duplicate with the same timestamp), exactly one log row.
#[sqlx::test(migrations = "../db/migrations")]
async fn free_event_scan_then_rescan(pool: PgPool) {
    let organizer = seed_user(&pool, "e2e-organizer", "organizer").await;
    let student = seed_user(&pool, "e2e-student", "student").await;
    let event = seed_event(&pool, organizer.id, "Orientation Day", false).await;
    let app = build_test_app(pool.clone());

    let (ticket_id, token) =
        register_and_fetch_token(app.clone(), student.id, event.id).await;
    assert_eq!(checked_in_at(&pool, ticket_id).await, None);

    let staff_token = auth_token(organizer.id, "organizer");

    // First scan wins.
    let response = post_json_auth(
        app.clone(),
        "/api/v1/check-in/scan",
        &staff_token,
        json!({"token": token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let first = body_json(response).await;
    assert_eq!(first["data"]["already_checked_in"], false);
    assert_eq!(first["data"]["ticket_id"], ticket_id);
    assert_eq!(first["data"]["check_in_method"], "qr");
    assert_eq!(first["data"]["attendee"]["email"], "e2e-student@campus.test");
    assert_eq!(first["data"]["event"]["title"], "Orientation Day");

    // Second scan is a non-alarming duplicate with the original timestamp.
    let response = post_json_auth(
        app,
        "/api/v1/check-in/scan",
        &staff_token,
        json!({"token": token}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = body_json(response).await;
    assert_eq!(second["data"]["already_checked_in"], true);
    assert_eq!(second["data"]["checked_in_at"], first["data"]["checked_in_at"]);

    assert_eq!(log_count_for_ticket(&pool, ticket_id).await, 1);
}

/// Structural garbage and blank tokens collapse to INVALID_QR.
#[sqlx::test(migrations = "../db/migrations")]
async fn malformed_tokens_are_invalid_qr(pool: PgPool) {
    let organizer = seed_user(&pool, "garbage-organizer", "organizer").await;
    let app = build_test_app(pool);
    let staff_token = auth_token(organizer.id, "organizer");

    for bad in ["", "   ", "not-a-token", "a.b.c"] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/check-in/scan",
            &staff_token,
            json!({"token": bad}),
        )
        .await;
        assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_QR").await;
    }
}

/// An expired token is rejected with the same generic code as a forged one,
/// and the ticket stays un-checked-in.
#[sqlx::test(migrations = "../db/migrations")]
async fn expired_token_is_invalid_qr(pool: PgPool) {
    let organizer = seed_user(&pool, "exp-organizer", "organizer").await;
    let student = seed_user(&pool, "exp-student", "student").await;
    let event = seed_event(&pool, organizer.id, "Late Night Gala", false).await;

    let expired = Utc::now().timestamp_millis() - 1000;
    let (ticket_id, token) =
        seed_ticket_with_payload(&pool, student.id, event.id, event.id, expired).await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/check-in/scan",
        &auth_token(organizer.id, "organizer"),
        json!({"token": token}),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "INVALID_QR").await;

    assert_eq!(checked_in_at(&pool, ticket_id).await, None);
    assert_eq!(log_count_for_ticket(&pool, ticket_id).await, 0);
}

/// A token whose embedded event does not match the ticket's event is
/// rejected with EVENT_MISMATCH and no state transition occurs.
#[sqlx::test(migrations = "../db/migrations")]
async fn cross_event_token_is_event_mismatch(pool: PgPool) {
    let organizer = seed_user(&pool, "mismatch-organizer", "organizer").await;
    let student = seed_user(&pool, "mismatch-student", "student").await;
    let event_a = seed_event(&pool, organizer.id, "Event A", false).await;
    let event_b = seed_event(&pool, organizer.id, "Event B", false).await;

    // Real ticket on event A, payload claiming event B.
    let (ticket_id, forged_token) =
        seed_ticket_with_payload(&pool, student.id, event_a.id, event_b.id, far_future_ms())
            .await;

    let app = build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/check-in/scan",
        &auth_token(organizer.id, "organizer"),
        json!({"token": forged_token}),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "EVENT_MISMATCH").await;

    assert_eq!(checked_in_at(&pool, ticket_id).await, None);
}

/// A scanner bound to one event rejects tickets for another event even when
/// payload and ticket row agree with each other.
#[sqlx::test(migrations = "../db/migrations")]
async fn scoped_scanner_rejects_other_event(pool: PgPool) {
    let organizer = seed_user(&pool, "scope-organizer", "organizer").await;
    let student = seed_user(&pool, "scope-student", "student").await;
    let event_a = seed_event(&pool, organizer.id, "Scoped A", false).await;
    let event_b = seed_event(&pool, organizer.id, "Scoped B", false).await;

    let app = build_test_app(pool.clone());
    let (ticket_id, token) =
        register_and_fetch_token(app.clone(), student.id, event_a.id).await;

    let response = post_json_auth(
        app,
        "/api/v1/check-in/scan",
        &auth_token(organizer.id, "organizer"),
        json!({"token": token, "event_id": event_b.id}),
    )
    .await;
    assert_error_code(response, StatusCode::BAD_REQUEST, "EVENT_MISMATCH").await;

    assert_eq!(checked_in_at(&pool, ticket_id).await, None);
}

/// A well-signed token referencing a nonexistent ticket is a hard 404, not
/// an idempotent success.
#[sqlx::test(migrations = "../db/migrations")]
async fn forged_ticket_id_is_not_found(pool: PgPool) {
    let organizer = seed_user(&pool, "forged-organizer", "organizer").await;
    let event = seed_event(&pool, organizer.id, "Forged", false).await;

    let token = test_codec().encode(&TokenPayload {
        ticket_id: 999_999,
        event_id: event.id,
        exp: far_future_ms(),
    });

    let app = build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/check-in/scan",
        &auth_token(organizer.id, "organizer"),
        json!({"token": token}),
    )
    .await;
    assert_error_code(response, StatusCode::NOT_FOUND, "TICKET_NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Manual path
// ---------------------------------------------------------------------------

/// Manual entry runs the same pipeline and records method "manual".
#[sqlx::test(migrations = "../db/migrations")]
async fn manual_check_in_records_manual_method(pool: PgPool) {
    let organizer = seed_user(&pool, "manual-organizer", "organizer").await;
    let student = seed_user(&pool, "manual-student", "student").await;
    let event = seed_event(&pool, organizer.id, "Manual Night", false).await;

    let app = build_test_app(pool.clone());
    let (ticket_id, _token) =
        register_and_fetch_token(app.clone(), student.id, event.id).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/check-in/manual",
        &auth_token(organizer.id, "organizer"),
        json!({"ticket_id": ticket_id}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["already_checked_in"], false);
    assert_eq!(body["data"]["check_in_method"], "manual");

    let stored = TicketRepo::find_by_id(&pool, ticket_id).await.unwrap().unwrap();
    assert_eq!(stored.check_in_method.as_deref(), Some("manual"));
}

/// Manual entry for an unknown ticket id is 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn manual_check_in_unknown_ticket(pool: PgPool) {
    let organizer = seed_user(&pool, "manual-404", "organizer").await;
    let app = build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/v1/check-in/manual",
        &auth_token(organizer.id, "organizer"),
        json!({"ticket_id": 424242}),
    )
    .await;
    assert_error_code(response, StatusCode::NOT_FOUND, "TICKET_NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

/// N concurrent scans through the full HTTP stack: exactly one first-use
/// response, all others duplicates with the identical timestamp, one log row.
#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_scans_have_single_winner(pool: PgPool) {
    let organizer = seed_user(&pool, "race-organizer", "organizer").await;
    let student = seed_user(&pool, "race-student", "student").await;
    let event = seed_event(&pool, organizer.id, "Rush Hour", false).await;

    let app = build_test_app(pool.clone());
    let (ticket_id, token) =
        register_and_fetch_token(app.clone(), student.id, event.id).await;
    let staff_token = auth_token(organizer.id, "organizer");

    let requests = (0..6).map(|_| {
        post_json_auth(
            app.clone(),
            "/api/v1/check-in/scan",
            &staff_token,
            json!({"token": token}),
        )
    });
    let responses = futures::future::join_all(requests).await;

    let mut winners = 0;
    let mut timestamps = Vec::new();
    for response in responses {
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        if body["data"]["already_checked_in"] == false {
            winners += 1;
        }
        timestamps.push(body["data"]["checked_in_at"].clone());
    }

    assert_eq!(winners, 1, "exactly one scan must take the first-use path");
    assert!(
        timestamps.windows(2).all(|w| w[0] == w[1]),
        "all responses must carry the winner's timestamp"
    );
    assert_eq!(log_count_for_ticket(&pool, ticket_id).await, 1);
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Only the owning organizer or an admin may list an event's history.
#[sqlx::test(migrations = "../db/migrations")]
async fn history_is_restricted_to_event_owner(pool: PgPool) {
    let owner = seed_user(&pool, "hist-owner", "organizer").await;
    let other = seed_user(&pool, "hist-other", "organizer").await;
    let admin = seed_user(&pool, "hist-admin", "admin").await;
    let student = seed_user(&pool, "hist-student", "student").await;
    let event = seed_event(&pool, owner.id, "History Night", false).await;

    let app = build_test_app(pool.clone());
    let uri = format!("/api/v1/check-in/history?event_id={}", event.id);

    let response = get_auth(app.clone(), &uri, &auth_token(student.id, "student")).await;
    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = get_auth(app.clone(), &uri, &auth_token(other.id, "organizer")).await;
    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;

    let response = get_auth(app.clone(), &uri, &auth_token(owner.id, "organizer")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(app, &uri, &auth_token(admin.id, "admin")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

/// History lists checked-in attendees newest-first with a total count.
#[sqlx::test(migrations = "../db/migrations")]
async fn history_lists_newest_first(pool: PgPool) {
    let organizer = seed_user(&pool, "order-organizer", "organizer").await;
    let student_a = seed_user(&pool, "order-a", "student").await;
    let student_b = seed_user(&pool, "order-b", "student").await;
    let event = seed_event(&pool, organizer.id, "Ordered", false).await;

    let app = build_test_app(pool.clone());
    let staff_token = auth_token(organizer.id, "organizer");

    let (_, token_a) = register_and_fetch_token(app.clone(), student_a.id, event.id).await;
    let (_, token_b) = register_and_fetch_token(app.clone(), student_b.id, event.id).await;

    for token in [&token_a, &token_b] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/check-in/scan",
            &staff_token,
            json!({"token": token}),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(
        app,
        &format!("/api/v1/check-in/history?event_id={}", event.id),
        &staff_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["total"], 2);
    let entries = body["data"]["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["attendee_email"], "order-b@campus.test");
    assert_eq!(entries[1]["attendee_email"], "order-a@campus.test");
}

/// History for an unknown event is 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn history_unknown_event(pool: PgPool) {
    let admin = seed_user(&pool, "hist-404", "admin").await;
    let app = build_test_app(pool);

    let response = get_auth(
        app,
        "/api/v1/check-in/history?event_id=999999",
        &auth_token(admin.id, "admin"),
    )
    .await;
    assert_error_code(response, StatusCode::NOT_FOUND, "NOT_FOUND").await;
}

// ---------------------------------------------------------------------------
// QR-code endpoint authorization
// ---------------------------------------------------------------------------

/// Owner, owning organizer, and admin may fetch the token; strangers may not.
#[sqlx::test(migrations = "../db/migrations")]
async fn qrcode_authorization(pool: PgPool) {
    let organizer = seed_user(&pool, "qr-organizer", "organizer").await;
    let student = seed_user(&pool, "qr-student", "student").await;
    let stranger = seed_user(&pool, "qr-stranger", "student").await;
    let admin = seed_user(&pool, "qr-admin", "admin").await;
    let event = seed_event(&pool, organizer.id, "QR Night", false).await;

    let app = build_test_app(pool.clone());
    let (ticket_id, _) =
        register_and_fetch_token(app.clone(), student.id, event.id).await;
    let uri = format!("/api/v1/tickets/{ticket_id}/qrcode");

    for (user_id, role) in [
        (student.id, "student"),
        (organizer.id, "organizer"),
        (admin.id, "admin"),
    ] {
        let response = get_auth(app.clone(), &uri, &auth_token(user_id, role)).await;
        assert_eq!(response.status(), StatusCode::OK, "role {role} must be allowed");
    }

    let response = get_auth(app, &uri, &auth_token(stranger.id, "student")).await;
    assert_error_code(response, StatusCode::FORBIDDEN, "FORBIDDEN").await;
}
