use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use campus_core::error::CoreError;
use campus_core::types::DbId;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific and
/// check-in-specific variants. Implements [`IntoResponse`] to produce
/// consistent `{error, code}` JSON bodies.
///
/// Codec-level failure detail (bad signature vs. expired vs. malformed)
/// never appears here: the check-in engine collapses every [`TokenError`]
/// variant into [`AppError::InvalidQr`] so forgery attempts get no
/// diagnostic feedback. The distinction survives only in internal logs.
///
/// [`TokenError`]: campus_core::token::TokenError
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `campus_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A token the codec refused, for any reason.
    #[error("Invalid or expired QR code")]
    InvalidQr,

    /// A verified token presented against the wrong event.
    #[error("Ticket does not belong to this event")]
    EventMismatch,

    /// A verified token referencing a ticket that does not exist. A hard
    /// failure, not idempotent-success: it indicates corruption or a
    /// forged/recycled id.
    #[error("Ticket {0} not found")]
    TicketNotFound(DbId),

    /// A registration that is not in a confirmable state.
    #[error("Registration is not in a confirmable state")]
    InvalidRegistrationState,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
            },

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- Check-in errors ---
            AppError::InvalidQr => (
                StatusCode::BAD_REQUEST,
                "INVALID_QR",
                "Invalid or expired QR code".to_string(),
            ),
            AppError::EventMismatch => (
                StatusCode::BAD_REQUEST,
                "EVENT_MISMATCH",
                "Ticket does not belong to this event".to_string(),
            ),
            AppError::TicketNotFound(id) => (
                StatusCode::NOT_FOUND,
                "TICKET_NOT_FOUND",
                format!("Ticket {id} not found"),
            ),
            AppError::InvalidRegistrationState => (
                StatusCode::CONFLICT,
                "INVALID_REGISTRATION_STATE",
                "Registration is not in a confirmable state".to_string(),
            ),

            // --- HTTP-specific errors ---
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}
