//! Handlers for the `/check-in` resource: QR scan, manual entry, and the
//! per-event check-in history.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use campus_core::error::CoreError;
use campus_core::roles::ROLE_ADMIN;
use campus_core::types::DbId;
use campus_db::models::check_in_log::CheckInLogEntry;
use campus_db::models::ticket::CheckInMethod;
use campus_db::repositories::{CheckInLogRepo, EventRepo};

use crate::checkin;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /check-in/scan`.
#[derive(Debug, Deserialize)]
pub struct ScanRequest {
    pub token: String,
    /// When the scanner UI is bound to one event, tokens for any other
    /// event are rejected with `EVENT_MISMATCH`.
    pub event_id: Option<DbId>,
}

/// Request body for `POST /check-in/manual`.
#[derive(Debug, Deserialize)]
pub struct ManualCheckInRequest {
    pub ticket_id: DbId,
    pub event_id: Option<DbId>,
}

/// Query parameters for `GET /check-in/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub event_id: DbId,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response body for `GET /check-in/history`.
#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub entries: Vec<CheckInLogEntry>,
    pub total: i64,
}

/// POST /api/v1/check-in/scan
///
/// Validate a scanned token and check the ticket in. A duplicate scan
/// returns 200 with `already_checked_in: true` and the original timestamp.
pub async fn scan(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<ScanRequest>,
) -> AppResult<impl IntoResponse> {
    let result = checkin::scan(
        &state,
        &input.token,
        staff.user_id,
        input.event_id,
        CheckInMethod::Qr,
    )
    .await?;

    Ok(Json(DataResponse { data: result }))
}

/// POST /api/v1/check-in/manual
///
/// Check in by raw ticket id. Feeds the ticket's stored token through the
/// same pipeline as a scan.
pub async fn manual(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<ManualCheckInRequest>,
) -> AppResult<impl IntoResponse> {
    let result =
        checkin::manual_check_in(&state, input.ticket_id, staff.user_id, input.event_id).await?;

    Ok(Json(DataResponse { data: result }))
}

/// GET /api/v1/check-in/history?event_id=
///
/// Newest-first check-in log for one event. Only the event's organizer or
/// an admin may list it.
pub async fn history(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_by_id(&state.pool, query.event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: query.event_id,
        }))?;

    if staff.role != ROLE_ADMIN && event.organizer_id != staff.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only the event's organizer may view its check-in history".into(),
        )));
    }

    let entries =
        CheckInLogRepo::list_for_event(&state.pool, event.id, query.limit, query.offset).await?;
    let total = CheckInLogRepo::count_for_event(&state.pool, event.id).await?;

    Ok(Json(DataResponse {
        data: HistoryResponse { entries, total },
    }))
}
