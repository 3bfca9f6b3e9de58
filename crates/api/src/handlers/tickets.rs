//! Handlers for the `/tickets` resource.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use campus_core::error::CoreError;
use campus_core::roles::ROLE_ADMIN;
use campus_core::types::DbId;
use campus_db::repositories::{EventRepo, TicketRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Response body for `GET /tickets/{id}/qrcode`.
#[derive(Debug, Serialize)]
pub struct QrCodeResponse {
    /// The signed token, for QR rendering or manual entry.
    pub token: String,
}

/// GET /api/v1/tickets/{id}/qrcode
///
/// Return the ticket's signed token. Allowed for the ticket's owner, the
/// event's organizer, or an admin; everyone else gets 403.
pub async fn get_qrcode(
    user: AuthUser,
    State(state): State<AppState>,
    Path(ticket_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ticket = TicketRepo::find_by_id(&state.pool, ticket_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id: ticket_id,
        }))?;

    let authorized = user.role == ROLE_ADMIN
        || ticket.user_id == user.user_id
        || is_event_organizer(&state, ticket.event_id, user.user_id).await?;
    if !authorized {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not authorized to view this ticket's QR code".into(),
        )));
    }

    Ok(Json(DataResponse {
        data: QrCodeResponse {
            token: ticket.token,
        },
    }))
}

async fn is_event_organizer(
    state: &AppState,
    event_id: DbId,
    user_id: DbId,
) -> AppResult<bool> {
    let event = EventRepo::find_by_id(&state.pool, event_id).await?;
    Ok(event.is_some_and(|e| e.organizer_id == user_id))
}
