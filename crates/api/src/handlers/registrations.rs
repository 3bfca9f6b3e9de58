//! Handlers for registration: the two issuer triggers.
//!
//! Free events confirm synchronously at registration time and mint the
//! ticket in the same request. Paid events register as pending; the
//! payment-success callback hits the confirm endpoint, which performs the
//! guarded pending->confirmed transition and then mints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use campus_core::error::CoreError;
use campus_core::types::DbId;
use campus_db::models::registration::{Registration, RegistrationStatus};
use campus_db::models::ticket::Ticket;
use campus_db::repositories::{EventRepo, RegistrationRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::ticketing;

/// Response for registration and confirmation endpoints.
///
/// `ticket` serializes without its token; clients fetch the token from the
/// QR-code endpoint, which applies its own authorization.
#[derive(Debug, Serialize)]
pub struct RegistrationResponse {
    pub registration: Registration,
    pub ticket: Option<Ticket>,
}

/// POST /api/v1/events/{id}/register
///
/// Register the authenticated user for an event. Free events confirm and
/// mint immediately; paid events stay pending until payment succeeds.
pub async fn register(
    user: AuthUser,
    State(state): State<AppState>,
    Path(event_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let event = EventRepo::find_by_id(&state.pool, event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: event_id,
        }))?;

    let initial_status = if event.is_paid {
        RegistrationStatus::Pending
    } else {
        RegistrationStatus::Confirmed
    };

    let registration =
        RegistrationRepo::create(&state.pool, user.user_id, event.id, initial_status).await?;

    let ticket = if registration.is_confirmed() {
        Some(
            ticketing::issue_ticket(
                &state.pool,
                &state.codec,
                state.config.qr.validity_hours,
                &registration,
            )
            .await?,
        )
    } else {
        None
    };

    // Re-read so the response carries the bound ticket_id.
    let registration = RegistrationRepo::find_by_id(&state.pool, registration.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("registration vanished during issuance".into())
        })?;

    tracing::info!(
        registration_id = registration.id,
        event_id = event.id,
        user_id = user.user_id,
        status = %registration.status,
        "Registration created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: RegistrationResponse {
                registration,
                ticket,
            },
        }),
    ))
}

/// POST /api/v1/registrations/{id}/confirm
///
/// Payment-success callback target: transition pending->confirmed and mint
/// the ticket. Idempotent for already-confirmed registrations (returns the
/// existing ticket); cancelled registrations get 409.
pub async fn confirm(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(registration_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let registration = RegistrationRepo::find_by_id(&state.pool, registration_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Registration",
            id: registration_id,
        }))?;

    if registration.status == RegistrationStatus::Pending.as_str() {
        // Guarded transition; a concurrent confirm may win the race, in
        // which case the registration is confirmed either way.
        RegistrationRepo::confirm(&state.pool, registration.id).await?;
    } else if !registration.is_confirmed() {
        return Err(AppError::InvalidRegistrationState);
    }

    let registration = RegistrationRepo::find_by_id(&state.pool, registration.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("registration vanished during confirmation".into())
        })?;

    let ticket = ticketing::issue_ticket(
        &state.pool,
        &state.codec,
        state.config.qr.validity_hours,
        &registration,
    )
    .await?;

    tracing::info!(
        registration_id = registration.id,
        ticket_id = ticket.id,
        confirmed_by = staff.user_id,
        "Registration confirmed",
    );

    let registration = RegistrationRepo::find_by_id(&state.pool, registration.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalError("registration vanished during issuance".into())
        })?;

    Ok(Json(DataResponse {
        data: RegistrationResponse {
            registration,
            ticket: Some(ticket),
        },
    }))
}
