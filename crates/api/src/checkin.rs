//! Check-in engine.
//!
//! Validates a scanned token and performs the safe, idempotent check-in.
//! State machine per ticket: `ISSUED -> CHECKED_IN`, terminal. No transition
//! back, no transition on failure.
//!
//! The state transition itself lives in [`TicketRepo::check_in`] as a single
//! atomic conditional UPDATE; this module never reads check-in state before
//! writing it. Under two concurrent scans of the same fresh ticket exactly
//! one caller observes the first-use path; the other gets the idempotent
//! duplicate shape with the winner's timestamp.

use serde::Serialize;

use campus_core::types::{DbId, Timestamp};
use campus_db::models::ticket::{CheckInMethod, Ticket};
use campus_db::repositories::{CheckInLogRepo, TicketRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Outcome of a scan, shaped for the organizer's scan station.
///
/// `already_checked_in: true` is a successful, non-alarming outcome
/// (nervous staff re-scanning, flaky network retries), never an error.
#[derive(Debug, Serialize)]
pub struct CheckInResult {
    pub already_checked_in: bool,
    pub ticket_id: DbId,
    pub checked_in_at: Timestamp,
    pub check_in_method: String,
    /// Display enrichment; omitted when the lookup fails (the lookup cannot
    /// fail the check-in itself).
    pub attendee: Option<AttendeeInfo>,
    pub event: Option<EventInfo>,
}

#[derive(Debug, Serialize)]
pub struct AttendeeInfo {
    pub id: DbId,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct EventInfo {
    pub id: DbId,
    pub title: String,
}

/// Validate a raw token and check the ticket in.
///
/// Pipeline: reject blank input; decode via the codec (any failure collapses
/// to `InvalidQr` -- no store access, no log write); resolve the ticket;
/// cross-check the embedded event against the ticket row and, when given,
/// the scanner's event scope; then attempt the atomic transition.
///
/// On the first-use path exactly one audit log row is appended after the
/// transition commits; a log-write failure is surfaced to operational
/// logging but never rolls back or fails the check-in. Duplicate scans are
/// not logged; only the winning transition produces an audit row.
pub async fn scan(
    state: &AppState,
    raw_token: &str,
    scanner_id: DbId,
    event_scope: Option<DbId>,
    method: CheckInMethod,
) -> AppResult<CheckInResult> {
    if raw_token.trim().is_empty() {
        return Err(AppError::InvalidQr);
    }

    let payload = state.codec.decode(raw_token).map_err(|err| {
        // The variant stays internal; the caller sees one generic message.
        tracing::debug!(error = %err, "Token rejected by codec");
        AppError::InvalidQr
    })?;

    let ticket = TicketRepo::find_by_id(&state.pool, payload.ticket_id)
        .await?
        .ok_or(AppError::TicketNotFound(payload.ticket_id))?;

    // A token for event A must not check in against event B, even though
    // both decode successfully under the same secret.
    if payload.event_id != ticket.event_id {
        return Err(AppError::EventMismatch);
    }
    if let Some(scope) = event_scope {
        if scope != ticket.event_id {
            return Err(AppError::EventMismatch);
        }
    }

    match TicketRepo::check_in(&state.pool, ticket.id, method).await? {
        Some(updated) => {
            if let Err(err) =
                CheckInLogRepo::append(&state.pool, updated.id, Some(scanner_id), method).await
            {
                tracing::error!(
                    ticket_id = updated.id,
                    error = %err,
                    "Check-in log append failed after committed transition",
                );
            }

            tracing::info!(
                ticket_id = updated.id,
                event_id = updated.event_id,
                scanner_id,
                method = method.as_str(),
                "Ticket checked in",
            );

            build_result(state, &updated, false).await
        }
        None => {
            // Lost to an earlier scan. Re-read for the winner's timestamp
            // and respond success-shaped; no second log row.
            let current = TicketRepo::find_by_id(&state.pool, ticket.id)
                .await?
                .ok_or(AppError::TicketNotFound(ticket.id))?;

            tracing::info!(
                ticket_id = current.id,
                scanner_id,
                "Duplicate scan of checked-in ticket",
            );

            build_result(state, &current, true).await
        }
    }
}

/// Shape a checked-in ticket into a [`CheckInResult`], enriching with
/// attendee/event display data. Enrichment errors degrade to omitted fields.
async fn build_result(
    state: &AppState,
    ticket: &Ticket,
    already_checked_in: bool,
) -> AppResult<CheckInResult> {
    let checked_in_at = ticket.checked_in_at.ok_or_else(|| {
        AppError::InternalError(format!(
            "ticket {} reached result shaping without checked_in_at",
            ticket.id
        ))
    })?;
    let check_in_method = ticket.check_in_method.clone().ok_or_else(|| {
        AppError::InternalError(format!(
            "ticket {} reached result shaping without check_in_method",
            ticket.id
        ))
    })?;

    let context = match TicketRepo::find_context(&state.pool, ticket.id).await {
        Ok(ctx) => ctx,
        Err(err) => {
            tracing::warn!(
                ticket_id = ticket.id,
                error = %err,
                "Scan response enrichment failed, omitting display fields",
            );
            None
        }
    };

    let (attendee, event) = match context {
        Some(ctx) => (
            Some(AttendeeInfo {
                id: ctx.attendee_id,
                name: ctx.attendee_name,
                email: ctx.attendee_email,
            }),
            Some(EventInfo {
                id: ctx.event_id,
                title: ctx.event_title,
            }),
        ),
        None => (None, None),
    };

    Ok(CheckInResult {
        already_checked_in,
        ticket_id: ticket.id,
        checked_in_at,
        check_in_method,
        attendee,
        event,
    })
}

/// Check in by raw ticket id: resolve the ticket's stored token and feed it
/// through the exact same [`scan`] pipeline with method `manual`. There is
/// intentionally no separate state-transition code path for manual entry.
pub async fn manual_check_in(
    state: &AppState,
    ticket_id: DbId,
    scanner_id: DbId,
    event_scope: Option<DbId>,
) -> AppResult<CheckInResult> {
    let ticket = TicketRepo::find_by_id(&state.pool, ticket_id)
        .await?
        .ok_or(AppError::TicketNotFound(ticket_id))?;

    scan(
        state,
        &ticket.token,
        scanner_id,
        event_scope,
        CheckInMethod::Manual,
    )
    .await
}
