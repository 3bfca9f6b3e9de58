//! Registration->Ticket issuer.
//!
//! Mints exactly one ticket when a registration becomes confirmed: free
//! events confirm synchronously at registration time, paid events on the
//! payment-success callback. Uniqueness is enforced by
//! `uq_tickets_registration_id`; a lost race or repeat call returns the
//! existing ticket instead of erroring.

use chrono::Utc;

use campus_core::error::CoreError;
use campus_core::token::{TicketCodec, TokenPayload};
use campus_db::models::registration::Registration;
use campus_db::models::ticket::{CreateTicket, Ticket};
use campus_db::repositories::{EventRepo, RegistrationRepo, TicketRepo};
use campus_db::DbPool;

use crate::error::{AppError, AppResult};

/// Mint a ticket for a confirmed registration.
///
/// The ticket id is pre-allocated from the table's sequence so the signed
/// token can embed it, then the row is inserted with that explicit id and
/// bound back onto the registration.
///
/// Idempotent: issuing twice for the same registration yields exactly one
/// ticket row, and the second call returns the existing ticket.
pub async fn issue_ticket(
    pool: &DbPool,
    codec: &TicketCodec,
    validity_hours: i64,
    registration: &Registration,
) -> AppResult<Ticket> {
    let event = EventRepo::find_by_id(pool, registration.event_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Event",
            id: registration.event_id,
        }))?;

    if !registration.is_confirmed() {
        return Err(AppError::InvalidRegistrationState);
    }

    // Fast path for repeat calls; the unique constraint below is the real guard.
    if let Some(existing) = TicketRepo::find_by_registration(pool, registration.id).await? {
        return Ok(existing);
    }

    let ticket_id = TicketRepo::next_id(pool).await?;
    let payload = TokenPayload {
        ticket_id,
        event_id: event.id,
        exp: Utc::now().timestamp_millis() + validity_hours * 60 * 60 * 1000,
    };
    let token = codec.encode(&payload);

    let created = TicketRepo::create(
        pool,
        &CreateTicket {
            id: ticket_id,
            user_id: registration.user_id,
            event_id: event.id,
            registration_id: registration.id,
            token,
        },
    )
    .await;

    match created {
        Ok(ticket) => {
            RegistrationRepo::bind_ticket(pool, registration.id, ticket.id).await?;
            tracing::info!(
                ticket_id = ticket.id,
                registration_id = registration.id,
                event_id = event.id,
                user_id = registration.user_id,
                "Ticket issued",
            );
            Ok(ticket)
        }
        Err(err) if is_unique_violation(&err, "uq_tickets_registration_id") => {
            // Lost a concurrent race; the winner's ticket is authoritative.
            tracing::info!(
                registration_id = registration.id,
                "Ticket already issued, returning existing",
            );
            TicketRepo::find_by_registration(pool, registration.id)
                .await?
                .ok_or_else(|| {
                    AppError::InternalError(format!(
                        "unique violation for registration {} but no ticket row found",
                        registration.id
                    ))
                })
        }
        Err(err) => Err(err.into()),
    }
}

/// True when `err` is a Postgres 23505 on the named constraint.
fn is_unique_violation(err: &sqlx::Error, constraint: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            db_err.code().as_deref() == Some("23505") && db_err.constraint() == Some(constraint)
        }
        _ => false,
    }
}
