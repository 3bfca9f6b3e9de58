//! Ticket model and DTOs.
//!
//! One ticket per confirmed registration, enforced by
//! `uq_tickets_registration_id`. The token, once issued, is immutable; a
//! ticket is mutated exactly once in its life (the check-in transition) and
//! never deleted -- it remains as the permanent attendance record.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// How a ticket was checked in, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckInMethod {
    Qr,
    Manual,
}

impl CheckInMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckInMethod::Qr => "qr",
            CheckInMethod::Manual => "manual",
        }
    }
}

/// A row from the `tickets` table.
///
/// **Note:** `token` is never serialized into responses; it is handed out
/// only by the dedicated QR-code endpoint after its own authorization check.
///
/// Invariant (also a CHECK constraint): `checked_in_at` and
/// `check_in_method` are both null or both set.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    pub registration_id: DbId,
    #[serde(skip_serializing)]
    pub token: String,
    pub issued_at: Timestamp,
    /// Null means "not yet used".
    pub checked_in_at: Option<Timestamp>,
    /// One of [`CheckInMethod`]; set only when checked in.
    pub check_in_method: Option<String>,
}

/// DTO for inserting a ticket.
///
/// The id is pre-allocated from the table's sequence so the signed token can
/// embed it before the row exists.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    pub registration_id: DbId,
    pub token: String,
}

/// Ticket joined with attendee and event display columns, for the scan
/// station response.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketContext {
    pub ticket_id: DbId,
    pub event_id: DbId,
    pub attendee_id: DbId,
    pub attendee_name: String,
    pub attendee_email: String,
    pub event_title: String,
}
