//! Check-in audit log models.
//!
//! The `check_in_logs` table is append-only: the repository exposes no
//! update or delete operations, and none may be added. Log rows are evidence
//! of check-in activity independent of the ticket's current state.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `check_in_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CheckInLog {
    pub id: DbId,
    pub ticket_id: DbId,
    /// The staff user who performed the scan, when known.
    pub scanner_id: Option<DbId>,
    /// `"qr"` or `"manual"`.
    pub method: String,
    pub timestamp: Timestamp,
}

/// Log row joined with attendee display columns, for the history listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CheckInLogEntry {
    pub id: DbId,
    pub ticket_id: DbId,
    pub scanner_id: Option<DbId>,
    pub method: String,
    pub timestamp: Timestamp,
    pub attendee_name: String,
    pub attendee_email: String,
}
