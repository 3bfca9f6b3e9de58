//! Event model. Minimal collaborator record -- full event CRUD is handled
//! elsewhere; the check-in service only needs ownership and display columns.

use campus_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Event {
    pub id: DbId,
    pub organizer_id: DbId,
    pub title: String,
    pub venue: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    /// Paid events confirm registrations only after payment success.
    pub is_paid: bool,
    pub created_at: Timestamp,
}

/// DTO for creating an event.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEvent {
    pub organizer_id: DbId,
    pub title: String,
    pub venue: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub is_paid: bool,
}
