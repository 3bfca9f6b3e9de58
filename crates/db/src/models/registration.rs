//! Registration model and status constants.
//!
//! A registration is the issuer's trigger source: once it reaches
//! `confirmed` (synchronously for free events, after the payment-success
//! callback for paid ones) exactly one ticket is minted for it.

use campus_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Registration lifecycle states, stored as TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl RegistrationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RegistrationStatus::Pending => "pending",
            RegistrationStatus::Confirmed => "confirmed",
            RegistrationStatus::Cancelled => "cancelled",
        }
    }
}

/// A row from the `registrations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Registration {
    pub id: DbId,
    pub user_id: DbId,
    pub event_id: DbId,
    /// One of [`RegistrationStatus`].
    pub status: String,
    /// Set once the issuer binds a minted ticket back onto the registration.
    pub ticket_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl Registration {
    pub fn is_confirmed(&self) -> bool {
        self.status == RegistrationStatus::Confirmed.as_str()
    }
}
