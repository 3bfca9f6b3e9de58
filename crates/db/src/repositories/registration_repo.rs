//! Repository for the `registrations` table.
//!
//! The pending->confirmed transition is a conditional UPDATE checked by
//! affected-row count, so a duplicate payment callback cannot confirm twice.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::registration::{Registration, RegistrationStatus};

/// Column list for `registrations` SELECT queries.
const COLUMNS: &str = "id, user_id, event_id, status, ticket_id, created_at";

pub struct RegistrationRepo;

impl RegistrationRepo {
    /// Create a registration in the given initial status.
    ///
    /// Free events register directly as `Confirmed`; paid events start
    /// `Pending` until the payment-success callback. A duplicate
    /// (user, event) pair violates `uq_registrations_user_event`.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        event_id: DbId,
        status: RegistrationStatus,
    ) -> Result<Registration, sqlx::Error> {
        let query = format!(
            "INSERT INTO registrations (user_id, event_id, status) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Registration>(&query)
            .bind(user_id)
            .bind(event_id)
            .bind(status.as_str())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Registration>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM registrations WHERE id = $1");
        sqlx::query_as::<_, Registration>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Transition `pending -> confirmed`. Returns `false` when the
    /// registration was not pending (already confirmed, cancelled, or
    /// missing) -- the guard is in the UPDATE, not in caller logic.
    pub async fn confirm(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE registrations SET status = $2 WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(RegistrationStatus::Confirmed.as_str())
        .bind(RegistrationStatus::Pending.as_str())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bind a minted ticket's id back onto its registration.
    pub async fn bind_ticket(
        pool: &PgPool,
        id: DbId,
        ticket_id: DbId,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE registrations SET ticket_id = $2 WHERE id = $1")
            .bind(id)
            .bind(ticket_id)
            .execute(pool)
            .await?;
        Ok(())
    }
}
