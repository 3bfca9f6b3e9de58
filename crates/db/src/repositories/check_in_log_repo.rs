//! Repository for the `check_in_logs` table.
//!
//! Append-only: this repository exposes insert and read operations only.
//! Log rows are never mutated or deleted.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::check_in_log::{CheckInLog, CheckInLogEntry};
use crate::models::ticket::CheckInMethod;

/// Column list for `check_in_logs` SELECT queries.
const COLUMNS: &str = "id, ticket_id, scanner_id, method, timestamp";

/// Maximum page size for history listing.
const MAX_LIMIT: i64 = 200;

/// Default page size for history listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides append and per-event listing for check-in logs.
pub struct CheckInLogRepo;

impl CheckInLogRepo {
    /// Append one log row for a completed check-in transition.
    pub async fn append(
        pool: &PgPool,
        ticket_id: DbId,
        scanner_id: Option<DbId>,
        method: CheckInMethod,
    ) -> Result<CheckInLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO check_in_logs (ticket_id, scanner_id, method) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CheckInLog>(&query)
            .bind(ticket_id)
            .bind(scanner_id)
            .bind(method.as_str())
            .fetch_one(pool)
            .await
    }

    /// List log entries for an event, newest-first, joined with attendee
    /// display columns.
    pub async fn list_for_event(
        pool: &PgPool,
        event_id: DbId,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<CheckInLogEntry>, sqlx::Error> {
        let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = offset.unwrap_or(0).max(0);

        sqlx::query_as::<_, CheckInLogEntry>(
            "SELECT l.id, l.ticket_id, l.scanner_id, l.method, l.timestamp, \
                    u.name AS attendee_name, u.email AS attendee_email \
             FROM check_in_logs l \
             JOIN tickets t ON t.id = l.ticket_id \
             JOIN users u ON u.id = t.user_id \
             WHERE t.event_id = $1 \
             ORDER BY l.timestamp DESC, l.id DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(event_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Count log entries for an event (pagination metadata).
    pub async fn count_for_event(pool: &PgPool, event_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT \
             FROM check_in_logs l \
             JOIN tickets t ON t.id = l.ticket_id \
             WHERE t.event_id = $1",
        )
        .bind(event_id)
        .fetch_one(pool)
        .await
    }
}
