//! Repository for the `tickets` table.
//!
//! The check-in transition is a single atomic conditional UPDATE guarded by
//! `checked_in_at IS NULL`. A read-then-write sequence here would open a
//! race window between two concurrent scans of the same ticket; the guard
//! in the UPDATE itself is a correctness requirement, not an optimization.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::ticket::{CheckInMethod, CreateTicket, Ticket, TicketContext};

/// Column list for `tickets` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, event_id, registration_id, token, \
    issued_at, checked_in_at, check_in_method";

/// Provides insert, lookup, and the check-in transition for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Pre-allocate the next ticket id from the table's sequence.
    ///
    /// The issuer embeds this id in the signed token before the row exists,
    /// then inserts with the explicit id.
    pub async fn next_id(pool: &PgPool) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT nextval(pg_get_serial_sequence('tickets', 'id'))",
        )
        .fetch_one(pool)
        .await
    }

    /// Insert a ticket with a pre-allocated id.
    ///
    /// A duplicate `registration_id` violates `uq_tickets_registration_id`;
    /// the issuer treats that as "already issued" and fetches the existing
    /// row instead.
    pub async fn create(pool: &PgPool, input: &CreateTicket) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (id, user_id, event_id, registration_id, token) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(input.id)
            .bind(input.user_id)
            .bind(input.event_id)
            .bind(input.registration_id)
            .bind(&input.token)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the ticket minted for a registration, if any.
    pub async fn find_by_registration(
        pool: &PgPool,
        registration_id: DbId,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE registration_id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(registration_id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically perform the `ISSUED -> CHECKED_IN` transition.
    ///
    /// Exactly one of N concurrent calls against a fresh ticket gets the
    /// updated row back; every other call gets `None` because the
    /// `checked_in_at IS NULL` guard no longer matches.
    pub async fn check_in(
        pool: &PgPool,
        ticket_id: DbId,
        method: CheckInMethod,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets \
             SET checked_in_at = NOW(), check_in_method = $2 \
             WHERE id = $1 AND checked_in_at IS NULL \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(ticket_id)
            .bind(method.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Fetch attendee and event display columns for the scan response.
    pub async fn find_context(
        pool: &PgPool,
        ticket_id: DbId,
    ) -> Result<Option<TicketContext>, sqlx::Error> {
        sqlx::query_as::<_, TicketContext>(
            "SELECT t.id AS ticket_id, t.event_id, \
                    u.id AS attendee_id, u.name AS attendee_name, u.email AS attendee_email, \
                    e.title AS event_title \
             FROM tickets t \
             JOIN users u ON u.id = t.user_id \
             JOIN events e ON e.id = t.event_id \
             WHERE t.id = $1",
        )
        .bind(ticket_id)
        .fetch_optional(pool)
        .await
    }

    /// Count tickets minted for a registration (test support for the
    /// one-ticket-per-registration invariant).
    pub async fn count_for_registration(
        pool: &PgPool,
        registration_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*)::BIGINT FROM tickets WHERE registration_id = $1",
        )
        .bind(registration_id)
        .fetch_one(pool)
        .await
    }
}
