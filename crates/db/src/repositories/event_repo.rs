//! Repository for the `events` table. The check-in service treats events as
//! an external collaborator: it creates them for organizers and looks them
//! up for ownership checks and token cross-checks.

use sqlx::PgPool;

use campus_core::types::DbId;

use crate::models::event::{CreateEvent, Event};

/// Column list for `events` SELECT queries.
const COLUMNS: &str = "\
    id, organizer_id, title, venue, starts_at, ends_at, is_paid, created_at";

pub struct EventRepo;

impl EventRepo {
    pub async fn create(pool: &PgPool, input: &CreateEvent) -> Result<Event, sqlx::Error> {
        let query = format!(
            "INSERT INTO events (organizer_id, title, venue, starts_at, ends_at, is_paid) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Event>(&query)
            .bind(input.organizer_id)
            .bind(&input.title)
            .bind(&input.venue)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .bind(input.is_paid)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Event>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM events WHERE id = $1");
        sqlx::query_as::<_, Event>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
