pub mod checkin;
pub mod events;
pub mod health;
pub mod registrations;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /check-in/scan                 validate token, check in (organizer/admin)
/// /check-in/manual               check in by ticket id (organizer/admin)
/// /check-in/history?event_id=    per-event audit log (owning organizer/admin)
///
/// /tickets/{id}/qrcode           signed token (owner/organizer/admin)
///
/// /events/{id}/register          register; free events mint immediately
/// /registrations/{id}/confirm    payment-success callback; mints ticket
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/check-in", checkin::router())
        .nest("/tickets", tickets::router())
        .nest("/events", events::router())
        .nest("/registrations", registrations::router())
}
