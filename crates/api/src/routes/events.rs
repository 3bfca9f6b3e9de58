//! Route definitions for the `/events` resource.
//!
//! Only the registration trigger lives here; event CRUD is handled by the
//! main portal service.

use axum::routing::post;
use axum::Router;

use crate::handlers::registrations;
use crate::state::AppState;

/// Routes mounted at `/events`.
///
/// ```text
/// POST   /{id}/register    -> register
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/register", post(registrations::register))
}
