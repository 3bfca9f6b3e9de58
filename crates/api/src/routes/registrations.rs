//! Route definitions for the `/registrations` resource.

use axum::routing::post;
use axum::Router;

use crate::handlers::registrations;
use crate::state::AppState;

/// Routes mounted at `/registrations`.
///
/// ```text
/// POST   /{id}/confirm    -> confirm
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/confirm", post(registrations::confirm))
}
