//! Route definitions for the `/tickets` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// Routes mounted at `/tickets`.
///
/// ```text
/// GET    /{id}/qrcode    -> get_qrcode
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}/qrcode", get(tickets::get_qrcode))
}
