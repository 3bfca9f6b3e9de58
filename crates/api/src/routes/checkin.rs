//! Route definitions for the `/check-in` resource.
//!
//! All endpoints require organizer or admin role.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::checkin;
use crate::state::AppState;

/// Routes mounted at `/check-in`.
///
/// ```text
/// POST   /scan       -> scan
/// POST   /manual     -> manual
/// GET    /history    -> history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scan", post(checkin::scan))
        .route("/manual", post(checkin::manual))
        .route("/history", get(checkin::history))
}
