use std::sync::Arc;

use campus_core::token::TicketCodec;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: campus_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Ticket token codec, built once at startup from `QrConfig`. The secret
    /// is read-only after construction and shared by all concurrent
    /// verifications without locking.
    pub codec: Arc<TicketCodec>,
}
