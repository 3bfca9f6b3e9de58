//! Campus Connect check-in API server library.
//!
//! Exposes the building blocks (config, state, error handling, the check-in
//! engine and ticket issuer, routes) so integration tests and the binary
//! entrypoint can both access them.

pub mod auth;
pub mod checkin;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod ticketing;
