//! Campus Connect core domain logic.
//!
//! Pure domain types and the ticket token codec. This crate has no database
//! or HTTP dependencies so the codec can be tested with an arbitrary secret.

pub mod error;
pub mod roles;
pub mod token;
pub mod types;
