//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts

pub mod check_in_log;
pub mod event;
pub mod registration;
pub mod ticket;
pub mod user;
