//! Domain error taxonomy.
//!
//! Deliberately small: this service surfaces most failure detail through
//! dedicated API-level variants (invalid token, event mismatch, registration
//! state) and maps database conflicts from constraint violations. What is
//! left here is entity resolution and the two authorization outcomes.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}
