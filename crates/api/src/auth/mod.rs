//! Authentication primitives.
//!
//! - [`jwt`] -- JWT access-token generation and validation.
//!
//! There are no login or session endpoints in this service; it validates
//! tokens issued by the campus identity service.

pub mod jwt;
