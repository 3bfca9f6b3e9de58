//! HTTP handlers. Thin: authorization and input shaping here, domain logic
//! in [`crate::checkin`] and [`crate::ticketing`].

pub mod checkin;
pub mod registrations;
pub mod tickets;
