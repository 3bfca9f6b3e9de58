//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument.

pub mod check_in_log_repo;
pub mod event_repo;
pub mod registration_repo;
pub mod ticket_repo;
pub mod user_repo;

pub use check_in_log_repo::CheckInLogRepo;
pub use event_repo::EventRepo;
pub use registration_repo::RegistrationRepo;
pub use ticket_repo::TicketRepo;
pub use user_repo::UserRepo;
