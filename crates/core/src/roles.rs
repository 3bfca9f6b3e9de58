//! Role name constants used by the RBAC extractors.

/// Full administrative access, including any event's check-in data.
pub const ROLE_ADMIN: &str = "admin";

/// May create events and operate the check-in scanner for owned events.
pub const ROLE_ORGANIZER: &str = "organizer";
