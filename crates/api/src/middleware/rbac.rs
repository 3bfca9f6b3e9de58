//! Role-based access control (RBAC) extractors.
//!
//! [`RequireStaff`] wraps [`AuthUser`] and rejects requests whose role does
//! not meet the minimum requirement, enforcing authorization at the type
//! level. Resource-level checks (does this organizer own this event, does
//! this student own this ticket) stay in the handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use campus_core::error::CoreError;
use campus_core::roles::{ROLE_ADMIN, ROLE_ORGANIZER};

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires `organizer` or `admin` role -- the scanner-facing endpoints.
/// Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn staff_only(RequireStaff(user): RequireStaff) -> AppResult<Json<()>> {
///     // user is guaranteed organizer or admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN && user.role != ROLE_ORGANIZER {
            return Err(AppError::Core(CoreError::Forbidden(
                "Organizer or Admin role required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
