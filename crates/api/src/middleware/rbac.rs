//! Role-based access control extractors.
//!
//! Wraps [`CurrentSession`] and checks the session role against an
//! allow-list, ignoring case. The status distinction is deliberate: a
//! resolution failure stays 401 (no valid identity), a role mismatch is
//! 403 (valid identity, insufficient privilege).

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use rideline_core::error::CoreError;
use rideline_core::roles::{role_allowed, ROLE_ADMIN, ROLE_SUPERADMIN};

use super::auth::CurrentSession;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the Admin or SuperAdmin role.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(current): RequireAdmin) -> AppResult<Json<()>> {
///     // current.session.role is Admin or SuperAdmin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub CurrentSession);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let current = CurrentSession::from_request_parts(parts, state).await?;
        if !role_allowed(&current.session.role, &[ROLE_ADMIN, ROLE_SUPERADMIN]) {
            return Err(AppError::Core(CoreError::forbidden()));
        }
        Ok(RequireAdmin(current))
    }
}
