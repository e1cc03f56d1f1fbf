//! Session-resolving authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use rideline_core::error::CoreError;
use rideline_core::session::Session;

use crate::cookie;
use crate::error::AppError;
use crate::state::AppState;

/// The live session behind an inbound request.
///
/// Resolution order: `session_id` cookie, then `Authorization: Bearer`.
/// A missing or unresolvable token rejects with 401; a cache transport
/// failure rejects with 500 (the request has no way to prove identity,
/// but the client did nothing wrong).
///
/// Resolving also enqueues a non-blocking last-active touch for the
/// session's metadata row; the handler never waits on it.
///
/// ```ignore
/// async fn my_handler(current: CurrentSession) -> AppResult<Json<()>> {
///     tracing::info!(user_id = current.session.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentSession {
    /// The cache-resident session payload.
    pub session: Session,
    /// The raw token the client presented. Needed by the session
    /// management endpoints to compute "is this the current session".
    pub token: String,
}

impl FromRequestParts<AppState> for CurrentSession {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = cookie::session_token(&parts.headers)
            .ok_or_else(|| AppError::Core(CoreError::unauthorized()))?;

        let session = state.auth.session(&token).await?;

        state.touch.record(&token);

        Ok(CurrentSession { session, token })
    }
}
