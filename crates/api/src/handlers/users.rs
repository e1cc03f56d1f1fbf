//! Admin user-management handlers.
//!
//! All routes here sit behind [`RequireAdmin`]. SuperAdmin rows are
//! specially protected: nobody, SuperAdmins included, may change their
//! role or status or delete them, and only a SuperAdmin may promote
//! anyone to the SuperAdmin tier.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use rideline_core::error::CoreError;
use rideline_core::roles::{is_superadmin, ROLE_USER};
use rideline_core::types::DbId;
use rideline_db::models::user::{CreateUser, UpdateUser, UserProfile};
use rideline_db::repositories::UserRepo;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::state::AppState;

/// Minimum accepted password length.
const MIN_PASSWORD_LEN: usize = 8;

/// Account status values the API accepts.
const VALID_STATUSES: &[&str] = &["active", "inactive", "expired", "closed"];

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to the base user tier.
    pub role: Option<String>,
    pub phone: Option<String>,
}

/// Request body for `PUT /api/users/{id}`. Absent fields are untouched.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub phone: Option<String>,
    pub status: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/users
pub async fn list(
    RequireAdmin(_current): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UserProfile>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    RequireAdmin(_current): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserProfile>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user" }))?;
    Ok(Json(user.into()))
}

/// POST /api/users
///
/// Create an account. Unique-constraint violations on username or email
/// surface as 409.
pub async fn create(
    RequireAdmin(current): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    if input.username.is_empty() || input.email.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "username, email, and password are required".into(),
        )));
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LEN)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = input.role.unwrap_or_else(|| ROLE_USER.to_string());
    if is_superadmin(&role) && !is_superadmin(&current.session.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "only SuperAdmin can create SuperAdmin users".into(),
        )));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("password hash error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role,
            phone: input.phone,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// PUT /api/users/{id}
pub async fn update(
    RequireAdmin(current): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<UserProfile>> {
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user" }))?;

    if is_superadmin(&target.role) {
        if input.role.is_some() {
            return Err(AppError::Core(CoreError::Forbidden(
                "cannot change the role of SuperAdmin users".into(),
            )));
        }
        if input.status.is_some() {
            return Err(AppError::Core(CoreError::Forbidden(
                "cannot change the status of SuperAdmin users".into(),
            )));
        }
    }

    if let Some(role) = &input.role {
        if is_superadmin(role) && !is_superadmin(&current.session.role) {
            return Err(AppError::Core(CoreError::Forbidden(
                "only SuperAdmin can promote users to SuperAdmin role".into(),
            )));
        }
    }

    if let Some(status) = &input.status {
        if !VALID_STATUSES.contains(&status.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "invalid status, must be one of: {}",
                VALID_STATUSES.join(", ")
            ))));
        }
    }

    let password_hash = match &input.password {
        Some(password) => {
            validate_password_strength(password, MIN_PASSWORD_LEN)
                .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::Internal(format!("password hash error: {e}")))?,
            )
        }
        None => None,
    };

    let updated = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            username: input.username,
            email: input.email,
            password_hash,
            role: input.role,
            phone: input.phone,
            status: input.status,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound { entity: "user" }))?;

    Ok(Json(updated.into()))
}

/// DELETE /api/users/{id}
///
/// Sessions and preferences cascade with the row.
pub async fn delete(
    RequireAdmin(_current): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let target = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user" }))?;

    if is_superadmin(&target.role) {
        return Err(AppError::Core(CoreError::Forbidden(
            "cannot delete SuperAdmin users".into(),
        )));
    }

    UserRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
