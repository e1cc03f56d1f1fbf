//! Per-user UI preference handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use rideline_core::error::CoreError;
use rideline_db::models::preference::UpsertPreferences;
use rideline_db::repositories::PreferenceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::CurrentSession;
use crate::state::AppState;

/// Accent colors the UI ships swatches for.
const VALID_ACCENT_COLORS: &[&str] = &[
    "blue", "indigo", "purple", "violet", "fuchsia", "pink", "rose", "red", "orange", "amber",
    "yellow", "lime", "green", "emerald", "teal", "cyan", "sky",
];

const VALID_THEMES: &[&str] = &["light", "dark", "system"];

/// Defaults reported before a user ever saves preferences. These match
/// the column defaults so saving and never-saving look identical.
const DEFAULT_ACCENT_COLOR: &str = "blue";
const DEFAULT_THEME: &str = "system";

/// Response for both preference endpoints.
#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub accent_color: String,
    pub theme: String,
}

/// Request body for `PUT /api/preferences`. Absent fields keep their
/// stored (or default) value.
#[derive(Debug, Deserialize)]
pub struct UpdatePreferencesRequest {
    pub accent_color: Option<String>,
    pub theme: Option<String>,
}

/// GET /api/preferences
pub async fn get(
    State(state): State<AppState>,
    current: CurrentSession,
) -> AppResult<Json<PreferencesResponse>> {
    let response = match PreferenceRepo::get(&state.pool, current.session.user_id).await? {
        Some(prefs) => PreferencesResponse {
            accent_color: prefs.accent_color,
            theme: prefs.theme,
        },
        None => PreferencesResponse {
            accent_color: DEFAULT_ACCENT_COLOR.into(),
            theme: DEFAULT_THEME.into(),
        },
    };
    Ok(Json(response))
}

/// PUT /api/preferences
///
/// Validates and upserts; concurrent writers resolve last-write-wins
/// through the store's conflict handling.
pub async fn update(
    State(state): State<AppState>,
    current: CurrentSession,
    Json(input): Json<UpdatePreferencesRequest>,
) -> AppResult<Json<PreferencesResponse>> {
    if let Some(color) = &input.accent_color {
        if !VALID_ACCENT_COLORS.contains(&color.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "invalid accent color, must be one of: {}",
                VALID_ACCENT_COLORS.join(", ")
            ))));
        }
    }
    if let Some(theme) = &input.theme {
        if !VALID_THEMES.contains(&theme.as_str()) {
            return Err(AppError::Core(CoreError::Validation(format!(
                "invalid theme, must be one of: {}",
                VALID_THEMES.join(", ")
            ))));
        }
    }

    let prefs = PreferenceRepo::upsert(
        &state.pool,
        current.session.user_id,
        &UpsertPreferences {
            accent_color: input.accent_color,
            theme: input.theme,
        },
    )
    .await?;

    Ok(Json(PreferencesResponse {
        accent_color: prefs.accent_color,
        theme: prefs.theme,
    }))
}
