//! Handlers for login, logout, the current-user endpoint, and the
//! one-time-code flow.

use axum::extract::State;
use axum::http::header::{SET_COOKIE, USER_AGENT};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use rideline_core::error::CoreError;
use rideline_core::otp::generate_code;
use rideline_core::session::Session;
use rideline_db::models::email_log::CreateEmailLog;
use rideline_db::models::otp::CreateOtpCode;
use rideline_db::models::session::CreateSessionRecord;
use rideline_db::models::user::UserProfile;
use rideline_db::repositories::{EmailLogRepo, OtpRepo, SessionRepo, UserRepo};

use crate::cookie;
use crate::email::OTP_SUBJECT;
use crate::error::{AppError, AppResult};
use crate::location;
use crate::middleware::auth::CurrentSession;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Username or email, matched exactly.
    pub identifier: String,
    pub password: String,
}

/// Successful login response. The token is repeated in the body for
/// clients that authenticate with a bearer header instead of the cookie.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: &'static str,
    pub session: Session,
    pub access_token: String,
}

/// Response for `GET /api/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub session: Session,
    /// Full profile row; omitted when the profile fetch fails, in which
    /// case the session payload is all the client gets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserProfile>,
}

/// Request body for `POST /api/auth/send-otp`.
#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub email: String,
}

/// Request body for `POST /api/auth/verify-otp`.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

/// Response for `POST /api/auth/verify-otp` (both outcomes).
#[derive(Debug, Serialize)]
pub struct VerifyOtpResponse {
    pub valid: bool,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Login / logout / me
// ---------------------------------------------------------------------------

/// POST /api/auth/login
///
/// Authenticate with username-or-email + password, create the
/// cache-backed session, record provenance, and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    if input.identifier.is_empty() || input.password.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "identifier and password are required".into(),
        )));
    }

    let (session, token) = state.auth.login(&input.identifier, &input.password).await?;

    // Provenance is audit-only; a failed write never fails the login.
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let ip_address = location::client_ip(&headers);
    let location = match &ip_address {
        Some(ip) => Some(state.geo.resolve(ip).await),
        None => None,
    };
    let record = CreateSessionRecord {
        user_id: session.user_id,
        session_id: token.clone(),
        device_info: Some(location::device_info(user_agent.as_deref())),
        user_agent,
        ip_address,
        location,
        expires_at: Utc::now() + state.config.session_ttl,
    };
    if let Err(e) = SessionRepo::upsert(&state.pool, &record).await {
        tracing::warn!(user_id = session.user_id, error = %e, "session metadata write failed");
    }

    let cookie = cookie::session_cookie(&token, state.config.session_ttl, &state.config.cookie);
    Ok((
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(LoginResponse {
            message: "login successful",
            session,
            access_token: token,
        }),
    ))
}

/// POST /api/auth/logout
///
/// Revoke whatever token the request carries and clear the cookie.
/// Always succeeds: both the metadata marker and the cache delete are
/// best-effort, and logging out without a token is a no-op.
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    if let Some(token) = cookie::session_token(&headers) {
        if let Err(e) = SessionRepo::mark_logged_out(&state.pool, &token).await {
            tracing::warn!(error = %e, "logout metadata update failed");
        }
        if let Err(e) = state.auth.logout(&token).await {
            tracing::warn!(error = %e, "logout cache delete failed");
        }
    }

    let cookie = cookie::clear_session_cookie(&state.config.cookie);
    (
        AppendHeaders([(SET_COOKIE, cookie)]),
        Json(super::MessageResponse {
            message: "logout successful",
        }),
    )
}

/// GET /api/me
///
/// The caller's session plus their full profile row. Falls back to the
/// session payload alone when the profile fetch fails; the session has
/// already proven who they are.
pub async fn me(State(state): State<AppState>, current: CurrentSession) -> Json<MeResponse> {
    let user = match UserRepo::find_by_id(&state.pool, current.session.user_id).await {
        Ok(user) => user.map(UserProfile::from),
        Err(e) => {
            tracing::warn!(user_id = current.session.user_id, error = %e, "profile fetch failed");
            None
        }
    };

    Json(MeResponse {
        session: current.session,
        user,
    })
}

// ---------------------------------------------------------------------------
// One-time-code flow
// ---------------------------------------------------------------------------

/// POST /api/auth/send-otp
///
/// Issue a one-time code for an existing account. The cache write is the
/// primary store and the only step that can fail the request; the audit
/// row and the email are best-effort.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(input): Json<SendOtpRequest>,
) -> AppResult<Json<super::MessageResponse>> {
    if input.email.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "email is required".into(),
        )));
    }

    // Unlike login, this flow names the account by email already, so
    // "user not found" leaks nothing new.
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "user" }))?;

    let code = generate_code();
    state.otps.put(&user.email, &code).await?;

    let audit = CreateOtpCode {
        email: user.email.clone(),
        otp_code: code.clone(),
        user_id: Some(user.id),
        purpose: "password_change".into(),
        expires_at: Utc::now() + state.config.otp_ttl,
    };
    if let Err(e) = OtpRepo::insert(&state.pool, &audit).await {
        tracing::warn!(email = %user.email, error = %e, "otp audit insert failed");
    }

    deliver_code(&state, &user.email, user.id, &code).await;

    Ok(Json(super::MessageResponse {
        message: "OTP sent successfully",
    }))
}

/// Email the code and audit the attempt. Failures are logged, never
/// surfaced: the code is stored, so the caller's request already
/// succeeded.
async fn deliver_code(state: &AppState, email: &str, user_id: i64, code: &str) {
    let (status, error_message) = match &state.mailer {
        Some(mailer) => match mailer.send_otp(email, code).await {
            Ok(()) => ("sent", None),
            Err(e) => {
                tracing::warn!(email, error = %e, "one-time code email failed");
                tracing::info!(email, code, "one-time code (delivery failed, from server log)");
                ("failed", Some(e.to_string()))
            }
        },
        None => {
            tracing::info!(email, code, "SMTP not configured; one-time code from server log");
            ("skipped", None)
        }
    };

    let log = CreateEmailLog {
        recipient_email: email.to_string(),
        recipient_user_id: Some(user_id),
        subject: OTP_SUBJECT.to_string(),
        email_type: "otp".into(),
        status: status.into(),
        error_message,
    };
    if let Err(e) = EmailLogRepo::insert(&state.pool, &log).await {
        tracing::warn!(email, error = %e, "email audit insert failed");
    }
}

/// POST /api/auth/verify-otp
///
/// Check a submitted code against the cache. A match consumes the code
/// (cache delete plus audit-row flip); a mismatch reveals nothing about
/// whether the code expired or never matched.
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(input): Json<VerifyOtpRequest>,
) -> AppResult<Response> {
    if input.email.is_empty() || input.otp.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "email and otp are required".into(),
        )));
    }

    if !state.otps.matches(&input.email, &input.otp).await? {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(VerifyOtpResponse {
                valid: false,
                message: "invalid OTP",
            }),
        )
            .into_response());
    }

    // The audit row is not the source of truth; disagreement is worth a
    // log line but nothing more.
    match OtpRepo::consume(&state.pool, &input.email, &input.otp).await {
        Ok(true) => {}
        Ok(false) => {
            tracing::warn!(email = %input.email, "code valid in cache but audit row absent or spent");
        }
        Err(e) => {
            tracing::warn!(email = %input.email, error = %e, "otp audit update failed");
        }
    }

    // Single use: the cache entry dies with the successful verification.
    if let Err(e) = state.otps.delete(&input.email).await {
        tracing::warn!(email = %input.email, error = %e, "otp cache delete failed");
    }

    Ok(Json(VerifyOtpResponse {
        valid: true,
        message: "OTP verified successfully",
    })
    .into_response())
}
