// ============================================================================
// Market API - Auth Handlers
// File: crates/market-api/src/handlers/auth.rs
// ============================================================================
//! Authentication HTTP handlers (login, register, logout, session)

use axum::{
    extract::{Extension, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use chrono::{DateTime, Utc};
use market_core::domain::{Identity, Role, Session};
use market_core::services::Registration;
use market_shared::utils::mask_email;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::metrics::AuthEvent;
use crate::middleware::{clear_session_cookie, session_cookie};
use crate::response::{ApiResponse, MessageBody};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(alias = "password")]
    pub credential: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    #[serde(alias = "password")]
    pub credential: String,
    pub role: Role,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
    pub identity: Identity,
    pub expires_at: DateTime<Utc>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            identity: session.identity.clone(),
            expires_at: session.expires_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub identity: Identity,
}

/// Login handler - POST /api/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionView>>), ApiError> {
    if payload.username.trim().is_empty() || payload.credential.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and credential are required".to_string(),
        ));
    }

    let issued = match state.auth.login(&payload.username, &payload.credential).await {
        Ok(issued) => issued,
        Err(e) => {
            if e.is_authentication() {
                state.metrics.record_auth(AuthEvent::LoginFailure);
            }
            return Err(e.into());
        }
    };
    state.metrics.record_auth(AuthEvent::LoginSuccess);

    let jar = jar.add(session_cookie(&state.cookie, issued.token.as_str()));
    Ok((jar, Json(ApiResponse::success(SessionView::from(&issued.session)))))
}

/// Register handler - POST /api/register
pub async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    info!(
        "Registration request for {} ({})",
        payload.username,
        mask_email(&payload.email)
    );

    let identity = state
        .auth
        .register(Registration {
            username: payload.username,
            email: payload.email,
            credential: payload.credential,
            role: payload.role,
            phone_number: payload.phone_number,
        })
        .await?;
    state.metrics.record_auth(AuthEvent::Register);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RegisterResponse { identity })),
    ))
}

/// Logout handler - POST /api/logout
///
/// Always succeeds, with or without a cookie.
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<MessageBody>>), ApiError> {
    if let Some(token) = jar.get(&state.cookie.name).map(|c| c.value().to_string()) {
        state.auth.logout(&token).await?;
        state.metrics.record_auth(AuthEvent::Logout);
    }

    let jar = clear_session_cookie(jar, &state.cookie);
    Ok((jar, Json(ApiResponse::message("Logged out"))))
}

/// Current session - GET /api/session
pub async fn current_session(
    Extension(session): Extension<Session>,
) -> Json<ApiResponse<SessionView>> {
    Json(ApiResponse::success(SessionView::from(&session)))
}
