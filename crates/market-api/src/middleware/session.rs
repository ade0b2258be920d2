//! Session gate middleware and cookie helpers

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use crate::error::ApiError;
use crate::state::{AppState, CookieSettings};

/// Resolves the session cookie and attaches `Identity` and `Session` to the
/// request. Anything else is rejected with 401 before the handler runs; a
/// dead token also gets its cookie cleared.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = jar.get(&state.cookie.name).map(|c| c.value().to_string()) else {
        return ApiError::Unauthorized("No active session".to_string()).into_response();
    };

    match state.auth.authenticate(&token).await {
        Ok(session) => {
            debug!("Request authenticated as {}", session.identity.username);
            request.extensions_mut().insert(session.identity.clone());
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        Err(e) if e.is_authentication() => {
            (clear_session_cookie(jar, &state.cookie), ApiError::from(e)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

pub fn session_cookie(settings: &CookieSettings, token: &str) -> Cookie<'static> {
    Cookie::build((settings.name.clone(), token.to_string()))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(settings.secure)
        .max_age(time::Duration::seconds(settings.max_age_seconds))
        .build()
}

pub fn clear_session_cookie(jar: CookieJar, settings: &CookieSettings) -> CookieJar {
    jar.remove(Cookie::build(settings.name.clone()).path("/"))
}
