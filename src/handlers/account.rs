//! Sign-in and sign-out.

use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
    Extension, Json,
};
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::error::ApiError;
use crate::session::events::AuthEvent;
use crate::session::gate::{clear_token_cookies, write_token_cookies, SessionContext};
use crate::session::routes::{DASHBOARD_PATH, LOGIN_PATH};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// POST /login - exchange credentials for a session. On success both token
/// cookies are set and the browser is sent to the dashboard.
pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Json(form): Json<LoginForm>,
) -> Response {
    match state
        .auth
        .sign_in_with_password(&form.email, &form.password)
        .await
    {
        Ok(tokens) => {
            write_token_cookies(&cookies, &tokens);
            state.events.publish(AuthEvent::SignedIn);
            tracing::info!("user signed in");
            Redirect::to(DASHBOARD_PATH).into_response()
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

/// POST /logout - invalidate the session with the provider, drop both
/// cookies, and send the browser back to the login page. A provider failure
/// still clears the local session.
pub async fn logout(
    State(state): State<AppState>,
    cookies: Cookies,
    Extension(session): Extension<SessionContext>,
) -> Response {
    if let Some(tokens) = &session.tokens {
        if let Err(err) = state.auth.sign_out(tokens).await {
            tracing::warn!("provider sign-out failed, clearing session anyway: {}", err);
        }
    }

    clear_token_cookies(&cookies);
    state.events.publish(AuthEvent::SignedOut);
    Redirect::to(LOGIN_PATH).into_response()
}
