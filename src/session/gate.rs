//! Session gate middleware.
//!
//! Runs once per request, before any handler: reads the session cookie pair,
//! resolves the caller's identity through the auth provider (which may rotate
//! an expired access token), then either passes the request through or
//! redirects based on the public/protected route table. The gate never fails;
//! an unreachable provider just means "no user", which fails closed on
//! protected paths.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_cookies::{Cookie, Cookies};

use crate::auth::{AuthUser, SessionTokens};
use crate::state::AppState;

use super::events::AuthEvent;
use super::routes::{classify, RouteClass, DASHBOARD_PATH, LOGIN_PATH};

pub const ACCESS_COOKIE: &str = "sb-access-token";
pub const REFRESH_COOKIE: &str = "sb-refresh-token";

/// Per-request session state injected into request extensions for downstream
/// handlers. `tokens` always holds the freshest pair, so logic later in the
/// same pass never sees a stale access token.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: Option<AuthUser>,
    pub tokens: Option<SessionTokens>,
}

impl SessionContext {
    fn anonymous() -> Self {
        Self {
            user: None,
            tokens: None,
        }
    }
}

pub async fn session_gate(
    State(state): State<AppState>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let route = classify(request.uri().path());
    if route == RouteClass::Bypass {
        return next.run(request).await;
    }

    let mut session = SessionContext::anonymous();

    if let Some(tokens) = read_tokens(&cookies) {
        match state.auth.current_user(&tokens).await {
            Ok(outcome) => {
                if let Some(fresh) = &outcome.refreshed {
                    // Mirror the rotated pair onto the response so the
                    // browser's next request carries valid credentials.
                    write_token_cookies(&cookies, fresh);
                    state.events.publish(AuthEvent::TokenRefreshed);
                    tracing::debug!(user = %outcome.user.id, "session tokens refreshed");
                }
                session.tokens = Some(outcome.refreshed.unwrap_or(tokens));
                session.user = Some(outcome.user);
            }
            Err(err) => {
                // Fail closed: an unreachable or rejecting provider leaves
                // the request unauthenticated.
                tracing::warn!("session not resolved, treating as unauthenticated: {}", err);
                session.tokens = Some(tokens);
            }
        }
    }

    match (session.user.is_some(), route) {
        (true, RouteClass::Public) => Redirect::temporary(DASHBOARD_PATH).into_response(),
        (false, RouteClass::Protected) => Redirect::temporary(LOGIN_PATH).into_response(),
        _ => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
    }
}

fn read_tokens(cookies: &Cookies) -> Option<SessionTokens> {
    let access_token = cookies.get(ACCESS_COOKIE)?.value().to_string();
    let refresh_token = cookies.get(REFRESH_COOKIE)?.value().to_string();
    Some(SessionTokens {
        access_token,
        refresh_token,
    })
}

/// Persist a token pair into the session cookies.
pub fn write_token_cookies(cookies: &Cookies, tokens: &SessionTokens) {
    cookies.add(session_cookie(ACCESS_COOKIE, tokens.access_token.clone()));
    cookies.add(session_cookie(REFRESH_COOKIE, tokens.refresh_token.clone()));
}

/// Drop both session cookies (logout).
pub fn clear_token_cookies(cookies: &Cookies) {
    cookies.remove(session_cookie(ACCESS_COOKIE, String::new()));
    cookies.remove(session_cookie(REFRESH_COOKIE, String::new()));
}

fn session_cookie(name: &'static str, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie
}
