pub mod auth;
pub mod config;
pub mod data;
pub mod error;
pub mod format;
pub mod handlers;
pub mod session;
pub mod state;
pub mod store;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use state::AppState;

/// Build the full router: every route sits behind the session gate, which in
/// turn sits inside the cookie layer so refreshed tokens reach the response.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .route(
            "/login",
            get(handlers::public::login_page).post(handlers::account::login),
        )
        .route("/logout", post(handlers::account::logout))
        .route("/dashboard", get(handlers::dashboard::overview))
        .route("/dashboard/invoices", get(handlers::dashboard::invoices))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::gate::session_gate,
        ))
        .layer(CookieManagerLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
