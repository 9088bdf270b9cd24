use axum::{extract::State, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::store::{CountMode, TableQuery};

pub async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Acme Dashboard API",
            "version": version,
            "description": "Business dashboard backend (invoices, customers, revenue)",
            "endpoints": {
                "home": "/ (public)",
                "login": "GET|POST /login (public)",
                "logout": "POST /logout (protected)",
                "dashboard": "/dashboard (protected)",
                "invoices": "/dashboard/invoices?query=&page= (protected)",
                "health": "/health (probe)",
            }
        }
    }))
}

/// Liveness probe: pings the remote store with a metadata-only count.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    let ping = match TableQuery::new("revenue") {
        Ok(query) => state.store.count(query.count(CountMode::Exact).head_only()).await,
        Err(err) => Err(err),
    };

    match ping {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "store": "ok"
                }
            })),
        ),
        Err(err) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "remote store unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "store_error": err.to_string()
                }
            })),
        ),
    }
}

/// GET /login - the unauthenticated entry point (the gate lets anonymous
/// requests through and bounces signed-in users to the dashboard).
pub async fn login_page() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "message": "Sign in with POST /login { email, password }"
        }
    }))
}
