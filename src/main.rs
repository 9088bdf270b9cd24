use std::sync::Arc;

use acme_dashboard_api::auth::GoTrueProvider;
use acme_dashboard_api::state::AppState;
use acme_dashboard_api::store::PostgrestStore;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up SUPABASE_URL, SUPABASE_ANON_KEY, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = acme_dashboard_api::config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Acme Dashboard API in {:?} mode", config.environment);

    let store = PostgrestStore::new(&config.store)
        .unwrap_or_else(|e| panic!("failed to build store client: {}", e));
    let auth = GoTrueProvider::new(&config.store)
        .unwrap_or_else(|e| panic!("failed to build auth client: {}", e));

    let state = AppState::new(Arc::new(auth), Arc::new(store));
    let app = acme_dashboard_api::app(state);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    tracing::info!("listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
