//! Shared application state and router assembly

mod state;

pub use state::AppState;

use axum::{Json, Router, extract::State, routing::get};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::auth_routes;
use crate::contact::{contact_routes, not_found};

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub registered_users: usize,
    pub uptime_seconds: u64,
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        registered_users: state.session_manager.credentials().user_count().await,
        uptime_seconds: state.uptime().as_secs(),
    })
}

/// Build the full application router: contact backend, auth API, health,
/// and the JSON 404 fallback.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(contact_routes())
        .route("/health", get(health))
        .nest("/api/auth", auth_routes())
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
