//! API routes for the Skill Passport server.

pub mod credentials;
pub mod dashboard;
pub mod nfts;
pub mod privacy;
pub mod session;

use axum::{routing::get, Json, Router};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Creates the main API router with all routes mounted.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes(state))
        .layer(TraceLayer::new_for_http())
}

/// Creates the v1 API routes.
fn api_v1_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/session", session::router(state.clone()))
        .nest("/passport", dashboard::router(state.clone()))
        .nest("/credentials", credentials::router(state.clone()))
        .nest("/nfts", nfts::router(state.clone()))
        .nest("/privacy", privacy::router(state))
}

/// GET /api/v1/health
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
