// src/api/http/router.rs
// HTTP router composition for REST API endpoints

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::{analyses, comparisons, health, projects, stats, versions};
use crate::state::AppState;

/// Every REST route under /api, plus /health at the root
pub fn build_app(app_state: Arc<AppState>) -> Router {
    let api = Router::new()
        .nest("/projects", projects::projects_router())
        .nest("/versions", versions::versions_router())
        .nest("/analyses", analyses::analyses_router())
        .nest("/comparisons", comparisons::comparisons_router())
        .nest("/stats", stats::stats_router());

    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
