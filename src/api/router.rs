//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;
use crate::pipeline::triage::TriageOrchestrator;

/// Build the API router around a shared orchestrator.
pub fn api_router(orchestrator: Arc<TriageOrchestrator>) -> Router {
    build_router(ApiContext::new(orchestrator))
}

fn build_router(ctx: ApiContext) -> Router {
    let routes = Router::new()
        .route("/chat", post(endpoints::chat::send))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx);

    Router::new()
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
