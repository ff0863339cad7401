//! HTTP surface of the service.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    config::Config,
    outside::{AudioTranscoder, StreamExtractor},
};

/// State shared across request handlers
#[derive(Clone)]
pub struct AppContext {
    /// Probes stream metadata and fetches audio streams
    pub extractor: Arc<dyn StreamExtractor>,
    /// Converts fetched streams to MP3
    pub transcoder: Arc<dyn AudioTranscoder>,
    /// Service configuration
    pub config: Arc<Config>,
}

/// Create the API router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/info", get(handlers::video_info))
        .route("/audio", get(handlers::download_audio))
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        // All origins allowed, the API is meant to be callable from any page
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn home() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": format!("tubetap {} running", env!("CARGO_PKG_VERSION")),
    }))
}
