pub mod health;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/health", get(health::health_handler))
        // Analysis API
        .route("/api/v1/analysis", post(handlers::handle_analyze))
        .route(
            "/api/v1/analysis/upload",
            post(handlers::handle_analyze_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/claims/score", post(handlers::handle_score_claims))
        .route("/api/v1/keywords", post(handlers::handle_keywords))
        // Model API
        .route("/api/v1/model/insights", get(handlers::handle_model_insights))
        .with_state(state)
}

/// CORS for the configured origins; any origin when none are configured.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    if origins.is_empty() {
        return Ok(CorsLayer::permissive());
    }
    let origins = origins
        .iter()
        .map(|o| HeaderValue::from_str(o).with_context(|| format!("invalid CORS origin '{o}'")))
        .collect::<Result<Vec<_>>>()?;
    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}
