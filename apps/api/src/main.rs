use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claimprobe::config::Config;
use claimprobe::ml::ModelRegistry;
use claimprobe::parsing::SectionRules;
use claimprobe::routes::{build_router, cors_layer};
use claimprobe::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("claimprobe={},tower_http={}", &config.rust_log, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ClaimProbe API v{}", env!("CARGO_PKG_VERSION"));

    // Section heading rules
    let rules = match &config.section_rules_path {
        Some(path) => {
            let rules = SectionRules::load(path)
                .with_context(|| format!("loading section rules from {}", path.display()))?;
            info!("Section rules loaded from {}", path.display());
            rules
        }
        None => SectionRules::builtin().clone(),
    };

    // Trained models (training can take a few seconds, keep it off the runtime)
    let model_dir = config.model_dir.clone();
    let train_if_missing = config.train_if_missing;
    let training = config.training;
    let models = tokio::task::spawn_blocking(move || {
        ModelRegistry::load_or_train(&model_dir, train_if_missing, &training)
    })
    .await
    .context("model loading task panicked")??;
    info!(
        "Models ready: classifier={}, readiness_estimate={}",
        models.is_ready(),
        models.readiness.is_some()
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        rules: Arc::new(rules),
        models: Arc::new(models),
    };

    // Build router
    let cors = cors_layer(&config.cors_origins)?;
    if config.cors_origins.is_empty() {
        warn!("CORS_ORIGINS not set, allowing any origin");
    }
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
