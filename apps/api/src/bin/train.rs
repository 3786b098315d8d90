//! Trains the risk classifier and readiness model from synthetic data and
//! writes them to MODEL_DIR.

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use claimprobe::config::Config;
use claimprobe::ml::ModelRegistry;

const TOP_FEATURES: usize = 10;

fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("claimprobe={},train={}", &config.rust_log, &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        seed = config.training.seed,
        samples_per_class = config.training.samples_per_class,
        readiness_resumes = config.training.readiness_resumes,
        "Training models"
    );

    let registry = ModelRegistry::train(&config.training).context("training models")?;

    if let Some(metrics) = registry.risk.metrics() {
        info!(
            "Risk classifier: accuracy={} precision={} recall={} f1={} (train={}, test={})",
            metrics.accuracy,
            metrics.precision,
            metrics.recall,
            metrics.f1,
            metrics.samples_train,
            metrics.samples_test
        );
    }
    if let Some(readiness) = &registry.readiness {
        let metrics = readiness.metrics();
        info!("Readiness model: mae={} rmse={}", metrics.mae, metrics.rmse);
    }
    for (rank, weight) in registry.risk.feature_importance(TOP_FEATURES).iter().enumerate() {
        info!("  #{:<2} {:<28} {:+.4}", rank + 1, weight.feature, weight.weight);
    }

    registry
        .save(&config.model_dir)
        .with_context(|| format!("saving models to {}", config.model_dir.display()))?;
    info!("Models written to {}", config.model_dir.display());

    Ok(())
}
