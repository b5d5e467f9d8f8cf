//! Form Predictor - Main Entry Point
//!
//! Loads one trained classifier and serves its prediction form over HTTP.
//! Usage: `form-predictor [CONFIG_PATH]` (default `config/diabetes.toml`).

use anyhow::{Context, Result};
use form_predictor::{
    config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH},
    metrics::FormMetrics,
    models::inference::InferenceEngine,
    server::{router, AppState},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    // Load configuration
    let config = AppConfig::load_from_path(&config_path)?;

    init_logging(&config.logging)?;
    info!(path = %config_path, form = %config.app, "Configuration loaded successfully");

    // Model load failure is fatal: nothing is served without a classifier
    let engine = Arc::new(InferenceEngine::new(&config)?);
    info!(
        model = %engine.model_name(),
        features = engine.feature_count(),
        "Model ready"
    );

    let metrics = Arc::new(FormMetrics::new());
    let app = router(AppState::new(engine, metrics.clone()));

    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind))?;
    info!("Serving {} form on http://{}", config.app, config.server.bind);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Form predictor shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(format!(
            "form_predictor={},tower_http={}",
            logging.level, logging.level
        ))
    })?;

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
