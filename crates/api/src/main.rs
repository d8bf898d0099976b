use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use failguard_core::assessor::RiskAssessor;
use failguard_core::features::FEATURE_SCHEMA_V1;
use failguard_core::model::OnnxClassifier;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use failguard_api::config::ServerConfig;
use failguard_api::router::build_app_router;
use failguard_api::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "failguard_api=debug,failguard_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;
    tracing::info!(
        host = %config.host,
        port = %config.port,
        model_path = %config.model_path.display(),
        moderate = config.thresholds.moderate,
        high = config.thresholds.high,
        "Loaded server configuration"
    );

    // --- Model (fatal if unavailable) ---
    let model = OnnxClassifier::load(&config.model_path, &FEATURE_SCHEMA_V1).map_err(|e| {
        tracing::error!(error = %e, "Cannot start without a model");
        e
    })?;
    let assessor = RiskAssessor::from_loaded(model, config.encoder, config.thresholds)?;

    // --- App state ---
    let state = AppState {
        assessor: Arc::new(assessor),
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config)?;

    // --- Start server ---
    let addr = SocketAddr::new(
        config
            .host
            .parse()
            .with_context(|| format!("Invalid HOST address '{}'", config.host))?,
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
