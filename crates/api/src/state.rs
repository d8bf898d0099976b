use std::sync::Arc;

use failguard_core::assessor::RiskAssessor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Loaded classifier plus encoder and banding settings. Never reloaded.
    pub assessor: Arc<RiskAssessor>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
