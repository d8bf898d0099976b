pub mod health;
pub mod page;
pub mod predict;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /predict          encode + score + band (POST)
/// /encode           feature row only, no inference (POST)
/// /model            loaded model, schema and thresholds (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(predict::router())
}
