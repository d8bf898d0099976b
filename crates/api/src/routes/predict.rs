//! Route definitions for the JSON prediction API.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::predict;
use crate::state::AppState;

/// Routes mounted under `/api/v1`.
///
/// ```text
/// POST /predict  -> predict
/// POST /encode   -> encode
/// GET  /model    -> model_info
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/predict", post(predict::predict))
        .route("/encode", post(predict::encode))
        .route("/model", get(predict::model_info))
}
