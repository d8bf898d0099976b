use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use failguard_core::error::CoreError;
use serde_json::json;

/// Message shown to clients whenever a prediction cannot be produced.
pub const PREDICTION_FAILED_MESSAGE: &str = "Prediction failed";

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `failguard_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Status, machine-readable code and client-safe message.
    ///
    /// Internal details are logged here and never returned.
    pub fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => match core {
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Inference(msg) => {
                    tracing::error!(error = %msg, "Inference failed");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INFERENCE_ERROR",
                        PREDICTION_FAILED_MESSAGE.to_string(),
                    )
                }
                CoreError::ModelUnavailable { .. } => {
                    tracing::error!(error = %core, "Model unavailable");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "MODEL_UNAVAILABLE",
                        "The prediction model is not available".to_string(),
                    )
                }
            },
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.classify();

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
