//! Handlers for the JSON prediction API.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use failguard_core::features::FeatureSchema;
use failguard_core::machine::MachineType;
use failguard_core::model::ModelInfo;
use failguard_core::risk::RiskThresholds;
use failguard_core::sensor::SensorReading;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Body of `/predict` and `/encode`. Omitted fields take form defaults.
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(flatten)]
    pub reading: SensorReading,
    #[serde(default)]
    pub machine_type: MachineType,
}

/// Turn an extractor rejection into the JSON error envelope and check the
/// reading encodes to usable features.
fn parse_body(
    body: Result<Json<PredictRequest>, JsonRejection>,
    power_divisor: f64,
) -> AppResult<PredictRequest> {
    let Json(request) = body.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    request.reading.validate(power_divisor)?;
    Ok(request)
}

#[derive(Debug, Serialize)]
pub struct EncodeResponse {
    pub power: f64,
    pub features: Vec<f64>,
    pub field_names: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct ModelResponse {
    pub model: ModelInfo,
    pub schema: FeatureSchema,
    pub thresholds: RiskThresholds,
    pub power_divisor: f64,
}

// ---------------------------------------------------------------------------
// POST /predict
// ---------------------------------------------------------------------------

/// Encode the reading, score it and band the failure probability.
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let body = parse_body(body, state.assessor.encoder_settings().power_divisor)?;
    let prediction = state.assessor.predict(&body.reading, body.machine_type)?;
    Ok(Json(DataResponse { data: prediction }))
}

// ---------------------------------------------------------------------------
// POST /encode
// ---------------------------------------------------------------------------

/// Return the feature row that `/predict` would score, without inference.
pub async fn encode(
    State(state): State<AppState>,
    body: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let body = parse_body(body, state.assessor.encoder_settings().power_divisor)?;
    let features = state.assessor.encode(&body.reading, body.machine_type);
    let schema = state.assessor.schema();

    Ok(Json(DataResponse {
        data: EncodeResponse {
            power: features.power(),
            features: features.as_slice().to_vec(),
            field_names: schema.field_names.to_vec(),
        },
    }))
}

// ---------------------------------------------------------------------------
// GET /model
// ---------------------------------------------------------------------------

/// Describe the loaded model and the settings it is scored with.
pub async fn model_info(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let assessor = &state.assessor;
    Ok(Json(DataResponse {
        data: ModelResponse {
            model: assessor.model_info().clone(),
            schema: *assessor.schema(),
            thresholds: *assessor.thresholds(),
            power_divisor: assessor.encoder_settings().power_divisor,
        },
    }))
}
