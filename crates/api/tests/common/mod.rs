#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use failguard_api::config::ServerConfig;
use failguard_api::router::build_app_router;
use failguard_api::state::AppState;
use failguard_core::assessor::RiskAssessor;
use failguard_core::error::CoreError;
use failguard_core::features::EncoderSettings;
use failguard_core::model::{Classifier, ModelInfo};
use failguard_core::risk::RiskThresholds;
use http_body_util::BodyExt;
use tower::ServiceExt;

/// Classifier returning the same failure probability for every row.
pub struct FixedClassifier(pub f64);

impl Classifier for FixedClassifier {
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], CoreError> {
        if row.len() != 12 {
            return Err(CoreError::Inference(format!("bad width {}", row.len())));
        }
        Ok([1.0 - self.0, self.0])
    }

    fn n_features(&self) -> usize {
        12
    }

    fn kind(&self) -> &'static str {
        "fixed"
    }
}

/// Classifier that rejects every row.
pub struct RejectingClassifier;

impl Classifier for RejectingClassifier {
    fn predict_proba(&self, _row: &[f64]) -> Result<[f64; 2], CoreError> {
        Err(CoreError::Inference(
            "tensor shape [1, 12] incompatible with graph input".into(),
        ))
    }

    fn n_features(&self) -> usize {
        12
    }

    fn kind(&self) -> &'static str {
        "rejecting"
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig::from_lookup(|_| None).expect("defaults are valid")
}

pub fn assessor_for(classifier: Arc<dyn Classifier>) -> RiskAssessor {
    let info = ModelInfo {
        name: "test-model".into(),
        kind: classifier.kind(),
        producer: "tests".into(),
        n_features: classifier.n_features(),
        feature_schema_version: 1,
    };
    RiskAssessor::new(
        classifier,
        info,
        EncoderSettings::default(),
        RiskThresholds::default(),
    )
    .unwrap()
}

/// Build the full application router around the given assessor.
///
/// Uses the same builder as `main.rs` so integration tests exercise the
/// production middleware stack (CORS, request ID, timeout, tracing, panic
/// recovery).
pub fn build_test_app_with(assessor: RiskAssessor) -> Router {
    let config = test_config();
    let state = AppState {
        assessor: Arc::new(assessor),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config).unwrap()
}

/// App whose model always predicts `probability`.
pub fn build_test_app(probability: f64) -> Router {
    build_test_app_with(assessor_for(Arc::new(FixedClassifier(probability))))
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_form(app: Router, uri: &str, body: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
