//! Pre-trained binary classifiers.
//!
//! Models are exported to ONNX and loaded once at startup (see [`onnx`]).
//! They are immutable afterwards.

pub mod onnx;

use serde::Serialize;

use crate::error::CoreError;

pub use onnx::{LoadedModel, OnnxClassifier};

/// Tolerance when checking that class probabilities sum to one.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Index of the "failure" class in a probability pair.
pub const POSITIVE_CLASS: usize = 1;

/// A binary classifier scoring a single numeric row.
pub trait Classifier: Send + Sync {
    /// Class probabilities `[p(no failure), p(failure)]` for one row.
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], CoreError>;

    /// Width of the rows this classifier accepts.
    fn n_features(&self) -> usize;

    /// Short runtime label, e.g. `onnx`.
    fn kind(&self) -> &'static str;
}

/// Descriptive metadata about the loaded model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    pub kind: &'static str,
    /// Tool that wrote the model file, e.g. `skl2onnx`.
    pub producer: String,
    pub n_features: usize,
    pub feature_schema_version: u32,
}

/// Reject rows of the wrong width or containing non-finite values.
pub(crate) fn check_row(row: &[f64], n_features: usize) -> Result<(), CoreError> {
    if row.len() != n_features {
        return Err(CoreError::Inference(format!(
            "expected a row of {n_features} features, got {}",
            row.len()
        )));
    }
    if let Some(i) = row.iter().position(|v| !v.is_finite()) {
        return Err(CoreError::Inference(format!(
            "feature {i} is not finite: {}",
            row[i]
        )));
    }
    Ok(())
}

/// Ensure a classifier output is a valid two-class distribution.
pub(crate) fn check_distribution(probs: [f64; 2]) -> Result<[f64; 2], CoreError> {
    let valid = probs
        .iter()
        .all(|p| p.is_finite() && (0.0..=1.0).contains(p));
    if !valid || (probs[0] + probs[1] - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
        return Err(CoreError::Inference(format!(
            "classifier returned an invalid distribution: {probs:?}"
        )));
    }
    Ok(probs)
}
