//! ONNX classifiers evaluated with `tract-onnx`.
//!
//! A scikit-learn estimator exported with skl2onnx (`zipmap` disabled)
//! exposes a float input of shape `[N, width]` and a float output
//! `output_probability` of shape `[N, 2]`. That is the only interface
//! relied on here.

use std::path::Path;

use tract_onnx::pb::ModelProto;
use tract_onnx::prelude::*;

use super::{check_distribution, check_row, Classifier, ModelInfo};
use crate::error::CoreError;
use crate::features::FeatureSchema;

/// Graph output holding the class probabilities in skl2onnx exports.
pub const PROBABILITY_OUTPUT: &str = "output_probability";

/// Metadata key declaring which feature schema the model was trained on.
pub const SCHEMA_VERSION_KEY: &str = "feature_schema_version";

/// Metadata key for a human-readable model name.
pub const NAME_KEY: &str = "name";

type Plan = TypedRunnableModel<TypedModel>;

/// An optimized ONNX graph scoring one row at a time.
pub struct OnnxClassifier {
    plan: Plan,
    n_features: usize,
}

/// A classifier ready to serve, with its description.
pub struct LoadedModel {
    pub classifier: OnnxClassifier,
    pub info: ModelInfo,
}

impl std::fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedModel").field("info", &self.info).finish()
    }
}

impl OnnxClassifier {
    /// Load an ONNX model that scores rows of `schema`.
    ///
    /// Every failure maps to [`CoreError::ModelUnavailable`] naming the path.
    pub fn load(path: &Path, schema: &FeatureSchema) -> Result<LoadedModel, CoreError> {
        let unavailable = |reason: String| CoreError::model_unavailable(path, reason);

        let onnx = tract_onnx::onnx();
        let proto = onnx
            .proto_model_for_path(path)
            .map_err(|e| unavailable(format!("cannot read ONNX model: {e:#}")))?;

        let feature_schema_version = declared_schema_version(&proto, schema).map_err(unavailable)?;
        let name = metadata(&proto, NAME_KEY)
            .map(str::to_string)
            .or_else(|| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .unwrap_or_else(|| "model".to_string());

        let plan = build_plan(&proto, schema.width())
            .map_err(|e| unavailable(format!("cannot prepare graph: {e:#}")))?;
        let classifier = OnnxClassifier {
            plan,
            n_features: schema.width(),
        };

        // A model that cannot score the all-zero row will not score anything.
        classifier
            .predict_proba(&vec![0.0; schema.width()])
            .map_err(|e| unavailable(format!("smoke prediction failed: {e}")))?;

        let info = ModelInfo {
            name,
            kind: classifier.kind(),
            producer: proto.producer_name.clone(),
            n_features: classifier.n_features(),
            feature_schema_version,
        };
        tracing::info!(
            path = %path.display(),
            name = %info.name,
            producer = %info.producer,
            n_features = info.n_features,
            "ONNX model loaded"
        );
        Ok(LoadedModel { classifier, info })
    }
}

fn metadata<'a>(proto: &'a ModelProto, key: &str) -> Option<&'a str> {
    proto
        .metadata_props
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| entry.value.as_str())
}

/// Schema version stated in the model metadata. Exports without it are
/// assumed to follow `schema`.
fn declared_schema_version(proto: &ModelProto, schema: &FeatureSchema) -> Result<u32, String> {
    let Some(raw) = metadata(proto, SCHEMA_VERSION_KEY) else {
        tracing::warn!(
            expected = schema.version,
            "Model does not declare {SCHEMA_VERSION_KEY}, assuming the current schema"
        );
        return Ok(schema.version);
    };
    let version: u32 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{SCHEMA_VERSION_KEY} is not a number: '{raw}'"))?;
    if version != schema.version {
        return Err(format!(
            "model was trained on feature schema v{version}, this build encodes v{}",
            schema.version
        ));
    }
    Ok(version)
}

/// Pin the input to a single row, keep only the probability output and
/// optimize.
fn build_plan(proto: &ModelProto, width: usize) -> TractResult<Plan> {
    let mut model = tract_onnx::onnx()
        .model_for_proto_model(proto)?
        .with_input_fact(0, f32::fact([1, width]).into())?;

    let outlets = model.output_outlets()?.to_vec();
    let probability = outlets
        .iter()
        .copied()
        .find(|outlet| model.outlet_label(*outlet) == Some(PROBABILITY_OUTPUT));
    let chosen = match (probability, outlets.as_slice()) {
        (Some(outlet), _) => outlet,
        (None, [only]) => *only,
        (None, _) => {
            return Err(anyhow::anyhow!(
                "graph has {} outputs and none is named {PROBABILITY_OUTPUT}",
                outlets.len()
            ))
        }
    };
    model.set_output_outlets(&[chosen])?;

    model.into_optimized()?.into_runnable()
}

impl Classifier for OnnxClassifier {
    fn predict_proba(&self, row: &[f64]) -> Result<[f64; 2], CoreError> {
        check_row(row, self.n_features)?;
        let row: Vec<f32> = row.iter().map(|v| *v as f32).collect();

        let input = Tensor::from_shape(&[1, self.n_features], &row)
            .map_err(|e| CoreError::Inference(format!("cannot build input tensor: {e:#}")))?;
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| CoreError::Inference(format!("graph execution failed: {e:#}")))?;

        let output = outputs
            .first()
            .ok_or_else(|| CoreError::Inference("graph produced no output".into()))?;
        let probs = output
            .cast_to::<f64>()
            .map_err(|e| CoreError::Inference(format!("unexpected output type: {e:#}")))?;
        let probs = probs
            .as_slice::<f64>()
            .map_err(|e| CoreError::Inference(format!("unexpected output layout: {e:#}")))?;

        match probs {
            [p0, p1] => check_distribution([*p0, *p1]),
            other => Err(CoreError::Inference(format!(
                "expected 2 class probabilities, got {}",
                other.len()
            ))),
        }
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn kind(&self) -> &'static str {
        "onnx"
    }
}
