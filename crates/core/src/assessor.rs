//! Encode-then-infer pipeline around a loaded classifier.
//!
//! [`RiskAssessor`] is built once at startup and shared read-only by every
//! request. It holds no mutable state, so identical inputs always produce
//! identical outputs.

use std::sync::Arc;

use serde::Serialize;

use crate::error::CoreError;
use crate::features::{encode, EncoderSettings, FeatureSchema, FeatureVector, FEATURE_SCHEMA_V1};
use crate::machine::MachineType;
use crate::model::{Classifier, LoadedModel, ModelInfo, POSITIVE_CLASS};
use crate::risk::{RiskAssessment, RiskThresholds};
use crate::sensor::SensorReading;

/// Full result of one prediction request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub machine_type: MachineType,
    pub power: f64,
    pub features: FeatureVector,
    pub assessment: RiskAssessment,
}

pub struct RiskAssessor {
    classifier: Arc<dyn Classifier>,
    info: ModelInfo,
    schema: FeatureSchema,
    encoder: EncoderSettings,
    thresholds: RiskThresholds,
}

impl std::fmt::Debug for RiskAssessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RiskAssessor")
            .field("model", &self.info)
            .field("encoder", &self.encoder)
            .field("thresholds", &self.thresholds)
            .finish()
    }
}

impl RiskAssessor {
    /// Wrap a classifier. Fails if it does not accept [`FEATURE_SCHEMA_V1`] rows.
    pub fn new(
        classifier: Arc<dyn Classifier>,
        info: ModelInfo,
        encoder: EncoderSettings,
        thresholds: RiskThresholds,
    ) -> Result<Self, CoreError> {
        let schema = FEATURE_SCHEMA_V1;
        if classifier.n_features() != schema.width() {
            return Err(CoreError::Validation(format!(
                "classifier accepts {} features, encoder produces {}",
                classifier.n_features(),
                schema.width()
            )));
        }
        Ok(Self {
            classifier,
            info,
            schema,
            encoder,
            thresholds,
        })
    }

    pub fn from_loaded(
        model: LoadedModel,
        encoder: EncoderSettings,
        thresholds: RiskThresholds,
    ) -> Result<Self, CoreError> {
        Self::new(Arc::new(model.classifier), model.info, encoder, thresholds)
    }

    pub fn encode(&self, reading: &SensorReading, machine_type: MachineType) -> FeatureVector {
        encode(reading, machine_type, &self.encoder)
    }

    /// Score an encoded row and band the failure probability.
    pub fn assess(&self, features: &FeatureVector) -> Result<RiskAssessment, CoreError> {
        let probs = self.classifier.predict_proba(features.as_slice())?;
        let probability = probs[POSITIVE_CLASS];
        Ok(RiskAssessment::from_probability(
            probability,
            &self.thresholds,
        ))
    }

    pub fn predict(
        &self,
        reading: &SensorReading,
        machine_type: MachineType,
    ) -> Result<Prediction, CoreError> {
        let features = self.encode(reading, machine_type);
        let assessment = self.assess(&features)?;

        tracing::info!(
            machine_type = %machine_type,
            probability = assessment.probability,
            band = assessment.band.as_str(),
            "Prediction complete"
        );

        Ok(Prediction {
            machine_type,
            power: features.power(),
            features,
            assessment,
        })
    }

    pub fn model_info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn encoder_settings(&self) -> &EncoderSettings {
        &self.encoder
    }

    pub fn thresholds(&self) -> &RiskThresholds {
        &self.thresholds
    }
}
