//! Feature encoding for the failure classifier.
//!
//! The classifier consumes rows positionally, so the layout below must match
//! the layout the model was trained on. A model may declare the schema
//! version it expects in its ONNX metadata, and loading fails if it differs
//! from [`FEATURE_SCHEMA_V1`].

use serde::Serialize;

use crate::machine::MachineType;
use crate::sensor::{SensorReading, DEFAULT_POWER_DIVISOR};

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Number of columns in a feature row.
pub const FEATURE_WIDTH: usize = 12;

/// Column layout of a feature row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureSchema {
    pub version: u32,
    /// Column names in order, padding columns included.
    pub field_names: [&'static str; FEATURE_WIDTH],
    /// Columns populated from the reading. The rest are zero padding.
    pub active_fields: usize,
}

impl FeatureSchema {
    pub fn width(&self) -> usize {
        self.field_names.len()
    }

    pub fn padding(&self) -> usize {
        self.width() - self.active_fields
    }
}

/// Eight computed columns followed by four zero-filled slots.
///
/// The trained model expects a wider row than this tool computes; the padding
/// columns are always zero. A retrained model with a different layout must
/// bump the version.
pub const FEATURE_SCHEMA_V1: FeatureSchema = FeatureSchema {
    version: 1,
    field_names: [
        "air_temperature_k",
        "process_temperature_k",
        "rotational_speed_rpm",
        "torque_nm",
        "tool_wear_min",
        "type_l",
        "type_m",
        "power",
        "pad_0",
        "pad_1",
        "pad_2",
        "pad_3",
    ],
    active_fields: 8,
};

// ---------------------------------------------------------------------------
// FeatureVector
// ---------------------------------------------------------------------------

/// A single encoded row, ready for the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FeatureVector([f64; FEATURE_WIDTH]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Derived power column.
    pub fn power(&self) -> f64 {
        self.0[POWER_INDEX]
    }
}

impl From<[f64; FEATURE_WIDTH]> for FeatureVector {
    fn from(values: [f64; FEATURE_WIDTH]) -> Self {
        Self(values)
    }
}

const POWER_INDEX: usize = 7;

// ---------------------------------------------------------------------------
// Encoder
// ---------------------------------------------------------------------------

/// Tunables of the encoder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncoderSettings {
    pub power_divisor: f64,
}

impl Default for EncoderSettings {
    fn default() -> Self {
        Self {
            power_divisor: DEFAULT_POWER_DIVISOR,
        }
    }
}

/// Encode a reading and machine type into a [`FEATURE_SCHEMA_V1`] row.
///
/// Infallible: any numeric input is accepted as-is.
pub fn encode(
    reading: &SensorReading,
    machine_type: MachineType,
    settings: &EncoderSettings,
) -> FeatureVector {
    let flags = machine_type.one_hot();
    FeatureVector([
        reading.air_temp_k,
        reading.process_temp_k,
        reading.rotational_speed_rpm,
        reading.torque_nm,
        reading.tool_wear_min,
        flags.is_l_value(),
        flags.is_m_value(),
        reading.power(settings.power_divisor),
        0.0,
        0.0,
        0.0,
        0.0,
    ])
}
