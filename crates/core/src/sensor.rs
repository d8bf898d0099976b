//! Raw sensor readings and the derived power feature.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::threshold_validation::{validate_finite, validate_single_precision};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Divisor turning `torque [Nm] * speed [rpm]` into kilowatts.
pub const DEFAULT_POWER_DIVISOR: f64 = 9550.0;

pub const DEFAULT_AIR_TEMP_K: f64 = 300.0;
pub const DEFAULT_PROCESS_TEMP_K: f64 = 305.0;
pub const DEFAULT_ROTATIONAL_SPEED_RPM: f64 = 1500.0;
pub const DEFAULT_TORQUE_NM: f64 = 50.0;
pub const DEFAULT_TOOL_WEAR_MIN: f64 = 10.0;

// ---------------------------------------------------------------------------
// SensorReading
// ---------------------------------------------------------------------------

/// The five continuous sensor values entered by the operator.
///
/// No physical bounds are enforced. Missing fields in a serialized reading
/// take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorReading {
    pub air_temp_k: f64,
    pub process_temp_k: f64,
    pub rotational_speed_rpm: f64,
    pub torque_nm: f64,
    pub tool_wear_min: f64,
}

impl Default for SensorReading {
    fn default() -> Self {
        Self {
            air_temp_k: DEFAULT_AIR_TEMP_K,
            process_temp_k: DEFAULT_PROCESS_TEMP_K,
            rotational_speed_rpm: DEFAULT_ROTATIONAL_SPEED_RPM,
            torque_nm: DEFAULT_TORQUE_NM,
            tool_wear_min: DEFAULT_TOOL_WEAR_MIN,
        }
    }
}

impl SensorReading {
    /// Mechanical power approximation for this reading.
    pub fn power(&self, divisor: f64) -> f64 {
        power(self.torque_nm, self.rotational_speed_rpm, divisor)
    }

    /// Reject readings the encoder would turn into unusable features.
    ///
    /// Every value, including the power derived with `divisor`, must be
    /// finite and representable as `f32`. The encoder accepts anything; this
    /// check is applied where readings enter the system from text.
    pub fn validate(&self, divisor: f64) -> Result<(), CoreError> {
        for field in &SENSOR_FIELDS {
            let value = field.get(self);
            validate_finite(value, field.key)?;
            validate_single_precision(value, field.key)?;
        }
        validate_single_precision(
            self.power(divisor),
            "power derived from torque_nm and rotational_speed_rpm",
        )
    }
}

/// `torque * rotational_speed / divisor`.
pub fn power(torque_nm: f64, rotational_speed_rpm: f64, divisor: f64) -> f64 {
    torque_nm * rotational_speed_rpm / divisor
}

// ---------------------------------------------------------------------------
// Field metadata
// ---------------------------------------------------------------------------

/// Describes one numeric input of the form.
#[derive(Clone, Copy)]
pub struct SensorField {
    /// Wire name, used for form fields and JSON keys.
    pub key: &'static str,
    pub label: &'static str,
    pub default: f64,
    pub step: f64,
    accessor: fn(&SensorReading) -> f64,
}

impl std::fmt::Debug for SensorField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SensorField")
            .field("key", &self.key)
            .field("default", &self.default)
            .field("step", &self.step)
            .finish()
    }
}

impl SensorField {
    pub fn get(&self, reading: &SensorReading) -> f64 {
        (self.accessor)(reading)
    }
}

/// Form inputs in display order.
pub const SENSOR_FIELDS: [SensorField; 5] = [
    SensorField {
        key: "air_temp_k",
        label: "Air Temperature [K]",
        default: DEFAULT_AIR_TEMP_K,
        step: 1.0,
        accessor: |r| r.air_temp_k,
    },
    SensorField {
        key: "process_temp_k",
        label: "Process Temperature [K]",
        default: DEFAULT_PROCESS_TEMP_K,
        step: 1.0,
        accessor: |r| r.process_temp_k,
    },
    SensorField {
        key: "rotational_speed_rpm",
        label: "Rotational Speed [rpm]",
        default: DEFAULT_ROTATIONAL_SPEED_RPM,
        step: 10.0,
        accessor: |r| r.rotational_speed_rpm,
    },
    SensorField {
        key: "torque_nm",
        label: "Torque [Nm]",
        default: DEFAULT_TORQUE_NM,
        step: 1.0,
        accessor: |r| r.torque_nm,
    },
    SensorField {
        key: "tool_wear_min",
        label: "Tool Wear [min]",
        default: DEFAULT_TOOL_WEAR_MIN,
        step: 1.0,
        accessor: |r| r.tool_wear_min,
    },
];

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn default_power_matches_hand_computation() {
        let reading = SensorReading::default();
        let p = reading.power(DEFAULT_POWER_DIVISOR);
        assert_eq!(p, 75_000.0 / 9550.0);
        assert_eq!(format!("{p:.2}"), "7.85");
    }

    #[test]
    fn power_is_zero_when_machine_is_stopped() {
        assert_eq!(power(60.0, 0.0, DEFAULT_POWER_DIVISOR), 0.0);
    }

    #[test]
    fn custom_divisor_is_honoured() {
        assert_eq!(power(10.0, 100.0, 1000.0), 1.0);
    }

    #[test]
    fn field_defaults_match_struct_default() {
        let reading = SensorReading::default();
        for field in &SENSOR_FIELDS {
            assert_eq!(field.get(&reading), field.default, "{}", field.key);
        }
    }

    #[test]
    fn missing_json_fields_take_defaults() {
        let reading: SensorReading = serde_json::from_str(r#"{"torque_nm": 42.0}"#).unwrap();
        assert_eq!(reading.torque_nm, 42.0);
        assert_eq!(reading.air_temp_k, DEFAULT_AIR_TEMP_K);
    }

    #[test]
    fn out_of_range_physical_values_are_accepted() {
        let reading = SensorReading {
            air_temp_k: -5.0,
            ..SensorReading::default()
        };
        assert!(reading.validate(DEFAULT_POWER_DIVISOR).is_ok());
    }

    #[test]
    fn non_finite_values_are_rejected() {
        let reading = SensorReading {
            rotational_speed_rpm: f64::NAN,
            ..SensorReading::default()
        };
        assert_matches!(reading.validate(DEFAULT_POWER_DIVISOR), Err(CoreError::Validation(msg)) if msg.contains("rotational_speed_rpm"));
    }

    #[test]
    fn overflowing_power_is_rejected() {
        let reading = SensorReading {
            torque_nm: 1e200,
            rotational_speed_rpm: 1e200,
            ..SensorReading::default()
        };
        assert_matches!(
            reading.validate(DEFAULT_POWER_DIVISOR),
            Err(CoreError::Validation(msg)) if msg.contains("torque_nm")
        );
    }

    #[test]
    fn power_beyond_single_precision_is_rejected() {
        // Both inputs fit in f32, their product does not.
        let reading = SensorReading {
            torque_nm: 1e30,
            rotational_speed_rpm: 1e30,
            ..SensorReading::default()
        };
        assert!(reading.power(DEFAULT_POWER_DIVISOR).is_finite());
        assert_matches!(
            reading.validate(DEFAULT_POWER_DIVISOR),
            Err(CoreError::Validation(msg)) if msg.contains("torque_nm") && msg.contains("rotational_speed_rpm")
        );
    }
}
