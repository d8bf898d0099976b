//! Shared range-checking helpers.
//!
//! Used for configured risk thresholds, boundary input checks and classifier
//! output checks.

use crate::error::CoreError;

/// Validate that a value falls within `[0.0, 1.0]`.
///
/// Returns a `CoreError::Validation` naming the field if out of range.
pub fn validate_unit_range(value: f64, name: &str) -> Result<(), CoreError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{name} must be between 0.0 and 1.0, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a value is a finite number (not NaN or infinite).
pub fn validate_finite(value: f64, name: &str) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

/// Validate that a value survives conversion to the `f32` rows models score.
pub fn validate_single_precision(value: f64, name: &str) -> Result<(), CoreError> {
    if !(value as f32).is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} is out of range, got {value}"
        )));
    }
    Ok(())
}
