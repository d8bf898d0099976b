//! Handlers for the interactive form page.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Form;
use failguard_core::error::CoreError;
use failguard_core::machine::MachineType;
use failguard_core::sensor::{SensorReading, SENSOR_FIELDS};
use serde::Deserialize;

use crate::error::AppError;
use crate::page::{render, Outcome, PageView};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Form payload
// ---------------------------------------------------------------------------

/// Raw form submission. Values stay textual so bad input can be echoed back.
#[derive(Debug, Default, Deserialize)]
pub struct PredictForm {
    pub air_temp_k: Option<String>,
    pub process_temp_k: Option<String>,
    pub rotational_speed_rpm: Option<String>,
    pub torque_nm: Option<String>,
    pub tool_wear_min: Option<String>,
    pub machine_type: Option<String>,
}

impl PredictForm {
    /// Sensor values in `SENSOR_FIELDS` order.
    fn raw_values(&self) -> [Option<&str>; 5] {
        [
            self.air_temp_k.as_deref(),
            self.process_temp_k.as_deref(),
            self.rotational_speed_rpm.as_deref(),
            self.torque_nm.as_deref(),
            self.tool_wear_min.as_deref(),
        ]
    }

    /// Parse into a reading and machine type. Blank fields take defaults.
    pub fn parse(&self, power_divisor: f64) -> Result<(SensorReading, MachineType), CoreError> {
        let mut values = [0.0; 5];
        for ((slot, field), raw) in values.iter_mut().zip(&SENSOR_FIELDS).zip(self.raw_values()) {
            *slot = match raw.map(str::trim).filter(|s| !s.is_empty()) {
                None => field.default,
                Some(text) => text.parse::<f64>().map_err(|_| {
                    CoreError::Validation(format!("{} must be a number, got '{text}'", field.label))
                })?,
            };
        }
        let [air_temp_k, process_temp_k, rotational_speed_rpm, torque_nm, tool_wear_min] = values;
        let reading = SensorReading {
            air_temp_k,
            process_temp_k,
            rotational_speed_rpm,
            torque_nm,
            tool_wear_min,
        };
        reading.validate(power_divisor)?;

        let machine_type = match self.machine_type.as_deref() {
            None | Some("") => MachineType::default(),
            Some(text) => text.parse()?,
        };
        Ok((reading, machine_type))
    }
}

// ---------------------------------------------------------------------------
// GET /
// ---------------------------------------------------------------------------

/// Render the form with default values and no result.
pub async fn show_form(State(state): State<AppState>) -> Html<String> {
    let view = PageView::for_reading(
        &SensorReading::default(),
        MachineType::default(),
        state.config.encoder.power_divisor,
    );
    Html(render(&view))
}

// ---------------------------------------------------------------------------
// POST /
// ---------------------------------------------------------------------------

/// Run one encode-infer-render cycle for the submitted values.
///
/// Always answers with the page: 200 with the assessment, 400 with a
/// validation notice, 500 with a generic failure notice.
pub async fn submit_form(
    State(state): State<AppState>,
    Form(form): Form<PredictForm>,
) -> impl IntoResponse {
    let divisor = state.config.encoder.power_divisor;

    let (reading, machine_type) = match form.parse(divisor) {
        Ok(parsed) => parsed,
        Err(err) => {
            tracing::debug!(error = %err, "Rejected form submission");
            let view = PageView {
                values: form.raw_values().map(|v| v.unwrap_or_default().to_string()),
                machine_type: form
                    .machine_type
                    .as_deref()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or_default(),
                power: None,
                power_divisor: divisor,
                outcome: None,
            };
            let (status, _, message) = AppError::from(err).classify();
            return (status, Html(render(&view.with_outcome(Outcome::Invalid(message)))));
        }
    };

    let view = PageView::for_reading(&reading, machine_type, divisor);
    match state.assessor.predict(&reading, machine_type) {
        Ok(prediction) => (
            StatusCode::OK,
            Html(render(
                &view.with_outcome(Outcome::Assessment(prediction.assessment)),
            )),
        ),
        Err(err) => {
            let (status, _, _) = AppError::from(err).classify();
            (status, Html(render(&view.with_outcome(Outcome::Failure))))
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use failguard_core::sensor::DEFAULT_POWER_DIVISOR;

    use super::*;

    fn form(pairs: &[(&str, &str)]) -> PredictForm {
        let mut form = PredictForm::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "air_temp_k" => form.air_temp_k = value,
                "process_temp_k" => form.process_temp_k = value,
                "rotational_speed_rpm" => form.rotational_speed_rpm = value,
                "torque_nm" => form.torque_nm = value,
                "tool_wear_min" => form.tool_wear_min = value,
                "machine_type" => form.machine_type = value,
                other => panic!("unknown field {other}"),
            }
        }
        form
    }

    #[test]
    fn empty_form_parses_to_defaults() {
        let (reading, machine_type) = PredictForm::default().parse(DEFAULT_POWER_DIVISOR).unwrap();
        assert_eq!(reading, SensorReading::default());
        assert_eq!(machine_type, MachineType::L);
    }

    #[test]
    fn parses_submitted_values() {
        let (reading, machine_type) = form(&[
            ("torque_nm", " 61.5 "),
            ("rotational_speed_rpm", "1200"),
            ("machine_type", "H"),
        ])
        .parse(DEFAULT_POWER_DIVISOR)
        .unwrap();
        assert_eq!(reading.torque_nm, 61.5);
        assert_eq!(reading.rotational_speed_rpm, 1200.0);
        assert_eq!(reading.air_temp_k, 300.0);
        assert_eq!(machine_type, MachineType::H);
    }

    #[test]
    fn rejects_text_in_numeric_field() {
        assert_matches!(
            form(&[("torque_nm", "lots")]).parse(DEFAULT_POWER_DIVISOR),
            Err(CoreError::Validation(msg)) if msg.contains("Torque [Nm]")
        );
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert_matches!(
            form(&[("tool_wear_min", "inf")]).parse(DEFAULT_POWER_DIVISOR),
            Err(CoreError::Validation(_))
        );
        assert_matches!(
            form(&[("air_temp_k", "NaN")]).parse(DEFAULT_POWER_DIVISOR),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn rejects_unknown_machine_type() {
        assert_matches!(
            form(&[("machine_type", "Z")]).parse(DEFAULT_POWER_DIVISOR),
            Err(CoreError::Validation(_))
        );
    }
}
