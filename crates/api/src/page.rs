//! Server-side rendering of the single-page prediction form.
//!
//! The page is plain HTML with a small inline script that keeps the power
//! read-out in sync while the operator types. The value rendered by the
//! server is authoritative.

use std::fmt::{self, Write};

use failguard_core::machine::MachineType;
use failguard_core::risk::RiskAssessment;
use failguard_core::sensor::{SensorReading, SENSOR_FIELDS};

pub const PAGE_TITLE: &str = "Machine Failure Prediction";

/// Shown when a prediction could not be produced.
pub const FAILURE_NOTICE: &str =
    "The prediction could not be completed. Please try again or contact the maintainer of the model.";

/// What the result panel shows, if anything.
#[derive(Debug, Clone)]
pub enum Outcome {
    Assessment(RiskAssessment),
    /// Inference failed; details are logged, not shown.
    Failure,
    /// The submitted form could not be parsed.
    Invalid(String),
}

/// Everything needed to render the page.
#[derive(Debug, Clone)]
pub struct PageView {
    /// Input values in [`SENSOR_FIELDS`] order, as they should appear in the form.
    pub values: [String; 5],
    pub machine_type: MachineType,
    /// Power for the current values; `None` when they do not parse.
    pub power: Option<f64>,
    pub power_divisor: f64,
    pub outcome: Option<Outcome>,
}

impl PageView {
    /// View for a reading with no result panel.
    pub fn for_reading(
        reading: &SensorReading,
        machine_type: MachineType,
        power_divisor: f64,
    ) -> Self {
        Self {
            values: SENSOR_FIELDS.map(|f| f.get(reading).to_string()),
            machine_type,
            power: Some(reading.power(power_divisor)),
            power_divisor,
            outcome: None,
        }
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = Some(outcome);
        self
    }
}

/// Escape text for use in HTML element content and attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
aside { width: 18rem; padding: 1.5rem; background: #f0f2f6; }
main { flex: 1; padding: 2rem 3rem; max-width: 46rem; }
label { display: block; margin-top: 0.8rem; font-size: 0.9rem; }
input, select { width: 100%; padding: 0.3rem; box-sizing: border-box; }
button { margin-top: 1rem; padding: 0.5rem 1.2rem; font-size: 1rem; cursor: pointer; }
progress { width: 100%; height: 1rem; }
.alert { padding: 0.8rem 1rem; border-radius: 0.4rem; margin: 1rem 0; }
.alert-error { background: #ffe0e0; color: #7d1a1a; }
.alert-warning { background: #fff4d6; color: #6b4e00; }
.alert-success { background: #ddf5e3; color: #185c2c; }
.caption { font-size: 0.85rem; color: #666; font-style: italic; }
.caption-urgent { color: #7d1a1a; font-style: normal; }
"#;

const POWER_SCRIPT: &str = r#"
(function () {
  var torque = document.getElementById('torque_nm');
  var speed = document.getElementById('rotational_speed_rpm');
  var out = document.getElementById('power');
  var divisor = parseFloat(out.dataset.divisor);
  function update() {
    var t = parseFloat(torque.value), s = parseFloat(speed.value);
    out.textContent = (isFinite(t) && isFinite(s)) ? (t * s / divisor).toFixed(2) : '-';
  }
  torque.addEventListener('input', update);
  speed.addEventListener('input', update);
})();
"#;

/// Render the full HTML document.
pub fn render(view: &PageView) -> String {
    let mut html = String::with_capacity(4096);
    if let Err(e) = write_document(&mut html, view) {
        tracing::error!(error = %e, "Page rendering failed");
    }
    html
}

fn write_document(html: &mut String, view: &PageView) -> fmt::Result {
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html lang=\"en\">")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\">")?;
    writeln!(html, "<title>{PAGE_TITLE}</title>")?;
    writeln!(html, "<style>{STYLE}</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;

    write_sidebar(html, view)?;

    writeln!(html, "<main>")?;
    writeln!(html, "<h1>{PAGE_TITLE}</h1>")?;
    writeln!(
        html,
        "<p>Enter the machine sensor readings to predict the <strong>failure risk</strong>:</p>"
    )?;
    writeln!(html, "<hr>")?;
    writeln!(
        html,
        "<button type=\"submit\" form=\"predict-form\">Predict Machine Failure</button>"
    )?;

    if let Some(outcome) = &view.outcome {
        write_outcome(html, outcome)?;
    }

    writeln!(html, "</main>")?;
    writeln!(html, "<script>{POWER_SCRIPT}</script>")?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")
}

fn write_sidebar(html: &mut String, view: &PageView) -> fmt::Result {
    writeln!(html, "<aside>")?;
    writeln!(html, "<h3>Sensor Inputs</h3>")?;
    writeln!(html, "<form id=\"predict-form\" method=\"post\" action=\"/\">")?;

    for (field, value) in SENSOR_FIELDS.iter().zip(&view.values) {
        writeln!(
            html,
            "<label for=\"{key}\">{label}</label>",
            key = field.key,
            label = escape(field.label),
        )?;
        writeln!(
            html,
            "<input type=\"number\" id=\"{key}\" name=\"{key}\" step=\"{step}\" value=\"{value}\">",
            key = field.key,
            step = field.step,
            value = escape(value),
        )?;
    }

    writeln!(html, "<label for=\"machine_type\">Machine Type</label>")?;
    writeln!(html, "<select id=\"machine_type\" name=\"machine_type\">")?;
    for option in MachineType::ALL {
        let selected = if option == view.machine_type {
            " selected"
        } else {
            ""
        };
        writeln!(html, "<option value=\"{option}\"{selected}>{option}</option>")?;
    }
    writeln!(html, "</select>")?;
    writeln!(html, "</form>")?;

    let power = view
        .power
        .map(|p| format!("{p:.2}"))
        .unwrap_or_else(|| "-".to_string());
    writeln!(
        html,
        "<p>Auto-calculated Power: <code id=\"power\" data-divisor=\"{divisor}\">{power}</code></p>",
        divisor = view.power_divisor,
    )?;
    writeln!(html, "</aside>")
}

fn write_outcome(html: &mut String, outcome: &Outcome) -> fmt::Result {
    match outcome {
        Outcome::Assessment(assessment) => {
            writeln!(
                html,
                "<section class=\"result\" data-band=\"{}\">",
                assessment.band.as_str()
            )?;
            writeln!(html, "<h2>Failure Risk Assessment:</h2>")?;
            writeln!(
                html,
                "<progress value=\"{p}\" max=\"1\">{percent}%</progress>",
                p = assessment.probability,
                percent = assessment.percent,
            )?;
            writeln!(
                html,
                "<div class=\"alert alert-{}\" role=\"alert\">{}</div>",
                assessment.style.as_str(),
                escape(&assessment.message),
            )?;
            if assessment.band.requires_maintenance() {
                writeln!(
                    html,
                    "<p class=\"caption caption-urgent\"><strong>{}</strong></p>",
                    escape(assessment.advisory),
                )?;
            } else {
                writeln!(html, "<p class=\"caption\">{}</p>", escape(assessment.advisory))?;
            }
            writeln!(html, "</section>")
        }
        Outcome::Failure => write_notice(html, "error", FAILURE_NOTICE),
        Outcome::Invalid(message) => write_notice(html, "warning", message),
    }
}

fn write_notice(html: &mut String, style: &str, message: &str) -> fmt::Result {
    writeln!(html, "<section class=\"result\">")?;
    writeln!(
        html,
        "<div class=\"alert alert-{style}\" role=\"alert\">{}</div>",
        escape(message)
    )?;
    writeln!(html, "</section>")
}

#[cfg(test)]
mod tests {
    use failguard_core::risk::RiskThresholds;
    use failguard_core::sensor::DEFAULT_POWER_DIVISOR;

    use super::*;

    fn default_view() -> PageView {
        PageView::for_reading(
            &SensorReading::default(),
            MachineType::default(),
            DEFAULT_POWER_DIVISOR,
        )
    }

    #[test]
    fn form_is_prefilled_with_defaults() {
        let html = render(&default_view());
        assert!(html.contains(r#"name="air_temp_k" step="1" value="300""#));
        assert!(html.contains(r#"name="rotational_speed_rpm" step="10" value="1500""#));
        assert!(html.contains(r#"<option value="L" selected>L</option>"#));
        assert!(html.contains(">7.85</code>"));
        assert!(!html.contains("class=\"result\""));
    }

    #[test]
    fn high_risk_result_is_error_styled() {
        let assessment = RiskAssessment::from_probability(0.85, &RiskThresholds::default());
        let html = render(&default_view().with_outcome(Outcome::Assessment(assessment)));
        assert!(html.contains("alert-error"));
        assert!(html.contains("High Risk! Machine Failure Probability: 85.00%"));
        assert!(html.contains("scheduled for immediate maintenance"));
        assert!(html.contains(r#"<progress value="0.85" max="1">"#));
    }

    #[test]
    fn only_high_risk_emphasizes_the_advisory() {
        let thresholds = RiskThresholds::default();

        let high = RiskAssessment::from_probability(0.91, &thresholds);
        let html = render(&default_view().with_outcome(Outcome::Assessment(high)));
        assert!(html.contains(r#"<p class="caption caption-urgent"><strong>Note:"#));

        for p in [0.55, 0.05] {
            let assessment = RiskAssessment::from_probability(p, &thresholds);
            let html = render(&default_view().with_outcome(Outcome::Assessment(assessment)));
            assert!(html.contains(r#"<p class="caption">Note:"#), "p = {p}");
            assert!(!html.contains("caption-urgent\"><strong>"), "p = {p}");
        }
    }

    #[test]
    fn invalid_input_is_escaped() {
        let mut view = default_view().with_outcome(Outcome::Invalid("<b>bad</b>".into()));
        view.values[0] = "\"><script>".into();
        let html = render(&view);
        assert!(html.contains("&lt;b&gt;bad&lt;/b&gt;"));
        assert!(html.contains("value=\"&quot;&gt;&lt;script&gt;\""));
    }

    #[test]
    fn failure_notice_hides_details() {
        let html = render(&default_view().with_outcome(Outcome::Failure));
        assert!(html.contains("could not be completed"));
    }
}
