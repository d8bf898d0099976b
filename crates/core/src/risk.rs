//! Risk banding of failure probabilities.
//!
//! Pure logic: turns a probability into a band, a display style and the
//! operator-facing message.

use serde::Serialize;

use crate::error::CoreError;
use crate::threshold_validation::validate_unit_range;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Probability at or above which a machine is `Moderate` risk.
pub const DEFAULT_MODERATE_THRESHOLD: f64 = 0.40;

/// Probability at or above which a machine is `High` risk.
pub const DEFAULT_HIGH_THRESHOLD: f64 = 0.70;

/// Caption shown under every assessment.
pub const ADVISORY_CAPTION: &str =
    "Note: High risk machines should be scheduled for immediate maintenance to avoid breakdowns.";

// ---------------------------------------------------------------------------
// RiskBand
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

/// Visual treatment of a band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStyle {
    Success,
    Warning,
    Error,
}

impl DisplayStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisplayStyle::Success => "success",
            DisplayStyle::Warning => "warning",
            DisplayStyle::Error => "error",
        }
    }
}

impl RiskBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskBand::Low => "low",
            RiskBand::Moderate => "moderate",
            RiskBand::High => "high",
        }
    }

    pub fn style(&self) -> DisplayStyle {
        match self {
            RiskBand::Low => DisplayStyle::Success,
            RiskBand::Moderate => DisplayStyle::Warning,
            RiskBand::High => DisplayStyle::Error,
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            RiskBand::Low => "Low Risk.",
            RiskBand::Moderate => "Moderate Risk.",
            RiskBand::High => "High Risk!",
        }
    }

    /// Whether the advisory caption calls for action on this band.
    pub fn requires_maintenance(&self) -> bool {
        matches!(self, RiskBand::High)
    }
}

// ---------------------------------------------------------------------------
// RiskThresholds
// ---------------------------------------------------------------------------

/// Band breakpoints. Each breakpoint belongs to the higher band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskThresholds {
    pub moderate: f64,
    pub high: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            moderate: DEFAULT_MODERATE_THRESHOLD,
            high: DEFAULT_HIGH_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    /// Both breakpoints in `[0, 1]` and `moderate < high`.
    pub fn new(moderate: f64, high: f64) -> Result<Self, CoreError> {
        validate_unit_range(moderate, "moderate threshold")?;
        validate_unit_range(high, "high threshold")?;
        if moderate >= high {
            return Err(CoreError::Validation(format!(
                "moderate threshold ({moderate}) must be below high threshold ({high})"
            )));
        }
        Ok(Self { moderate, high })
    }

    /// Evaluated high-to-low.
    pub fn classify(&self, probability: f64) -> RiskBand {
        if probability >= self.high {
            RiskBand::High
        } else if probability >= self.moderate {
            RiskBand::Moderate
        } else {
            RiskBand::Low
        }
    }
}

// ---------------------------------------------------------------------------
// RiskAssessment
// ---------------------------------------------------------------------------

/// Presentation-ready outcome of one prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    /// Class-1 probability in `[0, 1]`; also the progress bar fraction.
    pub probability: f64,
    /// Percentage with two decimals, e.g. `"85.00"`.
    pub percent: String,
    pub band: RiskBand,
    pub style: DisplayStyle,
    pub message: String,
    pub advisory: &'static str,
}

impl RiskAssessment {
    pub fn from_probability(probability: f64, thresholds: &RiskThresholds) -> Self {
        let band = thresholds.classify(probability);
        let percent = format_percent(probability);
        Self {
            probability,
            message: format!(
                "{} Machine Failure Probability: {percent}%",
                band.headline()
            ),
            percent,
            band,
            style: band.style(),
            advisory: ADVISORY_CAPTION,
        }
    }
}

/// `0.8512` -> `"85.12"`.
pub fn format_percent(probability: f64) -> String {
    format!("{:.2}", probability * 100.0)
}
