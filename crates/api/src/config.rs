use std::path::PathBuf;
use std::str::FromStr;

use failguard_core::features::EncoderSettings;
use failguard_core::risk::{RiskThresholds, DEFAULT_HIGH_THRESHOLD, DEFAULT_MODERATE_THRESHOLD};
use failguard_core::sensor::DEFAULT_POWER_DIVISOR;

/// A configuration value that could not be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for running the form locally.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `127.0.0.1`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Path of the ONNX model (default: `model.onnx`).
    pub model_path: PathBuf,
    /// Risk band breakpoints.
    pub thresholds: RiskThresholds,
    /// Power feature settings.
    pub encoder: EncoderSettings,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                 |
    /// |---------------------------|-------------------------|
    /// | `HOST`                    | `127.0.0.1`             |
    /// | `PORT`                    | `3000`                  |
    /// | `MODEL_PATH`              | `model.onnx`            |
    /// | `RISK_MODERATE_THRESHOLD` | `0.40`                  |
    /// | `RISK_HIGH_THRESHOLD`     | `0.70`                  |
    /// | `POWER_DIVISOR`           | `9550`                  |
    /// | `CORS_ORIGINS`            | `http://localhost:3000` |
    /// | `REQUEST_TIMEOUT_SECS`    | `30`                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let port: u16 = parse_or(&lookup, "PORT", 3000)?;
        let model_path = lookup("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("model.onnx"));

        let moderate = parse_or(&lookup, "RISK_MODERATE_THRESHOLD", DEFAULT_MODERATE_THRESHOLD)?;
        let high = parse_or(&lookup, "RISK_HIGH_THRESHOLD", DEFAULT_HIGH_THRESHOLD)?;
        let thresholds = RiskThresholds::new(moderate, high).map_err(|e| ConfigError::Invalid {
            var: "RISK_MODERATE_THRESHOLD/RISK_HIGH_THRESHOLD",
            value: format!("{moderate}/{high}"),
            reason: e.to_string(),
        })?;

        let power_divisor: f64 = parse_or(&lookup, "POWER_DIVISOR", DEFAULT_POWER_DIVISOR)?;
        if !power_divisor.is_finite() || power_divisor <= 0.0 {
            return Err(ConfigError::Invalid {
                var: "POWER_DIVISOR",
                value: power_divisor.to_string(),
                reason: "must be a positive finite number".into(),
            });
        }

        let cors_origins: Vec<String> = lookup("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 30)?;

        Ok(Self {
            host,
            port,
            model_path,
            thresholds,
            encoder: EncoderSettings { power_divisor },
            cors_origins,
            request_timeout_secs,
        })
    }
}

/// Parse `var` if present, otherwise return `default`.
fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}
