//! Domain logic for machine failure risk scoring.
//!
//! Everything in this crate is pure apart from reading the ONNX model from
//! disk. The HTTP layer lives in `failguard-api`.

pub mod assessor;
pub mod error;
pub mod features;
pub mod machine;
pub mod model;
pub mod risk;
pub mod sensor;
pub mod threshold_validation;
