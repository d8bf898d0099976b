use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The classifier could not be loaded. Fatal at startup.
    #[error("Model unavailable at {}: {reason}", path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}

impl CoreError {
    pub fn model_unavailable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ModelUnavailable {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
