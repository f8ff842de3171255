use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type LlmResult<T> = Result<T, LlmError>;

impl From<LlmError> for analysis_core::AnalysisError {
    fn from(err: LlmError) -> Self {
        analysis_core::AnalysisError::Inference(err.to_string())
    }
}
