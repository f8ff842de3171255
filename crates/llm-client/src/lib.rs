pub mod error;
pub mod ollama;
pub mod provider;

pub use error::{LlmError, LlmResult};
pub use ollama::{GenerateOptions, OllamaClient};

use std::time::Duration;

/// Configuration for the local inference service
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: std::env::var("OLLAMA_URL")
                .unwrap_or_else(|_| "http://localhost:11434".to_string()),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string()),
            timeout: std::env::var("INFERENCE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(300)),
        }
    }
}
