use analysis_core::{AnalysisError, RecommendationProvider};
use async_trait::async_trait;

use crate::OllamaClient;

#[async_trait]
impl RecommendationProvider for OllamaClient {
    async fn recommend(&self, prompt: &str) -> Result<String, AnalysisError> {
        Ok(self.generate(prompt).await?)
    }

    fn backend_name(&self) -> &'static str {
        "ollama"
    }
}
