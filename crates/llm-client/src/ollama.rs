use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{LlmError, LlmResult};
use crate::LlmConfig;

/// Low temperature keeps recommendations consistent between runs
pub const DEFAULT_TEMPERATURE: f32 = 0.2;
pub const DEFAULT_NUM_PREDICT: u32 = 1000;

/// Sampling options forwarded verbatim to `/api/generate`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            num_predict: DEFAULT_NUM_PREDICT,
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    options: GenerateOptions,
}

impl OllamaClient {
    pub fn new(config: LlmConfig) -> LlmResult<Self> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
            options: GenerateOptions::default(),
        })
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }

    /// Single non-streaming completion; returns the trimmed response text
    pub async fn generate(&self, prompt: &str) -> LlmResult<String> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            options: self.options,
        };

        debug!("Sending {} prompt chars to {} ({})", prompt.len(), self.base_url, self.model);

        let response = self
            .client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(LlmError::ServiceUnavailable(format!(
                "Status: {} {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        let body = response.text().await?;
        let text = parse_generate_response(&body)?;
        Ok(text)
    }
}

fn parse_generate_response(body: &str) -> LlmResult<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)?;

    if let (Some(prompt_tokens), Some(completion_tokens)) = (parsed.prompt_eval_count, parsed.eval_count) {
        info!("Token usage - prompt: {}, completion: {}", prompt_tokens, completion_tokens);
    }

    let text = parsed.response.trim();
    if text.is_empty() {
        return Err(LlmError::InvalidResponse("empty completion".to_string()));
    }
    Ok(text.to_string())
}
