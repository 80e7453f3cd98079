use async_trait::async_trait;
use serde_json::Value;

use crate::config::Settings;
use crate::llm::openai::OpenAiClient;
use crate::{OutlineError, Result};

/// One call to the generation service.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub instructions: &'a str,
    pub input: &'a str,
    pub max_output_tokens: u32,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send one request and return the raw upstream payload.
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Value>;
}

/// Build an LLM provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiClient::from_settings(settings)?)),
        other => Err(OutlineError::Config(format!(
            "Unsupported llm.provider '{}'. Supported providers: openai",
            other
        ))),
    }
}
