use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::Settings;
use crate::llm::client::{GenerationRequest, LlmProvider};
use crate::{OutlineError, Result};

const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-5-mini";

/// Client for the OpenAI Responses API.
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
}

impl OpenAiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(OutlineError::MissingApiKey);
        }

        let model = if settings.llm.model.trim().is_empty() {
            DEFAULT_OPENAI_MODEL.to_string()
        } else {
            settings.llm.model.trim().to_string()
        };

        let endpoint = if settings.llm.endpoint.trim().is_empty() {
            DEFAULT_OPENAI_ENDPOINT.to_string()
        } else {
            settings
                .llm
                .endpoint
                .trim()
                .trim_end_matches('/')
                .to_string()
        };

        let mut builder = Client::builder();
        if settings.llm.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.llm.timeout_secs));
        }
        let http = builder
            .build()
            .map_err(|e| OutlineError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model,
            endpoint,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/responses", self.endpoint)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl LlmProvider for OpenAiClient {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<Value> {
        let body = ResponsesRequest {
            model: &self.model,
            instructions: request.instructions,
            input: request.input,
            text: TextOptions {
                format: TextFormat {
                    kind: "json_object",
                },
            },
            max_output_tokens: request.max_output_tokens,
        };

        tracing::debug!(
            model = %self.model,
            max_output_tokens = request.max_output_tokens,
            "Sending request to OpenAI"
        );

        let response = self
            .http
            .post(self.request_url())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OutlineError::Upstream(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| OutlineError::Upstream(e.to_string()))?;

        if !status.is_success() {
            tracing::error!(%status, "OpenAI returned an error status");
            return Err(OutlineError::Upstream(text));
        }

        serde_json::from_str(&text).map_err(|e| {
            OutlineError::Internal(format!("Failed to parse OpenAI response: {}", e))
        })
    }
}

#[derive(Debug, Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    instructions: &'a str,
    input: &'a str,
    text: TextOptions,
    max_output_tokens: u32,
}

#[derive(Debug, Serialize)]
struct TextOptions {
    format: TextFormat,
}

#[derive(Debug, Serialize)]
struct TextFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings_with_key() -> Settings {
        let mut settings = Settings::default();
        settings.llm.api_key = "sk-test".to_string();
        settings
    }

    #[test]
    fn trailing_slash_is_trimmed_from_endpoint() {
        let mut settings = settings_with_key();
        settings.llm.endpoint = "http://127.0.0.1:9000/v1/".to_string();

        let client = OpenAiClient::from_settings(&settings).expect("client");
        assert_eq!(client.request_url(), "http://127.0.0.1:9000/v1/responses");
    }

    #[test]
    fn blank_model_falls_back_to_default() {
        let mut settings = settings_with_key();
        settings.llm.model = "  ".to_string();

        let client = OpenAiClient::from_settings(&settings).expect("client");
        assert_eq!(client.model(), DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn request_body_constrains_output_to_json_object() {
        let body = ResponsesRequest {
            model: "gpt-5-mini",
            instructions: "sys",
            input: "user",
            text: TextOptions {
                format: TextFormat {
                    kind: "json_object",
                },
            },
            max_output_tokens: 2000,
        };

        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(value["text"]["format"]["type"], "json_object");
        assert_eq!(value["max_output_tokens"], 2000);
        assert_eq!(value["instructions"], "sys");
        assert_eq!(value["input"], "user");
    }
}
