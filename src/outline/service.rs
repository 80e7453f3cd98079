//! Outline request handler
//!
//! Method dispatch and the generate pipeline: validate, prompt, call upstream
//! (retrying once in compact mode on truncation), extract, decode, stamp.

use axum::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, CACHE_CONTROL, CONTENT_TYPE,
};
use axum::http::{HeaderMap, Method, StatusCode};
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::llm::{build_provider, GenerationRequest, LlmProvider};
use crate::outline::{deck, extract, prompt, FounderInput};
use crate::{OutlineError, Result, VERSION};

const ALLOWED_METHODS: &str = "POST,GET,OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Body of the GET health probe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HealthReport {
    pub ok: bool,
    pub version: String,
    pub model: String,
    #[serde(rename = "hasKey")]
    pub has_key: bool,
}

/// A finished HTTP answer, independent of the server framework.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl Reply {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Shared, immutable request handler.
#[derive(Clone)]
pub struct OutlineService {
    settings: Arc<Settings>,
    provider: Option<Arc<dyn LlmProvider>>,
    allow_origin: HeaderValue,
}

impl OutlineService {
    /// Build the service from settings. A missing credential is not fatal here;
    /// generate requests fail with a configuration error instead.
    pub fn from_settings(mut settings: Settings) -> Result<Self> {
        settings.normalize();
        let allow_origin = allow_origin(&settings)?;
        let provider: Option<Arc<dyn LlmProvider>> = match build_provider(&settings) {
            Ok(provider) => Some(Arc::from(provider)),
            Err(OutlineError::MissingApiKey) => {
                warn!("No API key configured; outline generation is disabled");
                None
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            settings: Arc::new(settings),
            provider,
            allow_origin,
        })
    }

    /// Build the service around an existing provider.
    pub fn with_provider(mut settings: Settings, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        settings.normalize();
        let allow_origin = allow_origin(&settings)?;

        Ok(Self {
            settings: Arc::new(settings),
            provider: Some(provider),
            allow_origin,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            ok: true,
            version: VERSION.to_string(),
            model: self.settings.llm.model.clone(),
            has_key: self.provider.is_some(),
        }
    }

    /// Answer one HTTP request.
    pub async fn handle(&self, method: &Method, body: &[u8]) -> Reply {
        let result = if *method == Method::OPTIONS {
            return self.reply(StatusCode::NO_CONTENT, String::new());
        } else if *method == Method::GET {
            serde_json::to_value(self.health()).map_err(|e| OutlineError::Internal(e.to_string()))
        } else if *method == Method::POST {
            self.generate(body).await
        } else {
            Err(OutlineError::MethodNotAllowed)
        };

        match result {
            Ok(document) => self.json_reply(&document),
            Err(e) => {
                let status = e.status();
                if status.is_server_error() {
                    warn!(%status, error = %e, "Request failed");
                } else {
                    debug!(%status, error = %e, "Request rejected");
                }
                let mut reply = self.reply(status, e.to_string());
                reply.headers.insert(
                    CONTENT_TYPE,
                    HeaderValue::from_static("text/plain; charset=utf-8"),
                );
                reply
            }
        }
    }

    /// Run the generate pipeline on a raw request body.
    pub async fn generate(&self, body: &[u8]) -> Result<Value> {
        let provider = self.provider.as_ref().ok_or(OutlineError::MissingApiKey)?;
        let input = FounderInput::from_body(body)?;

        info!(startup = %input.startup, tone = %input.tone, "Generating outline");

        let payload = self.call_upstream(&**provider, &input).await?;

        let text = extract::extract_text(&payload).ok_or_else(|| OutlineError::EmptyOutput {
            preview: extract::preview(&payload.to_string()),
        })?;

        let mut document: Value =
            serde_json::from_str(&text).map_err(|_| OutlineError::InvalidModelJson {
                preview: extract::preview(&text),
            })?;

        if deck::stamp_created_at(&mut document, Utc::now()) {
            for finding in deck::inspect(&document) {
                warn!(%finding, "Outline departs from the requested shape");
            }
        }

        Ok(document)
    }

    /// First attempt with the full budget, then at most one compact retry when
    /// the first attempt ran out of output tokens.
    async fn call_upstream(&self, provider: &dyn LlmProvider, input: &FounderInput) -> Result<Value> {
        let llm = &self.settings.llm;
        let instructions = prompt::system_prompt();
        let user = prompt::user_prompt(input);

        let payload = provider
            .generate(GenerationRequest {
                instructions: &instructions,
                input: &user,
                max_output_tokens: llm.max_output_tokens,
            })
            .await?;

        if !extract::is_truncated(&payload) {
            return Ok(payload);
        }

        if !llm.retry_on_truncation {
            warn!(
                max_output_tokens = llm.max_output_tokens,
                "Upstream output truncated; compact retry disabled"
            );
            return Ok(payload);
        }

        warn!(
            max_output_tokens = llm.max_output_tokens,
            retry_max_output_tokens = llm.compact_max_output_tokens,
            "Upstream output truncated; retrying in compact mode"
        );

        let compact = prompt::compact_system_prompt();
        provider
            .generate(GenerationRequest {
                instructions: &compact,
                input: &user,
                max_output_tokens: llm.compact_max_output_tokens,
            })
            .await
    }

    fn reply(&self, status: StatusCode, body: String) -> Reply {
        let mut headers = HeaderMap::new();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        );

        Reply {
            status,
            headers,
            body,
        }
    }

    fn json_reply(&self, document: &Value) -> Reply {
        let mut reply = self.reply(StatusCode::OK, document.to_string());
        reply
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        reply
            .headers
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        reply
    }
}

fn allow_origin(settings: &Settings) -> Result<HeaderValue> {
    let origin = settings.server.allowed_origin.trim();
    HeaderValue::from_str(origin).map_err(|_| {
        OutlineError::Config(format!(
            "Invalid server.allowed_origin {:?}: not a valid header value",
            settings.server.allowed_origin
        ))
    })
}
