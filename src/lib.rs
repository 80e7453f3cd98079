//! deck-outline - Turns founder-supplied startup facts into a seed-stage pitch deck outline
//!
//! One HTTP endpoint: validate the founder input, prompt the upstream model for a JSON
//! outline, extract and decode what comes back, stamp it and return it.

pub mod cli;
pub mod config;
pub mod llm;
pub mod outline;
pub mod server;

use axum::http::StatusCode;
use thiserror::Error;

/// Main error type for deck-outline
///
/// Every variant maps onto the HTTP status the endpoint answers with; the
/// `Display` text is the plain-text body sent to the caller.
#[derive(Error, Debug)]
pub enum OutlineError {
    #[error("Missing OPENAI_API_KEY")]
    MissingApiKey,

    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Bad JSON")]
    BadJson,

    #[error("Missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Empty model output: {preview}")]
    EmptyOutput { preview: String },

    #[error("Model did not return valid JSON: {preview}")]
    InvalidModelJson { preview: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Server error: {0}")]
    Internal(String),
}

impl OutlineError {
    /// HTTP status the endpoint reports for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::Config(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::BadJson | Self::MissingFields(_) => StatusCode::BAD_REQUEST,
            Self::Upstream(_) | Self::EmptyOutput { .. } | Self::InvalidModelJson { .. } => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, OutlineError>;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "deck-outline";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_message_lists_every_field() {
        let err = OutlineError::MissingFields(vec!["startup".into(), "problem".into()]);
        assert_eq!(err.to_string(), "Missing: startup, problem");
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn upstream_failures_map_to_bad_gateway() {
        assert_eq!(
            OutlineError::Upstream("boom".into()).status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            OutlineError::EmptyOutput {
                preview: String::new()
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            OutlineError::InvalidModelJson {
                preview: String::new()
            }
            .status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn configuration_failures_map_to_server_error() {
        assert_eq!(
            OutlineError::MissingApiKey.status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            OutlineError::Internal("x".into()).to_string(),
            "Server error: x"
        );
    }
}
