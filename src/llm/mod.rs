//! LLM module for deck-outline
//!
//! Talks to the upstream generation service. The response payload is handed back
//! as loosely-typed JSON; finding the generated text in it is the outline
//! pipeline's job.

mod client;
mod openai;

pub use client::{build_provider, GenerationRequest, LlmProvider};
pub use openai::OpenAiClient;
