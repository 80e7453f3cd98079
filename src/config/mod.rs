//! Configuration module for deck-outline
//!
//! Settings come from an optional TOML file and are overridden by the process
//! environment. They are loaded once at startup and never mutated afterwards.

mod settings;

pub use settings::{LlmSettings, ServerSettings, Settings};
