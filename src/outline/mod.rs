//! Outline module for deck-outline
//!
//! Founder input, prompt construction, upstream text extraction and the
//! request handler that ties them together.

pub mod deck;
pub mod extract;
pub mod input;
pub mod prompt;
mod service;

pub use deck::{DeckMeta, DeckOutline, Slide};
pub use input::FounderInput;
pub use service::{HealthReport, OutlineService, Reply};
