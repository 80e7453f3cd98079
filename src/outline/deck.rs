//! Deck outline document model
//!
//! The decoded upstream document is passed through as JSON so that it reaches
//! the caller unchanged apart from the creation timestamp. The typed model below
//! is only used to check the document against the bounds the prompt asks for.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const SLIDE_RANGE: (usize, usize) = (10, 12);
pub const BULLET_RANGE: (usize, usize) = (3, 5);
pub const PROOF_RANGE: (usize, usize) = (2, 4);
pub const MAX_PROOF_TODOS: usize = 8;

/// Tones the outline may be written in
pub const TONES: [&str; 3] = ["crisp", "narrative", "technical"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckOutline {
    #[serde(default)]
    pub meta: DeckMeta,
    #[serde(default)]
    pub slides: Vec<Slide>,
    #[serde(default)]
    pub proof_todos: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckMeta {
    #[serde(default)]
    pub startup: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub prompt_version: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub title: String,
    /// Investor question the slide answers
    #[serde(default)]
    pub purpose: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub visual: String,
    #[serde(default)]
    pub proof_needed: Vec<String>,
}

/// Current time in the form written to `meta.created_at`.
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// The outline body: the `deck` object when the document is wrapped in one,
/// otherwise the document itself.
fn outline_root(document: &Value) -> &Value {
    match document.get("deck") {
        Some(deck) if deck.is_object() => deck,
        _ => document,
    }
}

/// Overwrite `meta.created_at` with `now` wherever a `meta` object exists
/// (top level and inside `deck`). Returns whether anything was stamped.
pub fn stamp_created_at(document: &mut Value, now: DateTime<Utc>) -> bool {
    let stamp = Value::String(timestamp(now));
    let mut stamped = false;

    for pointer in ["/meta", "/deck/meta"] {
        if let Some(meta) = document.pointer_mut(pointer).and_then(Value::as_object_mut) {
            meta.insert("created_at".to_string(), stamp.clone());
            stamped = true;
        }
    }

    stamped
}

/// List the ways `document` departs from the requested outline shape.
///
/// Findings are advisory; the document is never rejected or repaired.
pub fn inspect(document: &Value) -> Vec<String> {
    let outline: DeckOutline = match serde_json::from_value(outline_root(document).clone()) {
        Ok(outline) => outline,
        Err(e) => return vec![format!("outline does not match the deck schema: {}", e)],
    };

    let mut findings = Vec::new();

    let slides = outline.slides.len();
    if slides < SLIDE_RANGE.0 || slides > SLIDE_RANGE.1 {
        findings.push(format!(
            "{} slides, expected {}-{}",
            slides, SLIDE_RANGE.0, SLIDE_RANGE.1
        ));
    }

    for (index, slide) in outline.slides.iter().enumerate() {
        let label = if slide.title.trim().is_empty() {
            format!("slide {}", index + 1)
        } else {
            format!("slide {} ({})", index + 1, slide.title.trim())
        };

        let bullets = slide.bullets.len();
        if bullets < BULLET_RANGE.0 || bullets > BULLET_RANGE.1 {
            findings.push(format!(
                "{}: {} bullets, expected {}-{}",
                label, bullets, BULLET_RANGE.0, BULLET_RANGE.1
            ));
        }

        let proofs = slide.proof_needed.len();
        if proofs < PROOF_RANGE.0 || proofs > PROOF_RANGE.1 {
            findings.push(format!(
                "{}: {} proof_needed items, expected {}-{}",
                label, proofs, PROOF_RANGE.0, PROOF_RANGE.1
            ));
        }
    }

    if outline.proof_todos.len() > MAX_PROOF_TODOS {
        findings.push(format!(
            "{} proof_todos, expected at most {}",
            outline.proof_todos.len(),
            MAX_PROOF_TODOS
        ));
    }

    let tone = outline.meta.tone.as_str();
    if !tone.is_empty() && !TONES.contains(&tone) {
        findings.push(format!("unknown tone '{}'", tone));
    }

    findings
}
