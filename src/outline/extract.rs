//! Finding the generated text in an upstream payload
//!
//! The upstream response schema is versioned outside our control, so the text
//! is probed for in a fixed order of known shapes and the first non-blank match
//! wins.

use serde_json::{json, Value};

/// Maximum characters kept when echoing upstream content back in errors.
pub const PREVIEW_LIMIT: usize = 800;

/// Incompleteness reason reported when the token budget ran out.
const MAX_OUTPUT_TOKENS_REASON: &str = "max_output_tokens";

type Probe = fn(&Value) -> Option<String>;

/// Shapes tried in order.
const PROBES: [Probe; 4] = [flat_output_text, nested_text, nested_refusal, chat_message];

/// Return the generated text, or `None` when no known shape carries any.
pub fn extract_text(payload: &Value) -> Option<String> {
    PROBES.iter().find_map(|probe| probe(payload))
}

/// Whether the upstream stopped because it exhausted its output token budget.
///
/// Other incompleteness reasons (content filtering and the like) do not count.
pub fn is_truncated(payload: &Value) -> bool {
    payload.get("status").and_then(Value::as_str) == Some("incomplete")
        && payload
            .pointer("/incomplete_details/reason")
            .and_then(Value::as_str)
            == Some(MAX_OUTPUT_TOKENS_REASON)
}

/// Bounded preview of `text`, cut on a char boundary.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

fn non_blank(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Entries of `output[].content[]`, in order.
fn content_entries(payload: &Value) -> impl Iterator<Item = &Value> {
    payload
        .get("output")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
}

fn entry_type(entry: &Value) -> Option<&str> {
    entry.get("type").and_then(Value::as_str)
}

// `output_text`
fn flat_output_text(payload: &Value) -> Option<String> {
    payload
        .get("output_text")
        .and_then(Value::as_str)
        .and_then(non_blank)
}

// `output[].content[]` with a text-bearing type
fn nested_text(payload: &Value) -> Option<String> {
    content_entries(payload)
        .filter(|entry| matches!(entry_type(entry), Some("output_text") | Some("text")))
        .filter_map(|entry| entry.get("text").and_then(Value::as_str))
        .find_map(non_blank)
}

// `output[].content[]` refusal, re-encoded as a structured JSON string
fn nested_refusal(payload: &Value) -> Option<String> {
    content_entries(payload)
        .filter(|entry| entry_type(entry) == Some("refusal"))
        .filter_map(|entry| entry.get("refusal").and_then(Value::as_str))
        .find_map(non_blank)
        .map(|detail| json!({ "error": "refusal", "detail": detail }).to_string())
}

// chat-completions style `choices[0].message.content`
fn chat_message(payload: &Value) -> Option<String> {
    payload
        .pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .and_then(non_blank)
}
