//! Founder input parsing and validation

use serde::Serialize;
use serde_json::{Map, Value};

use crate::{OutlineError, Result};

/// Fields that must be present and non-blank.
pub const REQUIRED_FIELDS: [&str; 6] = [
    "startup",
    "one_liner",
    "industry",
    "target_user",
    "problem",
    "solution",
];

/// Tone used when the founder does not ask for one.
pub const DEFAULT_TONE: &str = "crisp";

/// Startup facts supplied by the founder.
///
/// Optional fields are kept as empty strings when unset so the prompt always
/// carries every key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FounderInput {
    pub startup: String,
    pub one_liner: String,
    pub industry: String,
    pub target_user: String,
    pub problem: String,
    pub solution: String,
    pub gtm: String,
    pub business_model: String,
    pub traction: String,
    pub competition: String,
    pub moat: String,
    pub ask_use: String,
    pub tone: String,
}

impl FounderInput {
    /// Parse a request body. An empty body is treated as `{}`.
    pub fn from_body(body: &[u8]) -> Result<Self> {
        let value: Value = if body.iter().all(u8::is_ascii_whitespace) {
            Value::Object(Map::new())
        } else {
            serde_json::from_slice(body).map_err(|_| OutlineError::BadJson)?
        };

        Self::from_value(&value)
    }

    /// Build from decoded JSON, reporting every blank required field at once.
    pub fn from_value(value: &Value) -> Result<Self> {
        let empty = Map::new();
        let fields = value.as_object().unwrap_or(&empty);
        let get = |name: &str| field_text(fields.get(name));

        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|name| get(name).is_empty())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(OutlineError::MissingFields(missing));
        }

        let tone = get("tone");

        Ok(Self {
            startup: get("startup"),
            one_liner: get("one_liner"),
            industry: get("industry"),
            target_user: get("target_user"),
            problem: get("problem"),
            solution: get("solution"),
            gtm: get("gtm"),
            business_model: get("business_model"),
            traction: get("traction"),
            competition: get("competition"),
            moat: get("moat"),
            ask_use: get("ask_use"),
            tone: if tone.is_empty() {
                DEFAULT_TONE.to_string()
            } else {
                tone
            },
        })
    }
}

/// Text content of a field, trimmed. Falsy values (absent, null, `false`,
/// zero) and empty arrays are blank; other non-strings are rendered as JSON text.
fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) | Some(Value::Bool(false)) => String::new(),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => String::new(),
        Some(Value::Array(items)) if items.is_empty() => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string(),
    }
}
