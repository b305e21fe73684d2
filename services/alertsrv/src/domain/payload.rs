//! Inbound webhook payloads

use serde_json::Value;

/// Request body as handed to the parser
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// Body declared and parsed as JSON
    Json(Value),
    /// Anything else, including JSON-typed bodies that failed to parse
    Text(String),
}

impl Payload {
    /// Classify a body by its declared content type
    pub fn from_body(content_type: Option<&str>, body: &str) -> Self {
        if content_type.is_some_and(is_json_content_type) {
            if let Ok(value) = serde_json::from_str(body) {
                return Payload::Json(value);
            }
        }
        Payload::Text(body.to_string())
    }
}

/// `application/json`, `application/json; charset=utf-8`, `application/*+json`
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}
