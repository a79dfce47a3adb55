// Heuristics over AI replies: where the text lives and whether it is canned

use serde_json::Value;

/// Markers that show up in templated replies from the AI service
pub const DEFAULT_MOCK_MARKERS: &[&str] = &[
    "mock",
    "placeholder",
    "template",
    "lorem ipsum",
    "模拟",
    "示例",
    "模板",
];

const TEXT_FIELDS: &[&str] = &["content", "response", "reply", "message", "answer"];

/// Pulls the reply text out of a JSON body. Looks at the usual top-level
/// fields first, then the same fields under `data`. A bare JSON string
/// is taken as is.
pub fn extract_text(body: &Value) -> Option<String> {
    if let Value::String(text) = body {
        return Some(text.clone());
    }

    find_text_field(body).or_else(|| body.get("data").and_then(extract_text))
}

fn find_text_field(body: &Value) -> Option<String> {
    TEXT_FIELDS.iter().find_map(|field| match body.get(field)? {
        Value::String(text) => Some(text.clone()),
        // OpenAI-style {"message": {"content": "..."}}
        nested @ Value::Object(_) => nested.get("content")?.as_str().map(str::to_owned),
        _ => None,
    })
}

/// True when the reply is blank or contains one of the markers.
/// Markers are expected in lowercase.
pub fn looks_mocked(text: &str, markers: &[String]) -> bool {
    let trimmed: &str = text.trim();
    if trimmed.is_empty() {
        return true;
    }

    let lowered: String = trimmed.to_lowercase();
    markers.iter().any(|marker| lowered.contains(marker.as_str()))
}
