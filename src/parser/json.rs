use crate::error::ParserError;
use serde_json::{Map, Value};

/// Raw fields pulled out of a reply, before scale enforcement
#[derive(Debug, PartialEq)]
pub struct RawReview {
    pub verdict: Option<i64>,
    pub comment: String,
}

/// Parse a JSON verdict object out of model output
pub fn parse_json(raw: &str, verdict_key: &str, comment_key: &str) -> Result<RawReview, ParserError> {
    let value = extract_json(raw).ok_or(ParserError::NoJsonObject)?;
    let object = value.as_object().ok_or(ParserError::NoJsonObject)?;

    let verdict = lookup(object, verdict_key)
        .ok_or_else(|| ParserError::MissingField(verdict_key.to_string()))?;
    let comment = lookup(object, comment_key)
        .ok_or_else(|| ParserError::MissingField(comment_key.to_string()))?;

    Ok(RawReview {
        verdict: verdict_from_value(verdict)?,
        comment: match comment {
            Value::String(text) => text.trim().to_string(),
            Value::Null => String::new(),
            other => other.to_string(),
        },
    })
}

/// Exact key first, then a case-insensitive match
fn lookup<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    object.get(key).or_else(|| {
        object
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    })
}

fn verdict_from_value(value: &Value) -> Result<Option<i64>, ParserError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(Some(i));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 => Ok(Some(f as i64)),
                _ => Err(ParserError::InvalidVerdict(n.to_string())),
            }
        }
        Value::String(s) => super::verdict_from_text(s),
        other => Err(ParserError::InvalidVerdict(other.to_string())),
    }
}

/// Extract a JSON object from a string that might contain prose or markdown code blocks
fn extract_json(s: &str) -> Option<Value> {
    // First try: the whole string is valid JSON
    let trimmed = s.trim();
    if trimmed.starts_with('{') {
        if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
            return Some(value);
        }
    }

    // Second try: extract from markdown code block
    let re = regex::Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").ok()?;
    for cap in re.captures_iter(s) {
        let potential_json = cap.get(1)?.as_str().trim();
        if let Ok(value @ Value::Object(_)) = serde_json::from_str::<Value>(potential_json) {
            return Some(value);
        }
    }

    // Third try: the first `{` that starts a complete object. The streaming
    // deserializer tracks string and escape state, so braces quoted inside
    // values do not end the object early.
    s.match_indices('{').find_map(|(start, _)| {
        match serde_json::Deserializer::from_str(&s[start..])
            .into_iter::<Value>()
            .next()
        {
            Some(Ok(value @ Value::Object(_))) => Some(value),
            _ => None,
        }
    })
}
