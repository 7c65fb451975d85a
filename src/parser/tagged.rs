use super::json::RawReview;
use crate::error::ParserError;
use regex::Regex;

/// Parse `<verdict>..</verdict>` / `<comment>..</comment>` style output
pub fn parse_tagged(raw: &str, verdict_key: &str, comment_key: &str) -> Result<RawReview, ParserError> {
    let verdict = tag_content(raw, verdict_key)
        .ok_or_else(|| ParserError::MissingTag(verdict_key.to_string()))?;
    let comment = tag_content(raw, comment_key)
        .ok_or_else(|| ParserError::MissingTag(comment_key.to_string()))?;

    Ok(RawReview {
        verdict: super::verdict_from_text(&verdict)?,
        comment,
    })
}

fn tag_content(raw: &str, tag: &str) -> Option<String> {
    let tag = regex::escape(tag);
    let re = Regex::new(&format!(r"(?is)<\s*{tag}\s*>(.*?)<\s*/\s*{tag}\s*>")).ok()?;
    re.captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}
