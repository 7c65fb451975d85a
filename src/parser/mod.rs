mod json;
mod response;
mod tagged;

pub use response::{StructuredResponse, Verdict};

use crate::config::{Config, ResponseConfig, ResponseFormat, VerdictScale};
use crate::error::ParserError;

/// The agreed reply shape: format, field names, and verdict bounds.
///
/// The same value renders the response instructions placed in the prompt,
/// so the model is always asked for exactly what `parse` accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseParser {
    format: ResponseFormat,
    scale: VerdictScale,
    verdict_key: String,
    comment_key: String,
}

impl ResponseParser {
    pub fn new(response: &ResponseConfig, scale: VerdictScale) -> Self {
        Self {
            format: response.format,
            scale,
            verdict_key: response.verdict_key.clone(),
            comment_key: response.comment_key.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.response, config.scale)
    }

    pub fn format(&self) -> ResponseFormat {
        self.format
    }

    pub fn scale(&self) -> VerdictScale {
        self.scale
    }

    /// Parse model output into a verdict within the scale
    pub fn parse(&self, raw: &str) -> Result<StructuredResponse, ParserError> {
        if raw.trim().is_empty() {
            return Err(ParserError::Empty);
        }

        let review = match self.format {
            ResponseFormat::Json => json::parse_json(raw, &self.verdict_key, &self.comment_key)?,
            ResponseFormat::Tagged => {
                tagged::parse_tagged(raw, &self.verdict_key, &self.comment_key)?
            }
        };

        let verdict = match review.verdict {
            None => Verdict::NotApplicable,
            Some(score) if self.scale.contains(score) => Verdict::Scored(score),
            Some(score) => {
                return Err(ParserError::VerdictOutOfRange {
                    verdict: score,
                    min: self.scale.min,
                    max: self.scale.max,
                })
            }
        };

        Ok(StructuredResponse {
            verdict,
            comment: review.comment,
        })
    }

    /// Response-shape instructions for the prompt
    pub fn format_instructions(&self) -> String {
        let (min, max) = (self.scale.min, self.scale.max);
        match self.format {
            ResponseFormat::Json => format!(
                "Return only a JSON object of the form \
                {{\"{comment}\": \"<one sentence>\", \"{verdict}\": <integer>}}. \
                First reason briefly in the \"{comment}\" field, in a single sentence with your conclusion, \
                focusing on what could be improved. Then set \"{verdict}\" to an integer between {min} and {max}, \
                where {min} means not followed at all and {max} means fully followed. \
                If the policy is not applicable, set \"{verdict}\" to null. \
                If you do not give {max}, the comment must explain why not.",
                comment = self.comment_key,
                verdict = self.verdict_key,
            ),
            ResponseFormat::Tagged => format!(
                "Answer with exactly two tags: <{comment}>one sentence with your conclusion, \
                focusing on what could be improved</{comment}> followed by \
                <{verdict}>an integer between {min} and {max}</{verdict}>, \
                where {min} means not followed at all and {max} means fully followed. \
                If the policy is not applicable, write <{verdict}>n/a</{verdict}>. \
                If you do not give {max}, the comment must explain why not.",
                comment = self.comment_key,
                verdict = self.verdict_key,
            ),
        }
    }
}

/// Read a verdict written as text: `4`, `4/5`, or `n/a`
fn verdict_from_text(text: &str) -> Result<Option<i64>, ParserError> {
    let trimmed = text.trim();
    let lowered = trimmed.to_ascii_lowercase();
    if matches!(
        lowered.as_str(),
        "n/a" | "na" | "null" | "none" | "not applicable"
    ) {
        return Ok(None);
    }

    let score = trimmed.split('/').next().unwrap_or(trimmed).trim();
    score
        .parse::<i64>()
        .map(Some)
        .map_err(|_| ParserError::InvalidVerdict(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn json_parser() -> ResponseParser {
        ResponseParser::new(&ResponseConfig::default(), VerdictScale { min: 1, max: 5 })
    }

    #[test]
    fn test_parse_scored() {
        let response = json_parser()
            .parse(r#"{"verdict": 4, "comment": "ok"}"#)
            .unwrap();
        assert_eq!(response.verdict, Verdict::Scored(4));
        assert_eq!(response.comment, "ok");
    }

    #[test]
    fn test_out_of_range_is_malformed() {
        let err = json_parser()
            .parse(r#"{"verdict": 0, "comment": "bad"}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ParserError::VerdictOutOfRange {
                verdict: 0,
                min: 1,
                max: 5
            }
        ));
    }

    #[test]
    fn test_null_is_not_applicable() {
        let response = json_parser()
            .parse(r#"{"verdict": null, "comment": "no database"}"#)
            .unwrap();
        assert_eq!(response.verdict, Verdict::NotApplicable);
    }

    #[test]
    fn test_empty_reply() {
        assert!(matches!(json_parser().parse("  \n"), Err(ParserError::Empty)));
    }

    #[test]
    fn test_tagged_format_with_custom_keys() {
        let config = ResponseConfig {
            format: ResponseFormat::Tagged,
            verdict_key: "score".to_string(),
            comment_key: "why".to_string(),
        };
        let parser = ResponseParser::new(&config, VerdictScale { min: 0, max: 10 });
        let response = parser.parse("<why>Good seams</why><score>8</score>").unwrap();
        assert_eq!(response.verdict, Verdict::Scored(8));
        assert_eq!(response.comment, "Good seams");
    }

    #[test]
    fn test_instructions_follow_configuration() {
        let instructions = json_parser().format_instructions();
        assert!(instructions.contains("\"verdict\""));
        assert!(instructions.contains("between 1 and 5"));

        let config = ResponseConfig {
            format: ResponseFormat::Tagged,
            ..ResponseConfig::default()
        };
        let tagged = ResponseParser::new(&config, VerdictScale { min: 0, max: 5 });
        assert!(tagged.format_instructions().contains("<verdict>"));
    }

    #[test]
    fn test_verdict_from_text() {
        assert_eq!(verdict_from_text(" 4 ").unwrap(), Some(4));
        assert_eq!(verdict_from_text("4/5").unwrap(), Some(4));
        assert_eq!(verdict_from_text("Not Applicable").unwrap(), None);
        assert!(verdict_from_text("four").is_err());
    }
}
