use serde::{Deserialize, Serialize};

/// Score a model assigned to one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// Within the configured scale
    Scored(i64),
    /// The model judged the policy irrelevant to this codebase
    NotApplicable,
    /// Sentinel: the reply could not be parsed, even after a retry
    Unparseable,
}

impl Verdict {
    pub fn score(&self) -> Option<i64> {
        match self {
            Verdict::Scored(score) => Some(*score),
            _ => None,
        }
    }

    pub fn is_sentinel(&self) -> bool {
        matches!(self, Verdict::Unparseable)
    }

    pub fn status(&self) -> &'static str {
        match self {
            Verdict::Scored(_) => "scored",
            Verdict::NotApplicable => "not_applicable",
            Verdict::Unparseable => "unparseable",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Scored(score) => write!(f, "{}", score),
            Verdict::NotApplicable => write!(f, "N/A"),
            Verdict::Unparseable => write!(f, "UNPARSEABLE"),
        }
    }
}

/// A model reply that passed schema enforcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredResponse {
    pub verdict: Verdict,
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Scored(4).to_string(), "4");
        assert_eq!(Verdict::NotApplicable.to_string(), "N/A");
        assert_eq!(Verdict::Unparseable.to_string(), "UNPARSEABLE");
    }

    #[test]
    fn test_only_unparseable_is_sentinel() {
        assert!(Verdict::Unparseable.is_sentinel());
        assert!(!Verdict::NotApplicable.is_sentinel());
        assert!(!Verdict::Scored(0).is_sentinel());
        assert_eq!(Verdict::Scored(3).score(), Some(3));
        assert_eq!(Verdict::NotApplicable.score(), None);
    }
}
