use crate::parser::ResponseParser;
use crate::policy::Policy;
use std::sync::Arc;

const REVIEWER_ROLE: &str = "You are an opinionated lead developer and an expert in domain driven design \
and clean architecture. You are reviewing a codebase and checking whether it follows one policy. \
You are given the policy and a report of the codebase: its directory structure followed by the \
contents of its files.";

/// One review request, kept in parts so callers can inspect what is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub policy_name: String,
    /// Reviewer role and response-shape instructions
    pub system: String,
    /// Policy name and description
    pub policy: String,
    /// Rendered corpus, already cut to the configured limit
    pub corpus: Arc<str>,
    /// Appended when a previous reply could not be parsed
    pub clarification: Option<String>,
}

impl Prompt {
    pub fn user_message(&self) -> String {
        let mut message = format!(
            "Policy to review:\n{}\n\nCodebase report:\n{}\n",
            self.policy, self.corpus
        );
        if let Some(clarification) = &self.clarification {
            message.push_str("\n\n");
            message.push_str(clarification);
        }
        message
    }

    /// System and user text as one document, for providers without roles
    pub fn flattened(&self) -> String {
        format!("{}\n\n{}", self.system, self.user_message())
    }
}

/// Builds prompts whose response instructions match the parser
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system: String,
    instructions: String,
}

impl PromptBuilder {
    pub fn new(parser: &ResponseParser) -> Self {
        let instructions = parser.format_instructions();
        Self {
            system: format!("{}\n\n{}", REVIEWER_ROLE, instructions),
            instructions,
        }
    }

    pub fn build(&self, policy: &Policy, corpus: Arc<str>) -> Prompt {
        Prompt {
            policy_name: policy.name.clone(),
            system: self.system.clone(),
            policy: policy.to_string(),
            corpus,
            clarification: None,
        }
    }

    /// Same request, restating the expected shape after a bad reply
    pub fn clarify(&self, prompt: &Prompt, reason: &str) -> Prompt {
        Prompt {
            clarification: Some(format!(
                "Your previous reply could not be used ({}). {} Reply with nothing else.",
                reason, self.instructions
            )),
            ..prompt.clone()
        }
    }
}
