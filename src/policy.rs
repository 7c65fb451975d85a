use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named rule the codebase is judged against.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
pub struct Policy {
    /// Unique name, used as the report row key
    pub name: String,

    /// Free text sent verbatim to the model
    pub description: String,
}

impl Policy {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

impl std::fmt::Display for Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Policy: {}\nDescription: {}", self.name, self.description)
    }
}

/// Ordered, validated set of policies for one run.
///
/// Declaration order is preserved and becomes the report order.
#[derive(Debug, Clone)]
pub struct PolicySet {
    policies: Vec<Policy>,
}

impl PolicySet {
    pub fn new(policies: Vec<Policy>) -> Result<Self, ConfigError> {
        if policies.is_empty() {
            return Err(ConfigError::NoPolicies);
        }

        let mut seen = HashSet::new();
        for (idx, policy) in policies.iter().enumerate() {
            let name = policy.name.trim();
            if name.is_empty() {
                return Err(ConfigError::EmptyPolicyName(idx + 1));
            }
            if !seen.insert(name.to_string()) {
                return Err(ConfigError::DuplicatePolicy(name.to_string()));
            }
        }

        Ok(Self { policies })
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Policy> {
        self.policies.iter()
    }

    pub fn as_slice(&self) -> &[Policy] {
        &self.policies
    }
}

impl<'a> IntoIterator for &'a PolicySet {
    type Item = &'a Policy;
    type IntoIter = std::slice::Iter<'a, Policy>;

    fn into_iter(self) -> Self::IntoIter {
        self.policies.iter()
    }
}

/// Starter policies written by `policyrev init`
pub fn starter_policies() -> Vec<Policy> {
    vec![
        Policy::new(
            "Clean Architecture, infrastructure code is separated from business logic",
            "Ensure that infrastructure code (e.g., database access, API clients) is separated from business logic.",
        ),
        Policy::new(
            "Dependency Inversion Principle",
            "High-level modules should not depend on low-level modules. Both should depend on abstractions.",
        ),
        Policy::new(
            "Separation of Concerns",
            "Each module or class should have responsibility over a single part of the functionality provided by the software.",
        ),
        Policy::new(
            "Explicit Boundaries Between Layers",
            "Clearly define boundaries between presentation, domain, and infrastructure layers.",
        ),
        Policy::new(
            "No Direct Data Access in Business Logic",
            "Business logic should not directly access databases or external services; use interfaces or repositories.",
        ),
        Policy::new(
            "Testability of Business Logic",
            "Business logic should be easily testable without requiring infrastructure dependencies.",
        ),
        Policy::new(
            "Infrastructure Code Isolated",
            "Infrastructure code (e.g., file system, network, database) should be isolated from domain logic and accessed via abstractions.",
        ),
    ]
}
