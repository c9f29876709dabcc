//! Rule domain model
//!
//! Every shape here deserialises with required fields only, so a record
//! missing `case_sensitive` or `trigger.contains` is rejected at the boundary
//! instead of being filled in with a default.

use serde::{Deserialize, Serialize};

use crate::{RedactError, Result};

/// A single literal find/replace instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub find: String,
    pub replace: String,
}

impl Rule {
    pub fn new(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Rules with an empty `find` are skipped during evaluation
    pub fn is_applicable(&self) -> bool {
        !self.find.is_empty()
    }
}

/// Ordered unconditional rules plus one case flag for all of them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ruleset {
    pub replacements: Vec<Rule>,
    pub case_sensitive: bool,
}

impl Ruleset {
    pub fn new(replacements: Vec<Rule>, case_sensitive: bool) -> Self {
        Self {
            replacements,
            case_sensitive,
        }
    }
}

/// Substrings whose presence activates a conditional rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub contains: Vec<String>,
    pub case_sensitive: bool,
}

/// A group of rules gated by a trigger over document content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionalRule {
    pub name: String,
    pub enabled: bool,
    pub trigger: Trigger,
    pub replacements: Vec<Rule>,
}

impl ConditionalRule {
    pub fn new(name: impl Into<String>, trigger: Trigger, replacements: Vec<Rule>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            trigger,
            replacements,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    fn validate(&self, position: usize) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(RedactError::MalformedConfig(format!(
                "conditional rule #{} has an empty name",
                position
            )));
        }

        // An empty needle is a substring of every document
        if self.trigger.contains.iter().any(|needle| needle.is_empty()) {
            return Err(RedactError::MalformedConfig(format!(
                "conditional rule '{}' has an empty trigger string",
                self.name
            )));
        }

        Ok(())
    }
}

/// The persisted ruleset record: base rules plus optional conditional rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionConfig {
    #[serde(flatten)]
    pub ruleset: Ruleset,

    #[serde(default)]
    pub conditional_rules: Vec<ConditionalRule>,
}

impl RedactionConfig {
    pub fn new(ruleset: Ruleset) -> Self {
        Self {
            ruleset,
            conditional_rules: Vec::new(),
        }
    }

    pub fn with_conditional_rules(mut self, rules: Vec<ConditionalRule>) -> Self {
        self.conditional_rules = rules;
        self
    }

    /// Check the structural invariants serde cannot express
    pub fn validate(&self) -> Result<()> {
        for (position, rule) in self.conditional_rules.iter().enumerate() {
            rule.validate(position)?;
        }
        Ok(())
    }

    /// Parse and validate a JSON record
    pub fn from_json(input: &str) -> Result<Self> {
        let config: RedactionConfig = serde_json::from_str(input)
            .map_err(|e| RedactError::MalformedConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate an already-decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let config: RedactionConfig = serde_json::from_value(value)
            .map_err(|e| RedactError::MalformedConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// BLAKE3 digest of the canonical JSON form
    pub fn content_hash(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)?;
        Ok(blake3::hash(&bytes).to_hex().to_string())
    }

    pub fn rule_count(&self) -> usize {
        self.ruleset.replacements.len()
            + self
                .conditional_rules
                .iter()
                .map(|r| r.replacements.len())
                .sum::<usize>()
    }
}
