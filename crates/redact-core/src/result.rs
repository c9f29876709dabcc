//! Evaluation request and result types

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{RedactError, RedactionConfig, Result};

/// Request to evaluate a config against text
///
/// `config` stays untyped until [`RedactionRequest::parse_config`] so a
/// malformed config can be reported alongside the untouched text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionRequest {
    pub text: String,
    pub config: serde_json::Value,
}

impl RedactionRequest {
    pub fn parse_config(&self) -> Result<RedactionConfig> {
        RedactionConfig::from_value(self.config.clone())
    }
}

/// Result of evaluating a config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedactionResult {
    pub redacted_text: String,
    pub replacements_made: usize,
    /// Names of the conditional rules that fired, in evaluation order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub triggered: Vec<String>,
    /// Rules skipped during evaluation
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl RedactionResult {
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            redacted_text: text.into(),
            replacements_made: 0,
            triggered: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Turn the first recorded diagnostic into an error
    pub fn ensure_clean(&self) -> Result<()> {
        match self.diagnostics.first() {
            Some(diagnostic) => Err(RedactError::InvalidRule {
                location: diagnostic.location.clone(),
                reason: diagnostic.reason,
            }),
            None => Ok(()),
        }
    }
}

/// A rule that was skipped, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub location: RuleLocation,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum RuleLocation {
    /// Index into `replacements`
    Base { index: usize },
    /// Index into a conditional rule's `replacements`
    Conditional { rule: String, index: usize },
}

impl fmt::Display for RuleLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLocation::Base { index } => write!(f, "replacements[{}]", index),
            RuleLocation::Conditional { rule, index } => {
                write!(f, "conditional rule '{}' replacements[{}]", rule, index)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyFind,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptyFind => f.write_str("find is empty"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_clean() {
        let mut result = RedactionResult::unchanged("text");
        assert!(result.ensure_clean().is_ok());

        result.diagnostics.push(Diagnostic {
            location: RuleLocation::Conditional {
                rule: "clients".to_string(),
                index: 2,
            },
            reason: SkipReason::EmptyFind,
        });

        let err = result.ensure_clean().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid rule at conditional rule 'clients' replacements[2]: find is empty"
        );
    }

    #[test]
    fn test_result_omits_empty_extras() {
        let json = serde_json::to_value(RedactionResult::unchanged("abc")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"redacted_text": "abc", "replacements_made": 0})
        );
    }

    #[test]
    fn test_request_parse_config() {
        let request: RedactionRequest = serde_json::from_str(
            r#"{"text": "hi", "config": {"replacements": [], "case_sensitive": false}}"#,
        )
        .unwrap();
        assert!(request.parse_config().is_ok());

        let request = RedactionRequest {
            text: "hi".to_string(),
            config: serde_json::json!({"case_sensitive": false}),
        };
        assert!(request.parse_config().is_err());
    }
}
