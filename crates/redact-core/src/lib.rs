//! Core domain models for redact
//!
//! This crate contains:
//! - Rule model (Rule, Ruleset, Trigger, ConditionalRule, RedactionConfig)
//! - Evaluation results and diagnostics
//! - Stored config records
//! - The error taxonomy shared by every other crate

pub mod error;
pub mod result;
pub mod rule;
pub mod stored;

pub use error::{RedactError, Result};
pub use result::{Diagnostic, RedactionRequest, RedactionResult, RuleLocation, SkipReason};
pub use rule::{ConditionalRule, RedactionConfig, Rule, Ruleset, Trigger};
pub use stored::StoredConfig;
