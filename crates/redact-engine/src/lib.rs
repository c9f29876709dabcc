//! Redaction rule engine
//!
//! Literal find/replace rules applied sequentially: each rule sees the text
//! produced by the rules before it, so the output depends on rule order.
//! Conditional rules run before the base rules so their triggers see the
//! document before unconditional redaction.
//!
//! Everything here is a pure function of its inputs.

mod dry_run;
mod matcher;
mod redactor;
mod trigger;

use redact_core::{ConditionalRule, RedactionConfig, RedactionResult, Result, Ruleset};

pub use dry_run::{preview, test_redaction};
pub use redactor::Redactor;
pub use trigger::is_triggered;

/// Evaluate a ruleset and conditional rules against `text`
///
/// Never fails: empty `find` rules are skipped and reported in
/// `diagnostics`, and empty trigger strings never match.
pub fn evaluate(
    text: &str,
    config: &Ruleset,
    conditional_rules: &[ConditionalRule],
) -> RedactionResult {
    Redactor::compile(config, conditional_rules).redact(text)
}

/// Validate a stored config, then evaluate it
///
/// When validation fails no rule is applied.
pub fn evaluate_config(text: &str, config: &RedactionConfig) -> Result<RedactionResult> {
    Ok(Redactor::new(config)?.redact(text))
}
