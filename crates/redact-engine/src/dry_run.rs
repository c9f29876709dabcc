//! Dry-run previews of a ruleset against sample text

use redact_core::{ConditionalRule, RedactionRequest, RedactionResult, Result, Ruleset};

use crate::{evaluate, evaluate_config};

/// Preview a ruleset without conditional rules unless they are supplied
pub fn test_redaction(
    text: &str,
    config: &Ruleset,
    conditional_rules: Option<&[ConditionalRule]>,
) -> RedactionResult {
    evaluate(text, config, conditional_rules.unwrap_or(&[]))
}

/// Preview an untyped request, validating its config first
pub fn preview(request: &RedactionRequest) -> Result<RedactionResult> {
    let config = request.parse_config()?;
    evaluate_config(&request.text, &config)
}
