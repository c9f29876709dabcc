//! Compiled rule evaluator

use redact_core::{
    ConditionalRule, Diagnostic, RedactionConfig, RedactionResult, Result, Rule, RuleLocation,
    Ruleset, SkipReason,
};

use crate::matcher::Matcher;
use crate::trigger::TriggerSet;

/// Rule engine with every matcher compiled up front
///
/// Holds no mutable state, so one instance can be shared across threads and
/// reused for any number of documents.
#[derive(Debug, Clone)]
pub struct Redactor {
    conditional: Vec<CompiledGroup>,
    base: CompiledRules,
}

#[derive(Debug, Clone)]
struct CompiledGroup {
    name: String,
    trigger: TriggerSet,
    rules: CompiledRules,
}

#[derive(Debug, Clone, Default)]
struct CompiledRules {
    rules: Vec<(Matcher, String)>,
    skipped: Vec<Diagnostic>,
}

impl CompiledRules {
    fn compile<F>(rules: &[Rule], case_sensitive: bool, location: F) -> Self
    where
        F: Fn(usize) -> RuleLocation,
    {
        let mut compiled = Self::default();

        for (index, rule) in rules.iter().enumerate() {
            if !rule.is_applicable() {
                compiled.skipped.push(Diagnostic {
                    location: location(index),
                    reason: SkipReason::EmptyFind,
                });
                continue;
            }

            let matcher = Matcher::new(&rule.find, case_sensitive);
            compiled.rules.push((matcher, rule.replace.clone()));
        }

        compiled
    }

    /// Apply rules in order against the working text, returning the count
    fn apply(&self, working: &mut String) -> usize {
        let mut count = 0;

        for (matcher, replace) in &self.rules {
            if let Some((replaced, n)) = matcher.replace_all(working, replace) {
                *working = replaced;
                count += n;
            }
        }

        count
    }
}

impl Redactor {
    /// Validate a stored config and compile it
    pub fn new(config: &RedactionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::compile(&config.ruleset, &config.conditional_rules))
    }

    /// Compile without validation; disabled conditional rules are dropped
    pub fn compile(ruleset: &Ruleset, conditional_rules: &[ConditionalRule]) -> Self {
        let conditional = conditional_rules
            .iter()
            .filter(|rule| rule.enabled)
            .map(|rule| CompiledGroup {
                name: rule.name.clone(),
                trigger: TriggerSet::compile(&rule.trigger),
                rules: CompiledRules::compile(
                    &rule.replacements,
                    rule.trigger.case_sensitive,
                    |index| RuleLocation::Conditional {
                        rule: rule.name.clone(),
                        index,
                    },
                ),
            })
            .collect();

        let base = CompiledRules::compile(&ruleset.replacements, ruleset.case_sensitive, |index| {
            RuleLocation::Base { index }
        });

        Self { conditional, base }
    }

    /// Evaluate against `text`
    ///
    /// Conditional rules run first, each checking its trigger against the
    /// current working text; the base rules follow.
    pub fn redact(&self, text: &str) -> RedactionResult {
        let mut working = text.to_string();
        let mut count = 0;
        let mut triggered = Vec::new();
        let mut diagnostics = Vec::new();

        for group in &self.conditional {
            if !group.trigger.is_triggered(&working) {
                continue;
            }
            count += group.rules.apply(&mut working);
            triggered.push(group.name.clone());
            diagnostics.extend(group.rules.skipped.iter().cloned());
        }

        count += self.base.apply(&mut working);
        diagnostics.extend(self.base.skipped.iter().cloned());

        RedactionResult {
            redacted_text: working,
            replacements_made: count,
            triggered,
            diagnostics,
        }
    }
}
