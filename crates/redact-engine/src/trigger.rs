//! Conditional trigger evaluation

use redact_core::Trigger;

use crate::matcher::Matcher;

/// True iff any trigger string occurs in `text`
///
/// An empty `contains` list never triggers. Empty strings inside the list are
/// ignored here; [`redact_core::RedactionConfig::validate`] rejects them.
pub fn is_triggered(text: &str, trigger: &Trigger) -> bool {
    TriggerSet::compile(trigger).is_triggered(text)
}

/// Pre-compiled trigger strings
#[derive(Debug, Clone)]
pub(crate) struct TriggerSet {
    needles: Vec<Matcher>,
}

impl TriggerSet {
    pub(crate) fn compile(trigger: &Trigger) -> Self {
        let needles = trigger
            .contains
            .iter()
            .filter(|needle| !needle.is_empty())
            .map(|needle| Matcher::new(needle, trigger.case_sensitive))
            .collect();

        Self { needles }
    }

    pub(crate) fn is_triggered(&self, text: &str) -> bool {
        self.needles.iter().any(|needle| needle.is_found(text))
    }
}
