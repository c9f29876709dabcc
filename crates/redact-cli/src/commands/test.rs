use anyhow::Result;
use std::path::{Path, PathBuf};

use super::{load_config_file, print_result};

pub fn handle(
    config_path: &Path,
    text: Option<String>,
    file: Option<PathBuf>,
    base_only: bool,
    strict: bool,
    json: bool,
) -> Result<()> {
    let config = load_config_file(config_path)?;

    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)?,
        (None, None) => std::io::read_to_string(std::io::stdin())?,
    };

    let conditional = if base_only {
        None
    } else {
        Some(config.conditional_rules.as_slice())
    };
    let result = redact_engine::test_redaction(&text, &config.ruleset, conditional);

    if strict {
        result.ensure_clean()?;
    }

    print_result(&result, json)
}
