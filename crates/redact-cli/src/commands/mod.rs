pub mod apply;
pub mod config;
pub mod init;
pub mod serve;
pub mod test;

use anyhow::{Context, Result};
use redact_config::Settings;
use redact_core::{RedactionConfig, RedactionResult};
use redact_storage::{
    ConfigStore, HttpConfigStore, ReqwestFetch, RetryPolicy, RetryingStore, SqliteStore,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Build the configured store, wrapped in the retry policy
pub async fn open_store(settings: &Settings) -> Result<Arc<dyn ConfigStore>> {
    let policy = RetryPolicy::from(&settings.retry);

    if let Some(remote) = &settings.remote {
        let token = remote
            .token_env
            .as_deref()
            .and_then(|var| std::env::var(var).ok());
        let fetch = ReqwestFetch::new(Duration::from_secs(remote.timeout_secs), token)?;
        info!(base_url = %remote.base_url, "using remote config store");
        let store = HttpConfigStore::new(fetch, remote.base_url.as_str());
        return Ok(Arc::new(RetryingStore::new(store, policy)));
    }

    let path = settings.database_path();
    let store = SqliteStore::new(&path)
        .await
        .with_context(|| format!("Failed to open database at {}", path.display()))?;
    Ok(Arc::new(RetryingStore::new(store, policy)))
}

/// Read a ruleset file; `.toml` files are TOML, everything else JSON
pub fn load_config_file(path: &Path) -> Result<RedactionConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content, is_toml(path))
        .with_context(|| format!("Invalid ruleset in {}", path.display()))
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"))
}

fn parse_config(content: &str, toml: bool) -> Result<RedactionConfig> {
    if toml {
        let value: serde_json::Value = toml::from_str(content)?;
        Ok(RedactionConfig::from_value(value)?)
    } else {
        Ok(RedactionConfig::from_json(content)?)
    }
}

/// Print a result: redacted text on stdout, summary on stderr
pub fn print_result(result: &RedactionResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    println!("{}", result.redacted_text);
    eprintln!("✓ {} replacement(s)", result.replacements_made);
    if !result.triggered.is_empty() {
        eprintln!("  Triggered: {}", result.triggered.join(", "));
    }
    for diagnostic in &result.diagnostics {
        eprintln!("  Skipped {}: {}", diagnostic.location, diagnostic.reason);
    }
    Ok(())
}
