use anyhow::Result;
use redact_core::{RedactionResult, StoredConfig};
use redact_sources::{Document, DocumentHandlerRegistry};
use redact_storage::ConfigStore;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::info;

pub async fn handle(
    store: &dyn ConfigStore,
    path: &Path,
    tenant: &str,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let registry = DocumentHandlerRegistry::new();
    let handler = registry.handler_for(path)?;
    let document = handler.extract(path).await?;

    let stored = store.load(tenant).await?;
    let result = redact_engine::evaluate_config(&document.text, &stored.config)?;

    let output = output.unwrap_or_else(|| default_output_path(path));
    handler
        .reinsert(&document, &result.redacted_text, &output)
        .await?;

    info!(
        tenant,
        input = %document.path.display(),
        media_type = %document.media_type,
        revision = stored.revision,
        replacements = result.replacements_made,
        output = %output.display(),
        "document redacted"
    );

    if json {
        let report = summary(&document, &output, &stored, &result);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "✓ Redacted {} -> {} ({} replacement(s))",
        path.display(),
        output.display(),
        result.replacements_made
    );
    if !result.triggered.is_empty() {
        println!("  Triggered: {}", result.triggered.join(", "));
    }
    for diagnostic in &result.diagnostics {
        println!("  Skipped {}: {}", diagnostic.location, diagnostic.reason);
    }

    Ok(())
}

fn summary(
    document: &Document,
    output: &Path,
    stored: &StoredConfig,
    result: &RedactionResult,
) -> serde_json::Value {
    json!({
        "input": document.path,
        "media_type": document.media_type,
        "input_hash": document.content_hash,
        "output": output,
        "tenant": stored.tenant,
        "revision": stored.revision,
        "replacements_made": result.replacements_made,
        "triggered": result.triggered,
        "diagnostics": result.diagnostics,
    })
}

/// `memo.txt` becomes `memo.redacted.txt` in the same directory
fn default_output_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string());

    let name = match path.extension() {
        Some(ext) => format!("{}.redacted.{}", stem, ext.to_string_lossy()),
        None => format!("{}.redacted", stem),
    };
    path.with_file_name(name)
}
