use anyhow::Result;
use redact_config::Settings;
use redact_core::{ConditionalRule, RedactionConfig, Rule, Ruleset, Trigger};
use std::path::Path;

const EXAMPLE_RULESET: &str = "redact-rules.json";

pub fn handle(settings_path: &Path, force: bool) -> Result<()> {
    if settings_path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            settings_path.display()
        );
    }

    Settings::default().save_to(settings_path)?;
    println!("✓ Created {}", settings_path.display());

    let example = std::env::current_dir()?.join(EXAMPLE_RULESET);
    if example.exists() && !force {
        println!("  Kept existing {}", EXAMPLE_RULESET);
    } else {
        std::fs::write(&example, serde_json::to_string_pretty(&example_config())?)?;
        println!("✓ Created {}", EXAMPLE_RULESET);
    }

    println!(
        "  Try 'redact test --config {} --text \"Email john@example.com\"'",
        EXAMPLE_RULESET
    );
    Ok(())
}

fn example_config() -> RedactionConfig {
    RedactionConfig::new(Ruleset::new(
        vec![
            Rule::new("John Doe", "[NAME]"),
            Rule::new("john@example.com", "[EMAIL]"),
            Rule::new("555-123-4567", "[PHONE]"),
        ],
        false,
    ))
    .with_conditional_rules(vec![ConditionalRule::new(
        "Choice Hotels",
        Trigger {
            contains: vec!["Choice Hotels".to_string()],
            case_sensitive: false,
        },
        vec![Rule::new("Choice Hotels", "[CLIENT]")],
    )])
}
