use anyhow::Result;
use redact_storage::ConfigStore;

use super::load_config_file;
use crate::cli::ConfigCommands;

pub async fn handle(store: &dyn ConfigStore, cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Show { tenant } => {
            let stored = store.load(&tenant).await?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        ConfigCommands::Set { tenant, file } => {
            let config = load_config_file(&file)?;
            let stored = store.save(&tenant, &config).await?;
            println!(
                "✓ Stored ruleset for '{}' (revision {}, {} rule(s))",
                stored.tenant,
                stored.revision,
                stored.config.rule_count()
            );
        }
        ConfigCommands::Delete { tenant } => {
            store.delete(&tenant).await?;
            println!("✓ Deleted ruleset for '{}'", tenant);
        }
        ConfigCommands::List => {
            let tenants = store.list_tenants().await?;
            if tenants.is_empty() {
                println!("No rulesets stored. Run 'redact config set <tenant> <file>' to add one.");
            } else {
                for tenant in tenants {
                    println!("{}", tenant);
                }
            }
        }
    }
    Ok(())
}
