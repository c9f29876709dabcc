mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use redact_config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for redacted text and JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let settings_path = cli.settings.unwrap_or_else(Settings::config_path);

    // Init writes the settings file, so settings are loaded per command
    let load_settings = || Settings::load_or_create(&settings_path);

    match cli.command {
        Commands::Init { force } => commands::init::handle(&settings_path, force),
        Commands::Test {
            config,
            text,
            file,
            base_only,
            strict,
            json,
        } => commands::test::handle(&config, text, file, base_only, strict, json),
        Commands::Apply {
            path,
            tenant,
            output,
            json,
        } => {
            let store = commands::open_store(&load_settings()?).await?;
            commands::apply::handle(store.as_ref(), &path, &tenant, output, json).await
        }
        Commands::Config(cmd) => {
            let store = commands::open_store(&load_settings()?).await?;
            commands::config::handle(store.as_ref(), cmd).await
        }
        Commands::Serve {
            host,
            port,
            read_only,
        } => commands::serve::handle(&load_settings()?, host, port, read_only).await,
        Commands::Stdio { read_only } => {
            commands::serve::handle_stdio(&load_settings()?, read_only).await
        }
    }
}
