use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "redact")]
#[command(about = "Rule-based document redaction", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Settings file (default: platform config dir)
    #[arg(long, global = true, env = "REDACT_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Dry-run a ruleset file against sample text
    Test {
        /// Ruleset file (.json or .toml)
        #[arg(long)]
        config: PathBuf,

        /// Sample text (reads stdin when neither --text nor --file is given)
        #[arg(long, conflicts_with = "file")]
        text: Option<String>,

        /// Read sample text from a file
        #[arg(long)]
        file: Option<PathBuf>,

        /// Ignore conditional rules in the ruleset file
        #[arg(long)]
        base_only: bool,

        /// Fail if any rule was skipped
        #[arg(long)]
        strict: bool,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Redact a document with a tenant's stored ruleset
    Apply {
        /// Document to redact
        path: PathBuf,

        /// Tenant whose ruleset to use
        #[arg(long)]
        tenant: String,

        /// Output path (default: <name>.redacted.<ext> next to the input)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the result summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage stored rulesets
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Start the HTTP server
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,

        #[arg(long)]
        read_only: bool,
    },

    /// Serve JSON-RPC tools over stdin/stdout
    Stdio {
        #[arg(long)]
        read_only: bool,
    },

    /// Write a default settings file and an example ruleset
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show a tenant's stored ruleset
    Show { tenant: String },

    /// Store a ruleset file for a tenant
    Set {
        tenant: String,

        /// Ruleset file (.json or .toml)
        file: PathBuf,
    },

    /// Delete a tenant's stored ruleset
    Delete { tenant: String },

    /// List tenants with a stored ruleset
    List,
}
