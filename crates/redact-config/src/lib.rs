use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application settings (redact.toml)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Remote config store; when absent the local database is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<RemoteConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub read_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorageConfig {
    /// SQLite database file (defaults to the platform data dir)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,

    /// Name of the environment variable holding the bearer token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            read_only: false,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            multiplier: default_multiplier(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    17380
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    200
}

fn default_max_backoff_ms() -> u64 {
    2_000
}

fn default_multiplier() -> f64 {
    2.0
}

fn default_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Load settings from `path`, writing defaults there first if missing
    pub fn load_or_create(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from(path)
        } else {
            let settings = Settings::default();
            settings.save_to(path)?;
            Ok(settings)
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get settings file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = project_dirs() {
            dirs.config_dir().join("redact.toml")
        } else {
            PathBuf::from("~/.redact/redact.toml")
        }
    }

    /// Resolve the SQLite database path
    pub fn database_path(&self) -> PathBuf {
        if let Some(path) = &self.storage.database {
            return path.clone();
        }
        if let Some(dirs) = project_dirs() {
            dirs.data_dir().join("redact.db")
        } else {
            PathBuf::from("~/.redact/redact.db")
        }
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "redact", "redact")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 17380);
        assert_eq!(settings.retry.max_attempts, 3);
        assert!(settings.remote.is_none());
        assert!(!settings.server.read_only);
    }

    #[test]
    fn test_settings_serialization() {
        let settings = Settings::default();
        let toml_str = toml::to_string(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.server.port, settings.server.port);
        assert_eq!(parsed.retry.initial_backoff_ms, settings.retry.initial_backoff_ms);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let toml_str = r#"
[server]
port = 9000
read_only = true

[remote]
base_url = "https://config.internal.example"
token_env = "REDACT_TOKEN"
"#;
        let settings: Settings = toml::from_str(toml_str).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert!(settings.server.read_only);

        let remote = settings.remote.unwrap();
        assert_eq!(remote.token_env.as_deref(), Some("REDACT_TOKEN"));
        assert_eq!(remote.timeout_secs, 30);
        assert_eq!(settings.retry.max_backoff_ms, 2_000);
    }

    #[test]
    fn test_database_path_override() {
        let mut settings = Settings::default();
        settings.storage.database = Some(PathBuf::from("/tmp/rules.db"));
        assert_eq!(settings.database_path(), PathBuf::from("/tmp/rules.db"));
    }

    #[test]
    fn test_load_or_create_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("redact.toml");

        let created = Settings::load_or_create(&path).unwrap();
        assert!(path.exists());

        let loaded = Settings::load_from(&path).unwrap();
        assert_eq!(loaded.server.port, created.server.port);
    }
}
