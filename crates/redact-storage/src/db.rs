//! SQLite config store

use std::path::Path;

use async_trait::async_trait;
use redact_core::{RedactionConfig, StoredConfig};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::store::{ConfigStore, validate_tenant};
use crate::{Result, StorageError};

/// Config store backed by a local SQLite database
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and run migrations
    pub async fn new(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        debug!(path = %path.display(), "opened config database");
        Ok(store)
    }

    async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS configs (
                tenant      TEXT PRIMARY KEY NOT NULL,
                body        TEXT NOT NULL,
                revision    INTEGER NOT NULL,
                config_hash TEXT NOT NULL,
                updated_at  INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ConfigStore for SqliteStore {
    async fn load(&self, tenant: &str) -> Result<StoredConfig> {
        validate_tenant(tenant)?;

        let row = sqlx::query(
            "SELECT body, revision, config_hash, updated_at FROM configs WHERE tenant = ?",
        )
        .bind(tenant)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StorageError::NotFound(tenant.to_string()))?;

        let body: String = row.try_get("body")?;
        // Stored records are re-validated on the way out as well
        let config = RedactionConfig::from_json(&body)?;

        let updated_at = OffsetDateTime::from_unix_timestamp(row.try_get("updated_at")?)
            .map_err(|e| StorageError::Other(anyhow::anyhow!("Bad timestamp: {}", e)))?;

        Ok(StoredConfig {
            tenant: tenant.to_string(),
            config,
            revision: row.try_get("revision")?,
            config_hash: row.try_get("config_hash")?,
            updated_at,
        })
    }

    async fn save(&self, tenant: &str, config: &RedactionConfig) -> Result<StoredConfig> {
        validate_tenant(tenant)?;
        config.validate()?;

        let body = serde_json::to_string(config)?;
        let config_hash = config.content_hash()?;
        let updated_at = OffsetDateTime::now_utc();

        let revision: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO configs (tenant, body, revision, config_hash, updated_at)
            VALUES (?, ?, 1, ?, ?)
            ON CONFLICT(tenant) DO UPDATE SET
                body = excluded.body,
                revision = configs.revision + 1,
                config_hash = excluded.config_hash,
                updated_at = excluded.updated_at
            RETURNING revision
            "#,
        )
        .bind(tenant)
        .bind(&body)
        .bind(&config_hash)
        .bind(updated_at.unix_timestamp())
        .fetch_one(&self.pool)
        .await?;

        info!(tenant, revision, rules = config.rule_count(), "saved redaction config");

        Ok(StoredConfig {
            tenant: tenant.to_string(),
            config: config.clone(),
            revision,
            config_hash,
            updated_at,
        })
    }

    async fn delete(&self, tenant: &str) -> Result<()> {
        validate_tenant(tenant)?;

        let result = sqlx::query("DELETE FROM configs WHERE tenant = ?")
            .bind(tenant)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(tenant.to_string()));
        }

        info!(tenant, "deleted redaction config");
        Ok(())
    }

    async fn list_tenants(&self) -> Result<Vec<String>> {
        let tenants = sqlx::query_scalar::<_, String>("SELECT tenant FROM configs ORDER BY tenant")
            .fetch_all(&self.pool)
            .await?;
        Ok(tenants)
    }
}
