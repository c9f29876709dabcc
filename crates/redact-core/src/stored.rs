//! Stored config record

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{RedactionConfig, Result};

/// A tenant's config as held by a config store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredConfig {
    pub tenant: String,
    pub config: RedactionConfig,
    /// Incremented on every save, starting at 1
    pub revision: i64,
    pub config_hash: String,
    #[serde(with = "time::serde::timestamp")]
    pub updated_at: OffsetDateTime,
}

impl StoredConfig {
    pub fn new(tenant: impl Into<String>, config: RedactionConfig, revision: i64) -> Result<Self> {
        let config_hash = config.content_hash()?;
        Ok(Self {
            tenant: tenant.into(),
            config,
            revision,
            config_hash,
            updated_at: OffsetDateTime::now_utc(),
        })
    }
}
