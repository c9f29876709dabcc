//! Config store contract

use async_trait::async_trait;
use redact_core::{RedactionConfig, StoredConfig};

use crate::{Result, StorageError};

/// Persists one redaction config per tenant
///
/// Implementations validate on save; a malformed config is never written.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn load(&self, tenant: &str) -> Result<StoredConfig>;

    async fn save(&self, tenant: &str, config: &RedactionConfig) -> Result<StoredConfig>;

    async fn delete(&self, tenant: &str) -> Result<()>;

    async fn list_tenants(&self) -> Result<Vec<String>>;
}

/// Tenant ids: 1-128 ASCII letters, digits, `-`, `_` or `.`
pub fn validate_tenant(tenant: &str) -> Result<()> {
    let valid = !tenant.is_empty()
        && tenant.len() <= 128
        && tenant != "."
        && tenant != ".."
        && tenant
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidTenant(tenant.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_tenant() {
        assert!(validate_tenant("acme").is_ok());
        assert!(validate_tenant("acme-corp_2.eu").is_ok());

        assert!(validate_tenant("").is_err());
        assert!(validate_tenant("..").is_err());
        assert!(validate_tenant("a/b").is_err());
        assert!(validate_tenant("tenant id").is_err());
        assert!(validate_tenant(&"x".repeat(129)).is_err());
    }
}
