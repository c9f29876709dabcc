//! Retry policy for store access

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redact_config::RetryConfig;
use redact_core::{RedactionConfig, StoredConfig};
use tracing::warn;

use crate::Result;
use crate::store::ConfigStore;

/// Exponential backoff for transient store errors
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts including the first one
    pub max_attempts: u32,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            initial_backoff: Duration::from_millis(config.initial_backoff_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            multiplier: config.multiplier,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Delay after the given failed attempt (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);

        if !secs.is_finite() || secs >= self.max_backoff.as_secs_f64() {
            return self.max_backoff;
        }
        Duration::from_secs_f64(secs.max(0.0))
    }

    /// Run `operation`, retrying transient failures
    pub async fn run<T, F, Fut>(&self, name: &str, mut operation: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < max_attempts => {
                    let delay = self.backoff(attempt);
                    warn!(
                        operation = name,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "store operation failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Wraps a store so every operation follows a retry policy
pub struct RetryingStore<S> {
    inner: S,
    policy: RetryPolicy,
}

impl<S: ConfigStore> RetryingStore<S> {
    pub fn new(inner: S, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[async_trait]
impl<S: ConfigStore> ConfigStore for RetryingStore<S> {
    async fn load(&self, tenant: &str) -> Result<StoredConfig> {
        self.policy.run("load", || self.inner.load(tenant)).await
    }

    async fn save(&self, tenant: &str, config: &RedactionConfig) -> Result<StoredConfig> {
        self.policy
            .run("save", || self.inner.save(tenant, config))
            .await
    }

    async fn delete(&self, tenant: &str) -> Result<()> {
        self.policy.run("delete", || self.inner.delete(tenant)).await
    }

    async fn list_tenants(&self) -> Result<Vec<String>> {
        self.policy
            .run("list_tenants", || self.inner.list_tenants())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StorageError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            initial_backoff: Duration::from_millis(1),
            max_backoff: Duration::from_millis(2),
            multiplier: 2.0,
        }
    }

    /// Fails `failures` times with the given error, then succeeds
    struct Flaky {
        calls: AtomicU32,
        failures: u32,
        transient: bool,
    }

    impl Flaky {
        fn new(failures: u32, transient: bool) -> Self {
            Self {
                calls: AtomicU32::new(0),
                failures,
                transient,
            }
        }

        fn attempt(&self) -> Result<()> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                if self.transient {
                    return Err(StorageError::Timeout);
                }
                return Err(StorageError::NotFound("acme".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl ConfigStore for Flaky {
        async fn load(&self, tenant: &str) -> Result<StoredConfig> {
            self.attempt()?;
            Ok(StoredConfig::new(tenant, RedactionConfig::default(), 1)?)
        }

        async fn save(&self, tenant: &str, config: &RedactionConfig) -> Result<StoredConfig> {
            self.attempt()?;
            Ok(StoredConfig::new(tenant, config.clone(), 1)?)
        }

        async fn delete(&self, _tenant: &str) -> Result<()> {
            self.attempt()
        }

        async fn list_tenants(&self) -> Result<Vec<String>> {
            self.attempt()?;
            Ok(vec![])
        }
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(350),
            multiplier: 2.0,
        };
        assert_eq!(policy.backoff(1), Duration::from_millis(100));
        assert_eq!(policy.backoff(2), Duration::from_millis(200));
        assert_eq!(policy.backoff(3), Duration::from_millis(350));
        assert_eq!(policy.backoff(60), Duration::from_millis(350));
    }

    #[test]
    fn test_default_policy_matches_settings() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(200));
        assert_eq!(policy.max_backoff, Duration::from_secs(2));
    }

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let store = RetryingStore::new(Flaky::new(2, true), fast_policy(3));
        assert!(store.load("acme").await.is_ok());
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let store = RetryingStore::new(Flaky::new(5, true), fast_policy(3));
        let err = store.list_tenants().await.unwrap_err();
        assert!(matches!(err, StorageError::Timeout));
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let store = RetryingStore::new(Flaky::new(1, false), fast_policy(3));
        let err = store.delete("acme").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_none_policy_tries_once() {
        let store = RetryingStore::new(Flaky::new(1, true), RetryPolicy::none());
        assert!(store.save("acme", &RedactionConfig::default()).await.is_err());
        assert_eq!(store.inner().calls.load(Ordering::SeqCst), 1);
    }
}
