//! Remote config store
//!
//! The HTTP client is an injected capability: [`HttpConfigStore`] only knows
//! how to build requests and interpret responses. Credentials, token refresh
//! and transport policy belong to the [`Fetch`] implementation.

use std::time::Duration;

use async_trait::async_trait;
use redact_core::{RedactionConfig, StoredConfig};
use tracing::debug;

use crate::store::{ConfigStore, validate_tenant};
use crate::{Result, StorageError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Put,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: Method,
    pub url: String,
    /// JSON body
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Stateless request capability
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;
}

/// `Fetch` over a shared reqwest client with an optional static bearer token
pub struct ReqwestFetch {
    client: reqwest::Client,
    token: Option<String>,
}

impl ReqwestFetch {
    pub fn new(timeout: Duration, token: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("redact/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| StorageError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, token })
    }
}

#[async_trait]
impl Fetch for ReqwestFetch {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Put => self.client.put(&request.url),
            Method::Delete => self.client.delete(&request.url),
        };

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = request.body {
            builder = builder
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                StorageError::Timeout
            } else {
                StorageError::Transport(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| StorageError::Transport(format!("Failed to read response: {}", e)))?;

        Ok(FetchResponse { status, body })
    }
}

/// Config store backed by a remote HTTP service
///
/// Wire contract:
/// - `GET {base}/tenants` returns a JSON array of tenant ids
/// - `GET|PUT|DELETE {base}/tenants/{tenant}/config` with the JSON config record
///
/// The remote service does not report revisions, so returned records carry
/// revision 0.
pub struct HttpConfigStore<F> {
    fetch: F,
    base_url: String,
}

impl<F: Fetch> HttpConfigStore<F> {
    pub fn new(fetch: F, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { fetch, base_url }
    }

    fn config_url(&self, tenant: &str) -> String {
        format!("{}/tenants/{}/config", self.base_url, tenant)
    }

    async fn send(&self, method: Method, url: String, body: Option<String>) -> Result<FetchResponse> {
        debug!(?method, %url, "remote config request");
        self.fetch.fetch(FetchRequest { method, url, body }).await
    }
}

fn check_status(tenant: &str, response: FetchResponse) -> Result<FetchResponse> {
    if response.is_success() {
        return Ok(response);
    }

    match response.status {
        404 => Err(StorageError::NotFound(tenant.to_string())),
        status => Err(StorageError::Http {
            status,
            body: response.body,
        }),
    }
}

#[async_trait]
impl<F: Fetch> ConfigStore for HttpConfigStore<F> {
    async fn load(&self, tenant: &str) -> Result<StoredConfig> {
        validate_tenant(tenant)?;

        let response = self.send(Method::Get, self.config_url(tenant), None).await?;
        let response = check_status(tenant, response)?;

        let config = RedactionConfig::from_json(&response.body)?;
        Ok(StoredConfig::new(tenant, config, 0)?)
    }

    async fn save(&self, tenant: &str, config: &RedactionConfig) -> Result<StoredConfig> {
        validate_tenant(tenant)?;
        config.validate()?;

        let body = serde_json::to_string(config)?;
        let response = self
            .send(Method::Put, self.config_url(tenant), Some(body))
            .await?;
        check_status(tenant, response)?;

        Ok(StoredConfig::new(tenant, config.clone(), 0)?)
    }

    async fn delete(&self, tenant: &str) -> Result<()> {
        validate_tenant(tenant)?;

        let response = self
            .send(Method::Delete, self.config_url(tenant), None)
            .await?;
        check_status(tenant, response)?;
        Ok(())
    }

    async fn list_tenants(&self) -> Result<Vec<String>> {
        let url = format!("{}/tenants", self.base_url);
        let response = self.send(Method::Get, url, None).await?;
        let response = check_status("*", response)?;
        Ok(serde_json::from_str(&response.body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Replays canned responses and records requests
    struct Scripted {
        responses: Mutex<Vec<FetchResponse>>,
        seen: Mutex<Vec<FetchRequest>>,
    }

    impl Scripted {
        fn new(mut responses: Vec<FetchResponse>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Fetch for Scripted {
        async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
            self.seen.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| StorageError::Transport("no scripted response".to_string()))
        }
    }

    fn ok(body: &str) -> FetchResponse {
        FetchResponse {
            status: 200,
            body: body.to_string(),
        }
    }

    #[tokio::test]
    async fn test_load_parses_record() {
        let fetch = Scripted::new(vec![ok(
            r#"{"replacements": [{"find": "a", "replace": "b"}], "case_sensitive": true}"#,
        )]);
        let store = HttpConfigStore::new(fetch, "https://rules.example/");

        let stored = store.load("acme").await.unwrap();
        assert_eq!(stored.tenant, "acme");
        assert_eq!(stored.revision, 0);
        assert!(stored.config.ruleset.case_sensitive);

        let seen = store.fetch.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Get);
        assert_eq!(seen[0].url, "https://rules.example/tenants/acme/config");
    }

    #[tokio::test]
    async fn test_load_not_found() {
        let fetch = Scripted::new(vec![FetchResponse {
            status: 404,
            body: String::new(),
        }]);
        let store = HttpConfigStore::new(fetch, "https://rules.example");

        let err = store.load("acme").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(t) if t == "acme"));
    }

    #[tokio::test]
    async fn test_load_malformed_record() {
        let fetch = Scripted::new(vec![ok(r#"{"replacements": []}"#)]);
        let store = HttpConfigStore::new(fetch, "https://rules.example");

        let err = store.load("acme").await.unwrap_err();
        assert!(matches!(err, StorageError::Config(_)));
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_save_sends_json_body() {
        let fetch = Scripted::new(vec![ok("")]);
        let store = HttpConfigStore::new(fetch, "https://rules.example");
        let config = RedactionConfig::from_json(
            r#"{"replacements": [{"find": "x", "replace": "y"}], "case_sensitive": false}"#,
        )
        .unwrap();

        store.save("acme", &config).await.unwrap();

        let seen = store.fetch.seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Put);
        let sent = RedactionConfig::from_json(seen[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, config);
    }

    #[tokio::test]
    async fn test_server_error_is_transient() {
        let fetch = Scripted::new(vec![FetchResponse {
            status: 502,
            body: "bad gateway".to_string(),
        }]);
        let store = HttpConfigStore::new(fetch, "https://rules.example");

        let err = store.list_tenants().await.unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_invalid_tenant_never_fetches() {
        let fetch = Scripted::new(vec![]);
        let store = HttpConfigStore::new(fetch, "https://rules.example");

        let err = store.load("../etc").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidTenant(_)));
        assert!(store.fetch.seen.lock().unwrap().is_empty());
    }
}
