//! Config stores for redact
//!
//! This crate provides:
//! - The `ConfigStore` contract (load/save a tenant's ruleset)
//! - SQLite store
//! - Remote HTTP store over an injected `Fetch` capability
//! - Retry policy and a retrying store decorator

pub mod db;
pub mod error;
pub mod remote;
pub mod retry;
pub mod store;

pub use db::SqliteStore;
pub use error::{Result, StorageError};
pub use remote::{Fetch, FetchRequest, FetchResponse, HttpConfigStore, Method, ReqwestFetch};
pub use retry::{RetryPolicy, RetryingStore};
pub use store::{ConfigStore, validate_tenant};
