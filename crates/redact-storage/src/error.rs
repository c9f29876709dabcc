//! Error types for redact-storage

use redact_core::RedactError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("No config stored for tenant: {0}")]
    NotFound(String),

    #[error("Invalid tenant id: {0}")]
    InvalidTenant(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out")]
    Timeout,

    #[error(transparent)]
    Config(#[from] RedactError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StorageError {
    /// Whether a retry could succeed without any change by the caller
    pub fn is_transient(&self) -> bool {
        match self {
            StorageError::Timeout | StorageError::Transport(_) => true,
            StorageError::Http { status, .. } => *status == 429 || *status >= 500,
            StorageError::Database(e) => {
                matches!(e, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(StorageError::Timeout.is_transient());
        assert!(StorageError::Transport("reset".to_string()).is_transient());
        assert!(StorageError::Http { status: 503, body: String::new() }.is_transient());
        assert!(StorageError::Http { status: 429, body: String::new() }.is_transient());

        assert!(!StorageError::Http { status: 400, body: String::new() }.is_transient());
        assert!(!StorageError::NotFound("acme".to_string()).is_transient());
        assert!(
            !StorageError::Config(RedactError::MalformedConfig("x".to_string())).is_transient()
        );
    }
}
