use thiserror::Error;

use crate::result::{RuleLocation, SkipReason};

#[derive(Error, Debug)]
pub enum RedactError {
    #[error("Invalid rule at {location}: {reason}")]
    InvalidRule {
        location: RuleLocation,
        reason: SkipReason,
    },

    #[error("Malformed config: {0}")]
    MalformedConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RedactError {
    /// True when the error means the caller's configuration was rejected
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            RedactError::MalformedConfig(_) | RedactError::InvalidRule { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RedactError>;
