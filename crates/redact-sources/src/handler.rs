//! Document handler trait

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::text::PlainTextHandler;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No handler for {0}; extract its text externally first")]
    Unsupported(String),

    #[error("Document is not valid UTF-8: {0}")]
    NotUtf8(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SourceError>;

/// Text pulled out of a document, plus what is needed to put it back
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub text: String,
    pub media_type: String,
    pub content_hash: String,
    /// Whether the original started with a UTF-8 byte order mark
    pub bom: bool,
}

/// Trait for handling different document types
#[async_trait]
pub trait DocumentHandler: Send + Sync {
    /// Read the document and extract its text
    async fn extract(&self, path: &Path) -> Result<Document>;

    /// Write `redacted` back in the container shape of `document`
    async fn reinsert(&self, document: &Document, redacted: &str, output: &Path) -> Result<()>;

    /// Check if this handler can handle the given path
    fn can_handle(&self, path: &Path) -> bool;
}

/// Picks the first handler that accepts a path
pub struct DocumentHandlerRegistry {
    handlers: Vec<Box<dyn DocumentHandler>>,
}

impl DocumentHandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: vec![Box::new(PlainTextHandler::new())],
        }
    }

    pub fn handler_for(&self, path: &Path) -> Result<&dyn DocumentHandler> {
        self.handlers
            .iter()
            .find(|h| h.can_handle(path))
            .map(|h| h.as_ref())
            .ok_or_else(|| SourceError::Unsupported(path.display().to_string()))
    }
}

impl Default for DocumentHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_rejects_binary_formats() {
        let registry = DocumentHandlerRegistry::new();
        assert!(registry.handler_for(Path::new("notes.txt")).is_ok());
        assert!(registry.handler_for(Path::new("README.md")).is_ok());

        let err = registry
            .handler_for(Path::new("contract.pdf"))
            .err()
            .unwrap();
        assert!(matches!(err, SourceError::Unsupported(_)));
    }
}
