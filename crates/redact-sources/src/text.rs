use std::path::Path;

use async_trait::async_trait;

use crate::handler::{Document, DocumentHandler, Result, SourceError};

const UTF8_BOM: &str = "\u{feff}";

/// Plain text formats, redacted as-is
pub struct PlainTextHandler {
    extensions: Vec<(&'static str, &'static str)>,
}

impl PlainTextHandler {
    pub fn new() -> Self {
        Self {
            extensions: vec![
                ("txt", "text/plain"),
                ("text", "text/plain"),
                ("log", "text/plain"),
                ("md", "text/markdown"),
                ("markdown", "text/markdown"),
                ("csv", "text/csv"),
                ("json", "application/json"),
                ("eml", "message/rfc822"),
            ],
        }
    }

    fn media_type(&self, path: &Path) -> Option<&'static str> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.extensions
            .iter()
            .find(|(known, _)| *known == ext)
            .map(|(_, media)| *media)
    }
}

impl Default for PlainTextHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentHandler for PlainTextHandler {
    async fn extract(&self, path: &Path) -> Result<Document> {
        let media_type = self
            .media_type(path)
            .ok_or_else(|| SourceError::Unsupported(path.display().to_string()))?;

        let bytes = tokio::fs::read(path).await?;
        let content_hash = blake3::hash(&bytes).to_hex().to_string();

        let content =
            String::from_utf8(bytes).map_err(|_| SourceError::NotUtf8(path.display().to_string()))?;

        let (text, bom) = match content.strip_prefix(UTF8_BOM) {
            Some(rest) => (rest.to_string(), true),
            None => (content, false),
        };

        Ok(Document {
            path: path.to_path_buf(),
            text,
            media_type: media_type.to_string(),
            content_hash,
            bom,
        })
    }

    async fn reinsert(&self, document: &Document, redacted: &str, output: &Path) -> Result<()> {
        let mut content = String::with_capacity(redacted.len() + UTF8_BOM.len());
        if document.bom {
            content.push_str(UTF8_BOM);
        }
        content.push_str(redacted);

        if let Some(parent) = output.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(output, content).await?;
        Ok(())
    }

    fn can_handle(&self, path: &Path) -> bool {
        self.media_type(path).is_some()
    }
}
