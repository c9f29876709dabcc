//! Document handlers
//!
//! Extraction of binary formats (PDF, DOCX, XLSX) is done by external
//! services; this crate only covers the text boundary: pull plain text out of
//! a document and write redacted text back in the same container shape.

pub mod handler;
pub mod text;

pub use handler::{Document, DocumentHandler, DocumentHandlerRegistry, Result, SourceError};
pub use text::PlainTextHandler;
