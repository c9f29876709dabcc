//! HTTP and JSON-RPC surfaces for the redaction engine

pub mod protocol;
pub mod server;
pub mod stdio;
pub mod tools;

pub use server::{router, RedactServer};
pub use stdio::run_stdio;
