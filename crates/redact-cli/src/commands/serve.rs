use anyhow::Result;
use redact_config::Settings;
use redact_server::RedactServer;
use std::sync::Arc;

use super::open_store;

pub async fn handle(
    settings: &Settings,
    host: Option<String>,
    port: Option<u16>,
    read_only: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| settings.server.host.clone());
    let port = port.unwrap_or(settings.server.port);
    let read_only = read_only || settings.server.read_only;

    let store = open_store(settings).await?;
    let server = Arc::new(RedactServer::new(store, read_only));
    server.serve(&host, port).await
}

pub async fn handle_stdio(settings: &Settings, read_only: bool) -> Result<()> {
    let read_only = read_only || settings.server.read_only;

    let store = open_store(settings).await?;
    let server = Arc::new(RedactServer::new(store, read_only));
    redact_server::run_stdio(server).await
}
