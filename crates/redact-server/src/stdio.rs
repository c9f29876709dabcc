use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, PARSE_ERROR};
use crate::server::RedactServer;
use crate::tools::handle_jsonrpc;

/// Serve the JSON-RPC tool surface over newline-delimited stdin/stdout
pub async fn run_stdio(server: Arc<RedactServer>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<JsonRpcRequest>(&line) {
            Ok(req) => {
                debug!(method = %req.method, "stdio request");
                match handle_jsonrpc(&server, req).await {
                    Some(response) => response,
                    None => continue,
                }
            }
            Err(e) => JsonRpcResponse::error(
                serde_json::Value::Null,
                PARSE_ERROR,
                &format!("Parse error: {}", e),
            ),
        };

        let mut output = serde_json::to_vec(&response)?;
        output.push(b'\n');
        stdout.write_all(&output).await?;
        stdout.flush().await?;
    }

    Ok(())
}
