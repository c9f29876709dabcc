//! JSON-RPC tool surface shared by the HTTP and stdio transports

use redact_core::{RedactionConfig, RedactionRequest};
use serde_json::json;
use tracing::debug;

use crate::protocol::{JsonRpcRequest, JsonRpcResponse, METHOD_NOT_FOUND};
use crate::server::RedactServer;

/// Dispatch one request; notifications yield `None`
pub async fn handle_jsonrpc(server: &RedactServer, req: JsonRpcRequest) -> Option<JsonRpcResponse> {
    if req.is_notification() {
        debug!(method = %req.method, "notification received");
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => {
            let result = json!({
                "protocolVersion": "2024-11-05",
                "capabilities": { "tools": {} },
                "serverInfo": { "name": "redact", "version": env!("CARGO_PKG_VERSION") }
            });
            JsonRpcResponse::success(req.id, result)
        }
        "initialized" | "ping" => {
            JsonRpcResponse::success(req.id, json!({}))
        }
        "tools/list" => JsonRpcResponse::success(req.id, list_tools(server.read_only)),
        "tools/call" => {
            let outcome = call_tool(server, &req.params).await;
            JsonRpcResponse::from_tool(req.id, outcome)
        }
        _ => JsonRpcResponse::error(
            req.id,
            METHOD_NOT_FOUND,
            &format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

pub async fn call_tool(
    server: &RedactServer,
    params: &serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let tool_name = params["name"]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing tool name"))?;
    let args = &params["arguments"];

    match tool_name {
        "redact_test" => {
            let request: RedactionRequest = serde_json::from_value(args.clone())?;
            let result = redact_engine::preview(&request)?;
            Ok(serde_json::to_value(result)?)
        }
        "redact_apply" => {
            let tenant = string_arg(args, "tenant")?;
            let text = string_arg(args, "text")?;

            let stored = server.store.load(tenant).await?;
            let result = redact_engine::evaluate_config(text, &stored.config)?;

            Ok(json!({
                "tenant": tenant,
                "revision": stored.revision,
                "result": result,
            }))
        }
        "redact_config_get" => {
            let tenant = string_arg(args, "tenant")?;
            let stored = server.store.load(tenant).await?;
            Ok(serde_json::to_value(stored)?)
        }
        "redact_config_put" => {
            if server.read_only {
                anyhow::bail!("Server is in read-only mode");
            }
            let tenant = string_arg(args, "tenant")?;
            let config = RedactionConfig::from_value(args["config"].clone())?;
            let stored = server.store.save(tenant, &config).await?;

            Ok(json!({
                "tenant": stored.tenant,
                "revision": stored.revision,
                "config_hash": stored.config_hash,
            }))
        }
        _ => anyhow::bail!("Unknown tool: {}", tool_name),
    }
}

fn string_arg<'a>(args: &'a serde_json::Value, name: &str) -> anyhow::Result<&'a str> {
    args[name]
        .as_str()
        .ok_or_else(|| anyhow::anyhow!("Missing {} parameter", name))
}

pub fn list_tools(read_only: bool) -> serde_json::Value {
    let config_schema = json!({
        "type": "object",
        "description": "Ruleset: replacements, case_sensitive, optional conditional_rules"
    });

    let mut tools = vec![
        tool_schema(
            "redact_test",
            "Dry-run a redaction config against sample text; nothing is stored",
            json!({
                "type": "object",
                "properties": {
                    "text": {"type": "string"},
                    "config": config_schema
                },
                "required": ["text", "config"]
            }),
        ),
        tool_schema(
            "redact_apply",
            "Redact text with a tenant's stored config",
            json!({
                "type": "object",
                "properties": {
                    "tenant": {"type": "string"},
                    "text": {"type": "string"}
                },
                "required": ["tenant", "text"]
            }),
        ),
        tool_schema(
            "redact_config_get",
            "Get a tenant's stored config",
            json!({
                "type": "object",
                "properties": {
                    "tenant": {"type": "string"}
                },
                "required": ["tenant"]
            }),
        ),
    ];

    if !read_only {
        tools.push(tool_schema(
            "redact_config_put",
            "Replace a tenant's stored config",
            json!({
                "type": "object",
                "properties": {
                    "tenant": {"type": "string"},
                    "config": config_schema
                },
                "required": ["tenant", "config"]
            }),
        ));
    }

    json!({ "tools": tools })
}

fn tool_schema(
    name: &str,
    description: &str,
    input_schema: serde_json::Value,
) -> serde_json::Value {
    json!({
        "name": name,
        "description": description,
        "inputSchema": input_schema
    })
}
