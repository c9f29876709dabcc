//! JSON-RPC 2.0 protocol types

use serde::{Deserialize, Serialize};

pub const PARSE_ERROR: i32 = -32700;
pub const METHOD_NOT_FOUND: i32 = -32601;
pub const TOOL_ERROR: i32 = -32000;

#[derive(Debug, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: serde_json::Value,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl JsonRpcRequest {
    /// Notifications carry no id and never get a reply
    pub fn is_notification(&self) -> bool {
        self.id.is_null() && self.method.starts_with("notifications/")
    }
}

#[derive(Debug, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
}

impl JsonRpcResponse {
    pub fn success(id: serde_json::Value, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: serde_json::Value, code: i32, message: &str) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.to_string(),
            }),
        }
    }

    /// Wrap a tool outcome, mapping failures to `TOOL_ERROR`
    pub fn from_tool(id: serde_json::Value, outcome: anyhow::Result<serde_json::Value>) -> Self {
        match outcome {
            Ok(result) => Self::success(id, result),
            Err(e) => Self::error(id, TOOL_ERROR, &format!("{:#}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_omits_error() {
        let response = JsonRpcResponse::success(serde_json::json!(1), serde_json::json!({"ok": true}));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["jsonrpc"], "2.0");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_tool_failure_maps_to_error() {
        let response =
            JsonRpcResponse::from_tool(serde_json::json!("a"), Err(anyhow::anyhow!("boom")));
        assert!(response.result.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.code, TOOL_ERROR);
        assert_eq!(error.message, "boom");
    }

    #[test]
    fn test_notification_without_id() {
        let req: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#)
                .unwrap();
        assert!(req.id.is_null());
        assert!(req.params.is_null());
        assert!(req.is_notification());

        let ping: JsonRpcRequest =
            serde_json::from_str(r#"{"jsonrpc": "2.0", "id": 3, "method": "ping"}"#).unwrap();
        assert!(!ping.is_notification());
    }
}
