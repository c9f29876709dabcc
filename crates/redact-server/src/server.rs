use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use redact_core::{RedactionConfig, RedactionRequest};
use redact_storage::{ConfigStore, StorageError};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::protocol::JsonRpcRequest;
use crate::tools::handle_jsonrpc;

#[derive(Deserialize)]
struct ApplyRequest {
    text: String,
}

pub struct RedactServer {
    pub store: Arc<dyn ConfigStore>,
    pub read_only: bool,
}

impl RedactServer {
    pub fn new(store: Arc<dyn ConfigStore>, read_only: bool) -> Self {
        Self { store, read_only }
    }

    pub async fn serve(self: Arc<Self>, host: &str, port: u16) -> anyhow::Result<()> {
        let app = router(self);

        let addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&addr).await?;

        info!("redact server listening on {}", addr);

        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Build the HTTP router
pub fn router(server: Arc<RedactServer>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handle_info))
        .route("/mcp", post(handle_mcp_post))
        .route("/api/config", get(api_list_configs))
        .route(
            "/api/config/:tenant",
            get(api_get_config)
                .put(api_put_config)
                .delete(api_delete_config),
        )
        .route("/api/test-redaction", post(api_test_redaction))
        .route("/api/redact/:tenant", post(api_redact))
        .layer(cors)
        .with_state(server)
}

/// GET /health
async fn handle_info() -> Json<serde_json::Value> {
    Json(json!({
        "name": "redact",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// POST /mcp - Handle JSON-RPC messages (stateless mode)
async fn handle_mcp_post(
    State(server): State<Arc<RedactServer>>,
    Json(req): Json<JsonRpcRequest>,
) -> Response {
    match handle_jsonrpc(&server, req).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

fn error_response(status: StatusCode, kind: &str, message: String) -> Response {
    (status, Json(json!({ "error": message, "kind": kind }))).into_response()
}

fn rejection_response(rejection: JsonRejection) -> Response {
    error_response(rejection.status(), "malformed_request", rejection.body_text())
}

/// 422 for a config that failed validation, echoing the untouched text
fn malformed_config_response(message: String, text: Option<String>) -> Response {
    let mut body = json!({ "error": message, "kind": "malformed_config" });
    if let Some(text) = text {
        body["text"] = json!(text);
    }
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

fn read_only_response() -> Response {
    error_response(
        StatusCode::FORBIDDEN,
        "read_only",
        "Server is in read-only mode".to_string(),
    )
}

fn storage_error_response(e: StorageError) -> Response {
    let (status, kind) = match &e {
        StorageError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        StorageError::InvalidTenant(_) => (StatusCode::BAD_REQUEST, "invalid_tenant"),
        StorageError::Config(_) => (StatusCode::UNPROCESSABLE_ENTITY, "malformed_config"),
        e if e.is_transient() => (StatusCode::SERVICE_UNAVAILABLE, "store_unavailable"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "store_error"),
    };

    if status.is_server_error() {
        warn!(error = %e, "config store request failed");
    }
    error_response(status, kind, e.to_string())
}

/// GET /api/config - List tenants with a stored config
async fn api_list_configs(State(server): State<Arc<RedactServer>>) -> Response {
    match server.store.list_tenants().await {
        Ok(tenants) => Json(json!({ "tenants": tenants })).into_response(),
        Err(e) => storage_error_response(e),
    }
}

/// GET /api/config/:tenant - Load a tenant's config
async fn api_get_config(
    State(server): State<Arc<RedactServer>>,
    Path(tenant): Path<String>,
) -> Response {
    match server.store.load(&tenant).await {
        Ok(stored) => Json(stored).into_response(),
        Err(e) => storage_error_response(e),
    }
}

/// PUT /api/config/:tenant - Replace a tenant's config
async fn api_put_config(
    State(server): State<Arc<RedactServer>>,
    Path(tenant): Path<String>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Response {
    if server.read_only {
        return read_only_response();
    }

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    let config = match RedactionConfig::from_value(body) {
        Ok(config) => config,
        Err(e) => return malformed_config_response(e.to_string(), None),
    };

    match server.store.save(&tenant, &config).await {
        Ok(stored) => Json(stored).into_response(),
        Err(e) => storage_error_response(e),
    }
}

/// DELETE /api/config/:tenant
async fn api_delete_config(
    State(server): State<Arc<RedactServer>>,
    Path(tenant): Path<String>,
) -> Response {
    if server.read_only {
        return read_only_response();
    }

    match server.store.delete(&tenant).await {
        Ok(()) => Json(json!({
            "message": format!("Config for '{}' deleted", tenant)
        }))
        .into_response(),
        Err(e) => storage_error_response(e),
    }
}

/// POST /api/test-redaction - Dry-run; never touches the store
async fn api_test_redaction(payload: Result<Json<serde_json::Value>, JsonRejection>) -> Response {
    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => return rejection_response(rejection),
    };

    let text = body["text"].as_str().map(str::to_string);
    let request: RedactionRequest = match serde_json::from_value(body) {
        Ok(request) => request,
        Err(e) => return malformed_config_response(format!("Malformed request: {}", e), text),
    };

    match redact_engine::preview(&request) {
        Ok(result) => Json(result).into_response(),
        Err(e) => malformed_config_response(e.to_string(), Some(request.text)),
    }
}

/// POST /api/redact/:tenant - Apply a tenant's stored config to extracted text
async fn api_redact(
    State(server): State<Arc<RedactServer>>,
    Path(tenant): Path<String>,
    Json(request): Json<ApplyRequest>,
) -> Response {
    let stored = match server.store.load(&tenant).await {
        Ok(stored) => stored,
        Err(e) => return storage_error_response(e),
    };

    match redact_engine::evaluate_config(&request.text, &stored.config) {
        Ok(result) => {
            info!(
                tenant = %tenant,
                revision = stored.revision,
                replacements = result.replacements_made,
                "redacted document"
            );
            Json(json!({
                "tenant": tenant,
                "revision": stored.revision,
                "config_hash": stored.config_hash,
                "redacted_text": result.redacted_text,
                "replacements_made": result.replacements_made,
                "triggered": result.triggered,
                "diagnostics": result.diagnostics,
            }))
            .into_response()
        }
        Err(e) => malformed_config_response(e.to_string(), None),
    }
}
