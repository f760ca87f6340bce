//! HTTP transport implementation.
//!
//! Plain JSON endpoints under `/mcp/*`:
//!
//! - `GET  /mcp/health` - liveness and tool count
//! - `GET  /mcp/list-tools` - server metadata and tool descriptors
//! - `POST /mcp/execute/{tool_name}` - run a tool with a JSON object body;
//!   everything after the prefix is the tool name, so an empty or nested
//!   remainder answers the usual unknown-tool 404
//! - `GET  /mcp/tracing/status` - trace sink configuration
//!
//! Anything else answers `404 {"error":"Not found"}`. Every `OPTIONS`
//! request is a CORS preflight and gets `204` with the CORS headers.

use std::any::Any;

use axum::{
    Json, Router,
    extract::{Path, Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use http::{HeaderValue, Method, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;
use crate::domains::tools::{ParameterMap, ToolError};

const ALLOWED_METHODS: &str = "GET, POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Run the HTTP transport until Ctrl-C or SIGTERM.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let tool_count = server.tool_count();
        let app = router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("Ready - listening on {} ({} tools)", addr, tool_count);
        info!("  → Health:  GET  /mcp/health");
        info!("  → Tools:   GET  /mcp/list-tools");
        info!("  → Execute: POST /mcp/execute/{{tool_name}}");
        info!("  → Tracing: GET  /mcp/tracing/status");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        info!("HTTP transport stopped");
        Ok(())
    }
}

/// Build the application router.
///
/// Layers, outermost first: preflight short-circuit, request tracing,
/// CORS headers, panic recovery.
pub fn router(server: McpServer) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/mcp/health", get(health_check))
        .route("/mcp/list-tools", get(list_tools))
        .route("/mcp/tracing/status", get(tracing_status))
        .route("/mcp/execute/", post(execute_unnamed_tool))
        .route("/mcp/execute/{*tool_name}", post(execute_tool))
        .fallback(not_found)
        .method_not_allowed_fallback(not_found)
        .with_state(server)
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(preflight))
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(CatchPanicLayer::custom(panic_response)),
        )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint.
async fn health_check(State(server): State<McpServer>) -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": server.version(),
        "toolCount": server.tool_count(),
    }))
}

/// Server metadata plus every tool descriptor.
async fn list_tools(State(server): State<McpServer>) -> impl IntoResponse {
    Json(json!({
        "name": server.name(),
        "description": server.description(),
        "version": server.version(),
        "tools": server.list_tools(),
    }))
}

async fn tracing_status(State(server): State<McpServer>) -> impl IntoResponse {
    Json(server.tracing_status())
}

/// Execute a tool by name.
async fn execute_tool(
    State(server): State<McpServer>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> Response {
    run_tool(server, tool_name, body).await
}

/// `POST /mcp/execute/` names no tool at all.
async fn execute_unnamed_tool(State(server): State<McpServer>, body: Bytes) -> Response {
    run_tool(server, String::new(), body).await
}

#[instrument(skip(server, body))]
async fn run_tool(server: McpServer, tool_name: String, body: Bytes) -> Response {
    let dispatcher = server.dispatcher();

    let tool = match dispatcher.find(&tool_name) {
        Ok(tool) => tool,
        Err(e) => {
            warn!("Unknown tool requested: {}", tool_name);
            return error_response(StatusCode::NOT_FOUND, json!({ "error": e.to_string() }));
        }
    };

    let Some(params) = parse_body(&body) else {
        warn!("Rejected non-JSON body for {}", tool_name);
        return error_response(
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Invalid request body",
                "message": "Request body must be valid JSON",
            }),
        );
    };

    match dispatcher.execute(tool.as_ref(), &params).await {
        Ok(result) => Json(json!({ "result": result })).into_response(),
        Err(ToolError::MissingParameters(missing)) => {
            warn!("Missing parameters for {}: {:?}", tool_name, missing);
            error_response(
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Missing required parameters",
                    "missingParams": missing,
                }),
            )
        }
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "error": "Tool execution failed",
                "message": e.to_string(),
            }),
        ),
    }
}

async fn not_found() -> Response {
    error_response(StatusCode::NOT_FOUND, json!({ "error": "Not found" }))
}

// ============================================================================
// Middleware
// ============================================================================

/// Answer every `OPTIONS` request as a CORS preflight.
async fn preflight(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
    response
}

/// Turn a handler panic into the regular execution-failure response.
fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic".to_string()
    };

    error!("Handler panicked: {}", message);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({
            "error": "Tool execution failed",
            "message": message,
        }),
    )
}

// ============================================================================
// Helper Functions
// ============================================================================

fn error_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

/// Parse a request body into a parameter mapping.
///
/// `None` when the body is not JSON. Valid JSON that is not an object
/// yields an empty mapping.
fn parse_body(body: &[u8]) -> Option<ParameterMap> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(map) => Some(map),
        _ => Some(ParameterMap::new()),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

// ============================================================================
// Tests
// ============================================================================
