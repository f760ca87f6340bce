//! STDIO transport implementation.
//!
//! Serves the tool registry over MCP JSON-RPC on stdin/stdout. Logs go to
//! stderr so stdout carries protocol frames only.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve until the client closes stdin.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!(
            "Ready - serving {} tools to an MCP client via stdin/stdout",
            server.tool_count()
        );

        let running = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        let reason = running
            .waiting()
            .await
            .map_err(|e| TransportError::service(e.to_string()))?;

        info!("MCP client session ended: {:?}", reason);
        Ok(())
    }
}
