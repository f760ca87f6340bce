//! MCP Server implementation and lifecycle management.
//!
//! [`McpServer`] owns the configuration and the tool [`Dispatcher`]. The HTTP
//! transport calls its helper methods directly; the STDIO transport goes
//! through the rmcp [`ServerHandler`] implementation, whose tool router is
//! built from the same registry.

use std::sync::Arc;

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use serde::Serialize;

use super::config::Config;
use super::telemetry::trace_sink_from_config;
use crate::domains::catalog::Catalog;
use crate::domains::tools::{Dispatcher, ToolDescriptor, ToolRegistry, build_tool_router};

/// Trace sink state as reported by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TracingStatus {
    pub enabled: bool,
    pub host: Option<String>,
}

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Shared tool execution path.
    dispatcher: Arc<Dispatcher>,

    /// Tool router for STDIO tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a server with the built-in catalog and the configured trace sink.
    pub fn new(config: Config) -> crate::Result<Self> {
        let registry = ToolRegistry::with_default_tools(&Catalog::in_memory(), config.tools)?;
        let sink = trace_sink_from_config(&config.trace_sink);
        Ok(Self::from_parts(
            config,
            Arc::new(Dispatcher::new(Arc::new(registry), sink)),
        ))
    }

    /// Create a server around an existing dispatcher.
    pub fn from_parts(config: Config, dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            tool_router: build_tool_router::<Self>(dispatcher.clone()),
            config: Arc::new(config),
            dispatcher,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    pub fn description(&self) -> &str {
        &self.config.server.description
    }

    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    pub fn tool_count(&self) -> usize {
        self.dispatcher.registry().len()
    }

    /// Public descriptors of every registered tool.
    pub fn list_tools(&self) -> Vec<ToolDescriptor> {
        self.dispatcher.registry().descriptors()
    }

    pub fn tracing_status(&self) -> TracingStatus {
        let sink = self.dispatcher.trace_sink();
        TracingStatus {
            enabled: sink.is_enabled(),
            host: sink.host().map(str::to_string),
        }
    }
}

/// ServerHandler implementation with tool_handler macro for automatic tool routing.
#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(format!(
                "{}. Tools: property search, property analysis, market insights, proposal generation and translation.",
                self.config.server.description
            )),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
