//! UAE Real-Estate AI MCP Server Library
//!
//! A tool-execution server for real-estate assistants. Five tools (property
//! search, property analysis, market insights, proposal generation and
//! translation) run over built-in demo data and are exposed through plain
//! HTTP endpoints or the MCP STDIO transport.
//!
//! # Architecture
//!
//! - **core**: configuration, errors, execution tracing, server and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **catalog**: read-only property, market and phrase data
//!   - **tools**: tool definitions, registry, validation and dispatch
//!
//! # Example
//!
//! ```rust,no_run
//! use estate_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let server = McpServer::new(config.clone())?;
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

// Re-export commonly used types for convenience
pub use core::{Config, Error, McpServer, Result};
