//! Transport layer for the MCP server.
//!
//! This module provides different transport implementations:
//! - **HTTP**: REST endpoints under `/mcp/*` - feature: `http`
//! - **STDIO**: MCP JSON-RPC over standard input/output - feature: `stdio`
//!
//! Each transport handles the connection lifecycle and delegates tool
//! execution to the shared [`Dispatcher`](crate::domains::tools::Dispatcher).

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
