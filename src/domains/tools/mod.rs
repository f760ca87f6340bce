//! Tools domain module.
//!
//! Tools are executable functions that MCP clients call by name with a
//! parameter mapping.
//!
//! ## Architecture
//!
//! - `definitions/` - Individual tool implementations (one file per tool)
//! - `handlers.rs` - The [`ToolHandler`] contract and public descriptors
//! - `registry.rs` - Ordered set of tools with unique names
//! - `validation.rs` - Required-parameter presence check
//! - `dispatcher.rs` - Lookup, validation, execution and tracing
//! - `router.rs` - rmcp ToolRouter for the STDIO transport
//! - `error.rs` - Tool-specific error types
//!
//! ## Adding a New Tool
//!
//! 1. Create a new file in `definitions/` implementing [`ToolHandler`]
//! 2. Export it in `definitions/mod.rs`
//! 3. Register it in [`ToolRegistry::with_default_tools`]
//!
//! Both transports pick it up from the registry.

pub mod definitions;
mod dispatcher;
mod error;
mod handlers;
mod registry;
pub mod router;
pub mod validation;

pub use dispatcher::Dispatcher;
pub use error::ToolError;
pub use handlers::*;
pub use registry::ToolRegistry;
pub use router::build_tool_router;
