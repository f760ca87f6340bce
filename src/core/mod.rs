//! Core module containing shared infrastructure components.
//!
//! Configuration, error types, execution tracing, the server handle and the
//! transport layer.

pub mod config;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod transport;

pub use config::Config;
pub use error::{Error, Result};
pub use server::{McpServer, TracingStatus};
pub use telemetry::{TraceEvent, TraceSink};
pub use transport::{TransportConfig, TransportService};
