//! MCP Server Entry Point
//!
//! Loads configuration, initializes logging, builds the server and runs the
//! configured transport.

use anyhow::Result;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use estate_mcp_server::core::config::LoggingConfig;
use estate_mcp_server::core::{Config, McpServer, TransportService};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration from environment
    let config = Config::from_env();

    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);
    match &config.trace_sink.endpoint {
        Some(endpoint) => info!("Execution tracing enabled ({})", endpoint),
        None => warn!("MCP_TRACE_ENDPOINT not set - execution tracing disabled"),
    }
    if config.tools.simulate_latency {
        info!("Simulated tool latency enabled");
    }

    let server = McpServer::new(config.clone())?;
    info!("Server initialized with {} tools", server.tool_count());

    let transport = TransportService::new(config.transport);
    transport.run(server).await?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Output goes to stderr; `RUST_LOG` directives are combined with the
/// configured level.
fn init_logging(logging: &LoggingConfig) {
    let level = match logging.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);

    if logging.with_timestamps {
        builder.init();
    } else {
        builder.without_time().init();
    }
}
