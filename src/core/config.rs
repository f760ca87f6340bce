//! Configuration management for the MCP server.
//!
//! Configuration is populated from defaults, then a `.env` file, then the
//! process environment.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Tool execution settings.
    pub tools: ToolsConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// External trace sink configuration.
    pub trace_sink: TraceSinkConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// Human-readable description reported by `list-tools`.
    pub description: String,

    /// The version of the server.
    pub version: String,
}

/// Settings shared by every tool.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Sleep before answering to mimic a backing data store.
    pub simulate_latency: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Where execution events are reported, if anywhere.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct TraceSinkConfig {
    /// Ingestion URL. `None` disables the sink.
    pub endpoint: Option<String>,

    /// Public key sent as the basic-auth user.
    pub public_key: Option<String>,

    /// Secret key sent as the basic-auth password.
    pub secret_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for TraceSinkConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceSinkConfig")
            .field("endpoint", &self.endpoint)
            .field("public_key", &self.public_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl TraceSinkConfig {
    /// Whether an endpoint is configured.
    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "UAE Real-Estate AI MCP Server".to_string(),
                description: "MCP Server for UAE Real-Estate AI Operating System".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            tools: ToolsConfig::default(),
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            trace_sink: TraceSinkConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Server settings use the `MCP_` prefix (`MCP_SERVER_NAME`,
    /// `MCP_LOG_LEVEL`, ...). The HTTP port also honours plain `PORT`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("MCP_LOG_TIMESTAMPS") {
            config.logging.with_timestamps = parse_flag(&timestamps).unwrap_or(true);
        }

        if let Ok(latency) = std::env::var("MCP_SIMULATE_LATENCY") {
            config.tools.simulate_latency = parse_flag(&latency).unwrap_or(false);
        }

        config.transport = TransportConfig::from_env();

        if let Ok(endpoint) = std::env::var("MCP_TRACE_ENDPOINT") {
            config.trace_sink.endpoint = Some(endpoint);
            config.trace_sink.public_key = std::env::var("MCP_TRACE_PUBLIC_KEY").ok();
            config.trace_sink.secret_key = std::env::var("MCP_TRACE_SECRET_KEY").ok();
        }

        config
    }
}

/// Parse a boolean-ish environment value.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_trace_sink_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_TRACE_ENDPOINT", "http://localhost:9999/ingest");
            std::env::set_var("MCP_TRACE_SECRET_KEY", "sk-test");
        }
        let config = Config::from_env();
        assert_eq!(
            config.trace_sink.endpoint.as_deref(),
            Some("http://localhost:9999/ingest")
        );
        assert_eq!(config.trace_sink.secret_key.as_deref(), Some("sk-test"));
        assert!(config.trace_sink.is_enabled());
        unsafe {
            std::env::remove_var("MCP_TRACE_ENDPOINT");
            std::env::remove_var("MCP_TRACE_SECRET_KEY");
        }
    }

    #[test]
    fn test_trace_sink_disabled_by_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_TRACE_ENDPOINT");
        }
        let config = Config::from_env();
        assert!(!config.trace_sink.is_enabled());
    }

    #[test]
    fn test_simulate_latency_flag() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_SIMULATE_LATENCY", "yes");
        }
        assert!(Config::from_env().tools.simulate_latency);
        unsafe {
            std::env::remove_var("MCP_SIMULATE_LATENCY");
        }
        assert!(!Config::from_env().tools.simulate_latency);
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let sink = TraceSinkConfig {
            endpoint: Some("http://trace".to_string()),
            public_key: Some("pk".to_string()),
            secret_key: Some("super_secret_key".to_string()),
        };
        let debug_str = format!("{:?}", sink);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_default_server_identity() {
        let config = Config::default();
        assert_eq!(config.server.name, "UAE Real-Estate AI MCP Server");
        assert_eq!(config.server.version, env!("CARGO_PKG_VERSION"));
        assert!(!config.tools.simulate_latency);
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
