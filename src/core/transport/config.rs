//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (MCP JSON-RPC).
    #[cfg(feature = "stdio")]
    Stdio,

    /// HTTP transport exposing the REST tool endpoints.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

#[cfg(feature = "http")]
fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "http")]
fn default_port() -> u16 {
    3000
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "http")]
        {
            return Self::Http(HttpConfig::default());
        }

        #[cfg(all(not(feature = "http"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "stdio", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or http");
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    ///
    /// `MCP_TRANSPORT=stdio` selects STDIO; anything else selects HTTP when
    /// that feature is compiled in. The HTTP port comes from `PORT`, then
    /// `MCP_HTTP_PORT`, then 3000.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "http")]
            _ => {
                let port = ["PORT", "MCP_HTTP_PORT"]
                    .iter()
                    .filter_map(|key| std::env::var(key).ok())
                    .find_map(|p| p.parse().ok())
                    .unwrap_or_else(default_port);
                let host = std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host());
                Self::Http(HttpConfig { port, host })
            }
            #[cfg(all(not(feature = "http"), feature = "stdio"))]
            _ => Self::Stdio,
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (MCP JSON-RPC)".to_string(),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}", cfg.host, cfg.port),
        }
    }
}

#[cfg(all(test, feature = "http"))]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    const VARS: [&str; 4] = ["MCP_TRANSPORT", "PORT", "MCP_HTTP_PORT", "MCP_HTTP_HOST"];

    fn clear_env() {
        for key in VARS {
            unsafe {
                std::env::remove_var(key);
            }
        }
    }

    fn http_config(config: TransportConfig) -> HttpConfig {
        match config {
            TransportConfig::Http(cfg) => cfg,
            #[allow(unreachable_patterns)]
            other => panic!("expected HTTP transport, got {:?}", other),
        }
    }

    #[test]
    fn test_default_is_http_on_3000() {
        let cfg = http_config(TransportConfig::default());
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
    }

    #[test]
    fn test_description() {
        let config = TransportConfig::Http(HttpConfig {
            port: 8081,
            host: "127.0.0.1".to_string(),
        });
        assert_eq!(config.description(), "HTTP on 127.0.0.1:8081");
    }

    #[test]
    fn test_from_env_defaults() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        let cfg = http_config(TransportConfig::from_env());
        assert_eq!(cfg.port, 3000);
        assert_eq!(cfg.host, "0.0.0.0");
    }

    #[test]
    fn test_port_wins_over_mcp_http_port() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("PORT", "8080");
            std::env::set_var("MCP_HTTP_PORT", "9090");
            std::env::set_var("MCP_HTTP_HOST", "127.0.0.1");
        }
        let cfg = http_config(TransportConfig::from_env());
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.host, "127.0.0.1");
        clear_env();
    }

    #[test]
    fn test_unparsable_port_falls_through() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("PORT", "not-a-port");
            std::env::set_var("MCP_HTTP_PORT", "9090");
        }
        assert_eq!(http_config(TransportConfig::from_env()).port, 9090);

        unsafe {
            std::env::set_var("MCP_HTTP_PORT", "70000");
        }
        assert_eq!(http_config(TransportConfig::from_env()).port, 3000);
        clear_env();
    }

    #[cfg(feature = "stdio")]
    #[test]
    fn test_stdio_selected_by_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        clear_env();
        unsafe {
            std::env::set_var("MCP_TRANSPORT", "STDIO");
            std::env::set_var("PORT", "8080");
        }
        let config = TransportConfig::from_env();
        assert!(matches!(config, TransportConfig::Stdio));
        assert_eq!(config.description(), "STDIO (MCP JSON-RPC)");
        clear_env();
    }
}
