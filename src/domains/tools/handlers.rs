//! Tool handler contract.
//!
//! Every tool publishes a [`ToolDescriptor`] (name, description, declared
//! parameters) and an async `execute` over the raw parameter mapping.
//! Descriptors are what discovery endpoints return; the executable part
//! never leaves the registry.

use std::sync::Arc;
use std::time::Duration;

use rmcp::model::JsonObject;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::ToolError;
use crate::core::config::ToolsConfig;

/// Incoming tool parameters, keyed by name.
pub type ParameterMap = serde_json::Map<String, Value>;

/// Declared JSON type of a parameter. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Object,
}

/// One declared tool parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub required: bool,
}

impl ParameterDescriptor {
    /// A parameter that must be present in every call.
    pub fn required(name: &str, description: &str, param_type: ParameterType) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            param_type,
            required: true,
        }
    }

    /// A parameter that may be omitted.
    pub fn optional(name: &str, description: &str, param_type: ParameterType) -> Self {
        Self {
            required: false,
            ..Self::required(name, description, param_type)
        }
    }
}

/// Public metadata of a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ParameterDescriptor>,
}

impl ToolDescriptor {
    pub fn new(name: &str, description: &str, parameters: Vec<ParameterDescriptor>) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }

    /// Names of the parameters declared `required`, in declaration order.
    pub fn required_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .filter(|p| p.required)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Trait implemented by every executable tool.
#[async_trait::async_trait]
pub trait ToolHandler: Send + Sync {
    /// Name, description and declared parameters.
    fn descriptor(&self) -> &ToolDescriptor;

    /// JSON schema of the typed parameters, for MCP clients.
    fn input_schema(&self) -> Arc<JsonObject>;

    /// Run the tool. Required parameters have already been checked.
    async fn execute(&self, params: &ParameterMap) -> Result<Value, ToolError>;

    /// Get the name of this tool.
    fn name(&self) -> &str {
        &self.descriptor().name
    }
}

/// Deserialize the raw mapping into a tool's typed parameters.
pub fn parse_params<P: DeserializeOwned>(params: &ParameterMap) -> Result<P, ToolError> {
    serde_json::from_value(Value::Object(params.clone()))
        .map_err(|e| ToolError::invalid_arguments(e.to_string()))
}

/// Sleep for `delay` when latency simulation is enabled.
pub async fn simulate_io(settings: ToolsConfig, delay: Duration) {
    if settings.simulate_latency {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_serialization() {
        let descriptor = ToolDescriptor::new(
            "demo",
            "Demo tool",
            vec![
                ParameterDescriptor::required("a", "first", ParameterType::String),
                ParameterDescriptor::optional("b", "second", ParameterType::Number),
            ],
        );
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "demo",
                "description": "Demo tool",
                "parameters": [
                    {"name": "a", "description": "first", "type": "string", "required": true},
                    {"name": "b", "description": "second", "type": "number", "required": false}
                ]
            })
        );
        assert_eq!(descriptor.required_names(), vec!["a"]);
    }

    #[derive(Debug, Deserialize)]
    struct Demo {
        text: String,
    }

    #[test]
    fn test_parse_params_type_mismatch() {
        let mut params = ParameterMap::new();
        params.insert("text".into(), json!(5));
        let err = parse_params::<Demo>(&params).unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));

        params.insert("text".into(), json!("ok"));
        assert_eq!(parse_params::<Demo>(&params).unwrap().text, "ok");
    }

    #[tokio::test]
    async fn test_simulate_io_disabled_returns_immediately() {
        let started = std::time::Instant::now();
        simulate_io(ToolsConfig::default(), Duration::from_secs(5)).await;
        assert!(started.elapsed() < Duration::from_secs(1));
    }
}
