//! Execution tracing sink.
//!
//! Tool executions report `started`, `success` and `error` events to an
//! optional external collector. Delivery happens on a detached task and
//! failures are only logged: a broken collector never fails a request.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

use super::config::TraceSinkConfig;

/// Lifecycle stage of a traced execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceStatus {
    Started,
    Success,
    Error,
}

/// Parameters attached to every event of an execution.
#[derive(Debug, Clone, Serialize)]
pub struct TraceMetadata {
    pub parameters: Value,
}

/// One execution event as posted to the collector.
#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    /// Shared by all events of the same execution.
    pub id: Uuid,
    /// `<tool>_execution`.
    pub name: String,
    pub status: TraceStatus,
    pub metadata: TraceMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl TraceEvent {
    fn new(id: Uuid, tool: &str, parameters: Value, status: TraceStatus) -> Self {
        Self {
            id,
            name: format!("{tool}_execution"),
            status,
            metadata: TraceMetadata { parameters },
            output: None,
            error: None,
            timestamp: Utc::now(),
        }
    }

    /// Event emitted right before a tool runs.
    pub fn started(id: Uuid, tool: &str, parameters: Value) -> Self {
        Self::new(id, tool, parameters, TraceStatus::Started)
    }

    /// Event emitted after a tool returned a result.
    pub fn success(id: Uuid, tool: &str, parameters: Value, output: Value) -> Self {
        Self {
            output: Some(output),
            ..Self::new(id, tool, parameters, TraceStatus::Success)
        }
    }

    /// Event emitted after a tool failed.
    pub fn error(id: Uuid, tool: &str, parameters: Value, error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(id, tool, parameters, TraceStatus::Error)
        }
    }
}

/// Destination for execution events.
pub trait TraceSink: Send + Sync {
    /// Report an event. Must not block and must not fail.
    fn record(&self, event: TraceEvent);

    /// Whether events actually leave the process.
    fn is_enabled(&self) -> bool;

    /// Collector location, for status reporting.
    fn host(&self) -> Option<&str> {
        None
    }
}

/// Sink used when no collector is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTraceSink;

impl TraceSink for NoopTraceSink {
    fn record(&self, event: TraceEvent) {
        debug!(event = %event.name, status = ?event.status, "trace sink disabled, dropping event");
    }

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Posts events as JSON to an HTTP collector.
pub struct HttpTraceSink {
    client: reqwest::Client,
    endpoint: String,
    public_key: Option<String>,
    secret_key: Option<String>,
}

impl HttpTraceSink {
    /// Create a sink posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            public_key: None,
            secret_key: None,
        }
    }

    /// Authenticate with basic auth (public key as user, secret as password).
    pub fn with_credentials(mut self, public_key: Option<String>, secret_key: Option<String>) -> Self {
        self.public_key = public_key;
        self.secret_key = secret_key;
        self
    }

    /// Spawn delivery of one event. `None` outside a Tokio runtime, in
    /// which case the event is dropped.
    fn deliver(&self, event: TraceEvent) -> Option<JoinHandle<()>> {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("No async runtime available, dropping trace event {}", event.name);
            return None;
        };

        let mut request = self.client.post(&self.endpoint).json(&event);
        if let Some(user) = &self.public_key {
            request = request.basic_auth(user, self.secret_key.as_ref());
        }

        Some(runtime.spawn(async move {
            match request.send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!(
                        "Trace sink rejected {} ({:?}): HTTP {}",
                        event.name,
                        event.status,
                        response.status()
                    );
                }
                Ok(_) => debug!("Trace event {} ({:?}) delivered", event.name, event.status),
                Err(e) => warn!("Failed to deliver trace event {}: {}", event.name, e),
            }
        }))
    }
}

impl TraceSink for HttpTraceSink {
    fn record(&self, event: TraceEvent) {
        self.deliver(event);
    }

    fn is_enabled(&self) -> bool {
        true
    }

    fn host(&self) -> Option<&str> {
        Some(&self.endpoint)
    }
}

/// Build the sink described by the configuration.
pub fn trace_sink_from_config(config: &TraceSinkConfig) -> Arc<dyn TraceSink> {
    match &config.endpoint {
        Some(endpoint) => Arc::new(
            HttpTraceSink::new(endpoint.clone())
                .with_credentials(config.public_key.clone(), config.secret_key.clone()),
        ),
        None => Arc::new(NoopTraceSink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::ToolsConfig;
    use crate::domains::catalog::Catalog;
    use crate::domains::tools::{Dispatcher, ToolRegistry};
    use serde_json::json;

    #[test]
    fn test_event_serialization() {
        let id = Uuid::new_v4();
        let event = TraceEvent::success(id, "translation", json!({"text": "Hello"}), json!(1));
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["name"], "translation_execution");
        assert_eq!(value["status"], "success");
        assert_eq!(value["metadata"]["parameters"]["text"], "Hello");
        assert_eq!(value["output"], 1);
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_error_event_carries_message() {
        let event = TraceEvent::error(Uuid::new_v4(), "propertyAnalysis", json!({}), "boom");
        assert_eq!(event.status, TraceStatus::Error);
        assert_eq!(event.error.as_deref(), Some("boom"));
        assert!(event.output.is_none());
    }

    #[test]
    fn test_sink_from_config() {
        let disabled = trace_sink_from_config(&TraceSinkConfig::default());
        assert!(!disabled.is_enabled());
        assert!(disabled.host().is_none());

        let enabled = trace_sink_from_config(&TraceSinkConfig {
            endpoint: Some("http://127.0.0.1:9/ingest".to_string()),
            ..Default::default()
        });
        assert!(enabled.is_enabled());
        assert_eq!(enabled.host(), Some("http://127.0.0.1:9/ingest"));
    }

    #[tokio::test]
    async fn test_unreachable_collector_is_harmless() {
        let sink = HttpTraceSink::new("http://127.0.0.1:9/ingest");
        let delivery = sink
            .deliver(TraceEvent::started(Uuid::new_v4(), "translation", json!({})))
            .unwrap();
        // The delivery task swallows the connection error instead of panicking.
        assert!(delivery.await.is_ok());
    }

    #[tokio::test]
    async fn test_dispatch_succeeds_with_unreachable_collector() {
        let registry =
            ToolRegistry::with_default_tools(&Catalog::in_memory(), ToolsConfig::default())
                .unwrap();
        let sink = Arc::new(HttpTraceSink::new("http://127.0.0.1:9/ingest"));
        let dispatcher = Dispatcher::new(Arc::new(registry), sink);

        let tool = dispatcher.find("translation").unwrap();
        let params = json!({"text": "Hello", "targetLanguage": "ar"});
        let output = dispatcher
            .execute(tool.as_ref(), params.as_object().unwrap())
            .await
            .unwrap();
        assert_eq!(output["translatedText"], "مرحبا");
    }

    #[test]
    fn test_record_outside_runtime_is_dropped() {
        let sink = HttpTraceSink::new("http://127.0.0.1:9/ingest");
        let delivery = sink.deliver(TraceEvent::started(Uuid::new_v4(), "translation", json!({})));
        assert!(delivery.is_none());
        sink.record(TraceEvent::started(Uuid::new_v4(), "translation", json!({})));
    }
}
