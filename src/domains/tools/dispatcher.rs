//! Tool dispatch: lookup, required-parameter check, execution and tracing.
//!
//! Both transports resolve tools with [`Dispatcher::find`] and run them
//! through [`Dispatcher::execute`], so validation and trace events behave
//! identically over HTTP and STDIO.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info, instrument};
use uuid::Uuid;

use super::validation::missing_required;
use super::{ParameterMap, ToolError, ToolHandler, ToolRegistry};
use crate::core::telemetry::{TraceEvent, TraceSink};

/// Executes registered tools.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ToolRegistry>,
    sink: Arc<dyn TraceSink>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ToolRegistry>, sink: Arc<dyn TraceSink>) -> Self {
        Self { registry, sink }
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    pub fn trace_sink(&self) -> &dyn TraceSink {
        self.sink.as_ref()
    }

    /// Look up a tool by name.
    pub fn find(&self, name: &str) -> Result<Arc<dyn ToolHandler>, ToolError> {
        self.registry.find(name)
    }

    /// Validate required parameters, then run the tool.
    ///
    /// A missing-parameter failure is reported before anything is traced.
    /// Once the tool starts, a `started` event is followed by exactly one
    /// `success` or `error` event with the same id.
    #[instrument(skip_all, fields(tool = tool.name()))]
    pub async fn execute(
        &self,
        tool: &dyn ToolHandler,
        params: &ParameterMap,
    ) -> Result<Value, ToolError> {
        let missing = missing_required(&tool.descriptor().parameters, params);
        if !missing.is_empty() {
            return Err(ToolError::MissingParameters(missing));
        }

        let id = Uuid::new_v4();
        let name = tool.name();
        let parameters = Value::Object(params.clone());
        info!(tool = name, execution = %id, "Executing tool");

        self.sink
            .record(TraceEvent::started(id, name, parameters.clone()));

        match tool.execute(params).await {
            Ok(output) => {
                self.sink
                    .record(TraceEvent::success(id, name, parameters, output.clone()));
                Ok(output)
            }
            Err(e) => {
                error!(tool = name, execution = %id, "Error executing tool: {}", e);
                self.sink
                    .record(TraceEvent::error(id, name, parameters, e.to_string()));
                Err(e)
            }
        }
    }
}
