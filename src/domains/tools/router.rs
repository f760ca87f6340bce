//! Tool Router - builds the rmcp ToolRouter from the registry.
//!
//! Every registered tool becomes a dynamic route that forwards to the
//! shared [`Dispatcher`], so STDIO calls get the same validation and
//! tracing as HTTP calls.

use std::sync::Arc;

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter},
    model::{CallToolResult, Content, Tool},
};
use serde_json::Value;

use super::{Dispatcher, ToolError, ToolHandler};

/// MCP tool model for a handler.
pub fn tool_model(handler: &dyn ToolHandler) -> Tool {
    let descriptor = handler.descriptor();
    Tool {
        name: descriptor.name.clone().into(),
        description: Some(descriptor.description.clone().into()),
        input_schema: handler.input_schema(),
        annotations: None,
        output_schema: None,
        icons: None,
        meta: None,
        title: None,
    }
}

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(dispatcher: Arc<Dispatcher>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    dispatcher
        .registry()
        .iter()
        .fold(ToolRouter::new(), |router, handler| {
            router.with_route(create_route(handler.clone(), dispatcher.clone()))
        })
}

fn create_route<S>(handler: Arc<dyn ToolHandler>, dispatcher: Arc<Dispatcher>) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(
        tool_model(handler.as_ref()),
        move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let handler = handler.clone();
            let dispatcher = dispatcher.clone();
            async move {
                let outcome = dispatcher.execute(handler.as_ref(), &args).await;
                to_call_result(outcome)
            }
            .boxed()
        },
    )
}

/// Map a dispatch outcome onto an MCP tool result.
///
/// Missing parameters become a protocol error; execution failures are
/// reported in-band with `is_error` set.
pub fn to_call_result(outcome: Result<Value, ToolError>) -> Result<CallToolResult, McpError> {
    match outcome {
        Ok(value) => {
            let text = serde_json::to_string_pretty(&value)
                .map_err(|e| McpError::internal_error(e.to_string(), None))?;
            Ok(CallToolResult {
                content: vec![Content::text(text)],
                structured_content: Some(value),
                is_error: Some(false),
                meta: None,
            })
        }
        Err(e) if e.is_bad_request() => Err(McpError::invalid_params(e.to_string(), None)),
        Err(e) => Ok(CallToolResult::error(vec![Content::text(e.to_string())])),
    }
}
