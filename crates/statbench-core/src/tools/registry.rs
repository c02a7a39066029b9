//! Tool registry and dispatcher

use crate::tools::base::{BlockingTool, Tool, ToolError};
use crate::tools::types::{ToolCall, ToolResult, ToolSchema};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

#[derive(Clone)]
enum Handler {
    Async(Arc<dyn Tool>),
    Blocking(Arc<dyn BlockingTool>),
}

impl Handler {
    fn schema(&self) -> ToolSchema {
        match self {
            Handler::Async(tool) => tool.schema(),
            Handler::Blocking(tool) => tool.schema(),
        }
    }
}

/// Maps tool names to handlers and executes calls
///
/// Dispatch never fails: unknown tools, invalid arguments and handler errors all
/// come back as failed [`ToolResult`]s.
#[derive(Clone, Default)]
pub struct ToolDispatcher {
    handlers: HashMap<String, Handler>,
    order: Vec<String>,
}

impl ToolDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a suspending tool, replacing any tool with the same name
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.insert(name, Handler::Async(tool));
    }

    /// Register a blocking tool, replacing any tool with the same name
    pub fn register_blocking(&mut self, tool: Arc<dyn BlockingTool>) {
        let name = tool.name().to_string();
        self.insert(name, Handler::Blocking(tool));
    }

    fn insert(&mut self, name: String, handler: Handler) {
        if self.handlers.insert(name.clone(), handler).is_none() {
            self.order.push(name);
        }
    }

    /// Check if a tool is registered
    pub fn has_tool(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Tool names in registration order
    pub fn tool_names(&self) -> &[String] {
        &self.order
    }

    /// Tool definitions in registration order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.order
            .iter()
            .filter_map(|name| self.handlers.get(name))
            .map(Handler::schema)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Execute one call
    pub async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        let Some(handler) = self.handlers.get(&call.name) else {
            warn!(tool = %call.name, "model requested unknown tool");
            return ToolResult::failure(
                call,
                format!("Unknown tool: {}", call.name),
                ToolError::NotFound(call.name.clone()).to_string(),
            );
        };

        debug!(tool = %call.name, call_id = %call.id, "dispatching tool call");
        match handler {
            Handler::Async(tool) => tool.execute_with_timing(call).await,
            Handler::Blocking(tool) => {
                let tool = Arc::clone(tool);
                let owned_call = call.clone();
                let start_time = Instant::now();
                let joined = tokio::task::spawn_blocking(move || tool.execute(&owned_call)).await;
                let result = match joined {
                    Ok(Ok(result)) => result,
                    Ok(Err(err)) => ToolResult::error(call, err.to_string()),
                    Err(err) => ToolResult::error(call, ToolError::Join(err.to_string()).to_string()),
                };
                result.with_execution_time(start_time.elapsed().as_millis() as u64)
            }
        }
    }
}

impl std::fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("tools", &self.order)
            .finish()
    }
}
