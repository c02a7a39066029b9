//! Tool traits and errors

use crate::tools::types::{ToolCall, ToolResult, ToolSchema};
use async_trait::async_trait;
use std::time::Instant;

/// Error type for tool operations
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Invalid arguments provided to the tool
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Tool execution failed
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// Tool not found
    #[error("Tool '{0}' not found")]
    NotFound(String),

    /// Blocking handler panicked or was cancelled
    #[error("Tool task failed: {0}")]
    Join(String),
}

/// A tool whose handler suspends, such as one waiting on a child process
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name the model calls the tool by
    fn name(&self) -> &str;

    /// Description for the model
    fn description(&self) -> &str;

    /// JSON schema for input parameters
    fn schema(&self) -> ToolSchema;

    /// Execute the tool
    ///
    /// # Errors
    ///
    /// Returns `ToolError` if arguments are invalid or the handler cannot run at all.
    /// A handler that ran and failed should return `Ok` with a failed `ToolResult`.
    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;

    /// Execute the tool with timing, folding errors into a failed result
    async fn execute_with_timing(&self, call: &ToolCall) -> ToolResult {
        let start_time = Instant::now();
        let result = match self.execute(call).await {
            Ok(result) => result,
            Err(err) => ToolResult::error(call, err.to_string()),
        };
        result.with_execution_time(start_time.elapsed().as_millis() as u64)
    }
}

/// A tool whose handler blocks the calling thread
///
/// The dispatcher runs these on the blocking thread pool.
pub trait BlockingTool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn schema(&self) -> ToolSchema;

    fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError>;
}
