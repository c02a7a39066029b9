//! Tools the model can call during a question attempt

pub mod base;
pub mod python;
pub mod registry;
pub mod types;

pub use base::{BlockingTool, Tool, ToolError};
pub use python::{EXECUTE_PYTHON, ExecutePythonTool};
pub use registry::ToolDispatcher;
pub use types::{RAW_ARGUMENTS_KEY, ToolArguments, ToolCall, ToolParameter, ToolResult, ToolSchema};
