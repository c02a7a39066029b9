//! Statbench core library
//!
//! The pieces a benchmark run drives for every question attempt:
//!
//! - [`sandbox`]: runs a model-written Python snippet under a denylist, a wall-clock
//!   timeout and a memory ceiling, either in a throwaway container or a local subprocess
//! - [`tools`]: the tool registry/dispatcher and the `execute_python` tool
//! - [`llm`]: the OpenAI-compatible completion client and the bounded tool-use loop
//! - [`config`]: layered configuration (defaults, TOML file, environment)

pub mod config;
pub mod error;
pub mod llm;
pub mod sandbox;
pub mod tools;

pub use config::{BenchConfig, load_config};
pub use error::{BenchError, BenchResult};
pub use llm::{
    CompletionClient, LlmMessage, MessageRole, ModelResponse, OpenAiCompatibleClient, TokenUsage,
    ToolLoop,
};
pub use sandbox::{CodeSandbox, ExecutionResult, select_sandbox};
pub use tools::{ExecutePythonTool, ToolCall, ToolDispatcher, ToolResult, ToolSchema};
