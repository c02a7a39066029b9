//! Completion client and tool-use loop

pub mod client;
pub mod converters;
pub mod messages;
pub mod parser;
pub mod tool_loop;

pub use client::{CompletionClient, OpenAiCompatibleClient, build_request_body};
pub use messages::{LlmMessage, MessageRole, ModelResponse, TokenUsage};
pub use parser::ResponseParser;
pub use tool_loop::ToolLoop;
