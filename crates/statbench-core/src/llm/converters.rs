//! Conversion to the OpenAI chat-completions wire format

use crate::llm::messages::LlmMessage;
use crate::tools::ToolSchema;
use serde_json::{Value, json};

/// Message format converter
pub struct MessageConverter;

impl MessageConverter {
    /// Convert messages for the OpenAI format
    pub fn to_openai(messages: &[LlmMessage]) -> Vec<Value> {
        messages
            .iter()
            .map(|message| {
                let mut msg = json!({
                    "role": message.role.to_string(),
                    "content": message.content
                });

                if let Some(tool_calls) = message.tool_calls.as_ref().filter(|calls| !calls.is_empty()) {
                    let openai_tool_calls: Vec<Value> = tool_calls
                        .iter()
                        .map(|tc| {
                            json!({
                                "id": tc.id,
                                "type": "function",
                                "function": {
                                    "name": tc.name,
                                    "arguments": tc.arguments_json()
                                }
                            })
                        })
                        .collect();
                    msg["tool_calls"] = json!(openai_tool_calls);
                }

                if let Some(tool_call_id) = &message.tool_call_id {
                    msg["tool_call_id"] = json!(tool_call_id);
                }

                if let Some(name) = &message.name {
                    msg["name"] = json!(name);
                }

                msg
            })
            .collect()
    }
}

/// Tool format converter
pub struct ToolConverter;

impl ToolConverter {
    /// Convert tools for the OpenAI format
    pub fn to_openai(tools: &[ToolSchema]) -> Vec<Value> {
        tools.iter().map(ToolSchema::to_openai).collect()
    }
}
