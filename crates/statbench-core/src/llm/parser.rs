//! Parsing of OpenAI-compatible completion responses

use crate::error::{BenchError, BenchResult};
use crate::llm::messages::{ModelResponse, TokenUsage};
use crate::tools::ToolCall;
use serde_json::Value;

/// Response parser
pub struct ResponseParser;

impl ResponseParser {
    /// Parse an OpenAI chat-completions response body
    ///
    /// `requested_model` is reported when the body does not name a model.
    pub fn parse_openai(response: &Value, requested_model: &str) -> BenchResult<ModelResponse> {
        // Some gateways answer 200 with an error object
        if let Some(error) = response.get("error").filter(|e| !e.is_null()) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(BenchError::llm(format!("Endpoint returned error: {}", message)));
        }

        let choice = response
            .get("choices")
            .and_then(Value::as_array)
            .and_then(|choices| choices.first())
            .ok_or_else(|| BenchError::llm("Response contained no choices"))?;
        let message = &choice["message"];

        let content = message["content"].as_str().unwrap_or("").to_string();

        let tool_calls = message["tool_calls"]
            .as_array()
            .map(|calls| calls.iter().filter_map(Self::parse_tool_call).collect())
            .unwrap_or_default();

        let usage = response
            .get("usage")
            .map(|usage| {
                TokenUsage::new(
                    usage["prompt_tokens"].as_u64().unwrap_or(0),
                    usage["completion_tokens"].as_u64().unwrap_or(0),
                )
            })
            .unwrap_or_default();

        Ok(ModelResponse {
            content,
            tool_calls,
            model: response["model"]
                .as_str()
                .unwrap_or(requested_model)
                .to_string(),
            usage,
            stop_reason: choice["finish_reason"].as_str().map(str::to_string),
            tool_results: Vec::new(),
        })
    }

    fn parse_tool_call(call: &Value) -> Option<ToolCall> {
        let function = call.get("function")?.as_object()?;
        let name = function.get("name").and_then(Value::as_str).unwrap_or("");

        let id = call["id"]
            .as_str()
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| format!("call_{}", uuid::Uuid::new_v4().simple()));

        Some(match function.get("arguments") {
            Some(Value::String(raw)) => ToolCall::from_wire(id, name, raw),
            Some(Value::Object(map)) => ToolCall::new(
                id,
                name,
                map.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
            ),
            Some(other) if !other.is_null() => ToolCall::from_wire(id, name, &other.to_string()),
            _ => ToolCall::from_wire(id, name, ""),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::RAW_ARGUMENTS_KEY;
    use serde_json::json;

    #[test]
    fn test_parse_text_response() {
        let body = json!({
            "model": "z-ai/glm-4.5-air:free",
            "choices": [{"message": {"role": "assistant", "content": "The answer is 64"}, "finish_reason": "stop"}],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        });
        let response = ResponseParser::parse_openai(&body, "requested").unwrap();
        assert_eq!(response.content, "The answer is 64");
        assert_eq!(response.model, "z-ai/glm-4.5-air:free");
        assert_eq!(response.usage, TokenUsage::new(12, 7));
        assert_eq!(response.stop_reason.as_deref(), Some("stop"));
        assert!(response.tool_calls.is_empty());
    }

    #[test]
    fn test_parse_tool_calls_and_raw_arguments() {
        let body = json!({
            "choices": [{
                "message": {
                    "content": null,
                    "tool_calls": [
                        {"id": "call_a", "type": "function", "function": {"name": "execute_python", "arguments": "{\"code\": \"print(2)\"}"}},
                        {"type": "function", "function": {"name": "execute_python", "arguments": "print(3"}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        });
        let response = ResponseParser::parse_openai(&body, "m").unwrap();
        assert_eq!(response.content, "");
        assert_eq!(response.model, "m");
        assert_eq!(response.usage, TokenUsage::default());
        assert_eq!(response.tool_calls.len(), 2);
        assert_eq!(response.tool_calls[0].id, "call_a");
        assert_eq!(response.tool_calls[0].get_string("code").as_deref(), Some("print(2)"));
        assert!(response.tool_calls[1].id.starts_with("call_"));
        assert_eq!(
            response.tool_calls[1].get_string(RAW_ARGUMENTS_KEY).as_deref(),
            Some("print(3")
        );
    }

    #[test]
    fn test_no_choices_is_error() {
        let err = ResponseParser::parse_openai(&json!({"choices": []}), "m").unwrap_err();
        assert!(matches!(err, BenchError::Llm(_)));
    }

    #[test]
    fn test_error_object_is_error() {
        let body = json!({"error": {"message": "rate limited", "code": 429}});
        let err = ResponseParser::parse_openai(&body, "m").unwrap_err();
        assert!(err.to_string().contains("rate limited"));
    }
}
