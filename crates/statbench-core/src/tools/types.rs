//! Tool-related type definitions

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Argument mapping of a tool call
pub type ToolArguments = BTreeMap<String, Value>;

/// Argument key holding the unparsed payload when a call's arguments are not valid JSON
pub const RAW_ARGUMENTS_KEY: &str = "raw";

/// A tool call requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier the tool-response turn must echo back
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Arguments to pass to the tool
    pub arguments: ToolArguments,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: ToolArguments) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }

    /// Build a call from the wire form, where arguments arrive as a JSON string
    ///
    /// Payloads that are not a JSON object are kept verbatim under `"raw"` so the
    /// call is not dropped.
    pub fn from_wire(id: impl Into<String>, name: impl Into<String>, raw_arguments: &str) -> Self {
        if raw_arguments.trim().is_empty() {
            return Self::new(id, name, ToolArguments::new());
        }
        let arguments = match serde_json::from_str::<Value>(raw_arguments) {
            Ok(Value::Object(map)) => map.into_iter().collect(),
            _ => {
                let mut arguments = ToolArguments::new();
                arguments.insert(
                    RAW_ARGUMENTS_KEY.to_string(),
                    Value::String(raw_arguments.to_string()),
                );
                arguments
            }
        };
        Self::new(id, name, arguments)
    }

    /// Get a typed argument value
    pub fn get_argument<T>(&self, key: &str) -> Option<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.arguments
            .get(key)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get_argument::<String>(key)
    }

    /// Arguments as the JSON string sent back on the wire
    pub fn arguments_json(&self) -> String {
        serde_json::to_string(&self.arguments).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Result of one tool execution
///
/// Appended to the per-attempt history in call order and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool call ID this result answers
    pub call_id: String,
    /// Name of the tool that was executed
    pub tool_name: String,
    /// Arguments the tool was called with
    pub input: ToolArguments,
    /// Output text
    pub output: String,
    pub success: bool,
    pub error: Option<String>,
    /// Execution time in milliseconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful tool result
    pub fn success(call: &ToolCall, output: impl Into<String>) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            input: call.arguments.clone(),
            output: output.into(),
            success: true,
            error: None,
            execution_time_ms: None,
        }
    }

    /// Create a failed tool result that still carries whatever output was produced
    pub fn failure(call: &ToolCall, output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            input: call.arguments.clone(),
            output: output.into(),
            success: false,
            error: Some(error.into()),
            execution_time_ms: None,
        }
    }

    /// Create a failed tool result with no output
    pub fn error(call: &ToolCall, error: impl Into<String>) -> Self {
        Self::failure(call, String::new(), error)
    }

    /// Add execution time
    pub fn with_execution_time(mut self, time_ms: u64) -> Self {
        self.execution_time_ms = Some(time_ms);
        self
    }

    /// Text of the tool-response turn shown to the model
    pub fn message_content(&self) -> String {
        if self.success {
            return self.output.clone();
        }
        let error = self.error.as_deref().unwrap_or("tool failed");
        let error = if error.starts_with("Error:") {
            error.to_string()
        } else {
            format!("Error: {}", error)
        };
        if self.output.trim().is_empty() {
            error
        } else {
            format!("{}\n{}", self.output, error)
        }
    }

    /// Arguments rendered as JSON for transcripts
    pub fn input_json(&self) -> String {
        serde_json::to_string(&self.input).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Parameter definition for a tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub description: String,
    /// JSON schema type (string, number, boolean, object, array)
    pub param_type: String,
    pub required: bool,
}

impl ToolParameter {
    /// Create a required string parameter
    pub fn string<S: Into<String>>(name: S, description: S) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            param_type: "string".to_string(),
            required: true,
        }
    }
}

/// JSON schema for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    /// Input parameters schema
    pub parameters: Value,
}

impl ToolSchema {
    /// Create a new tool schema
    pub fn new<S: Into<String>>(name: S, description: S, parameters: Vec<ToolParameter>) -> Self {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in parameters {
            if param.required {
                required.push(param.name.clone());
            }
            properties.insert(
                param.name,
                serde_json::json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
        }

        Self {
            name: name.into(),
            description: description.into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required
            }),
        }
    }

    /// OpenAI function-tool definition
    pub fn to_openai(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_wire_parses_object() {
        let call = ToolCall::from_wire("call_1", "execute_python", r#"{"code": "print(1)"}"#);
        assert_eq!(call.get_string("code").as_deref(), Some("print(1)"));
    }

    #[test]
    fn test_from_wire_keeps_unparseable_payload() {
        let call = ToolCall::from_wire("call_1", "execute_python", "print(1)");
        assert_eq!(call.get_string(RAW_ARGUMENTS_KEY).as_deref(), Some("print(1)"));
        assert_eq!(call.get_string("code"), None);
    }

    #[test]
    fn test_from_wire_empty_payload() {
        let call = ToolCall::from_wire("call_1", "noop", "");
        assert!(call.arguments.is_empty());
    }

    #[test]
    fn test_failure_message_content() {
        let call = ToolCall::from_wire("c", "execute_python", "{}");
        let result = ToolResult::failure(&call, "partial", "Error: NameError: x");
        assert_eq!(result.message_content(), "partial\nError: NameError: x");
        let result = ToolResult::error(&call, "Disallowed operation: import os");
        assert_eq!(result.message_content(), "Error: Disallowed operation: import os");
    }

    #[test]
    fn test_schema_openai_shape() {
        let schema = ToolSchema::new(
            "execute_python",
            "Run code",
            vec![ToolParameter::string("code", "Python code")],
        );
        assert_eq!(
            schema.to_openai(),
            json!({
                "type": "function",
                "function": {
                    "name": "execute_python",
                    "description": "Run code",
                    "parameters": {
                        "type": "object",
                        "properties": {"code": {"type": "string", "description": "Python code"}},
                        "required": ["code"]
                    }
                }
            })
        );
    }

    #[test]
    fn test_schema_lists_only_required_parameters() {
        let hint = ToolParameter {
            required: false,
            ..ToolParameter::string("hint", "Free-form note")
        };
        let schema = ToolSchema::new(
            "execute_python",
            "Run code",
            vec![ToolParameter::string("code", "Python code"), hint],
        );
        assert_eq!(schema.parameters["required"], json!(["code"]));
        assert_eq!(schema.parameters["properties"]["hint"]["type"], "string");
    }
}
