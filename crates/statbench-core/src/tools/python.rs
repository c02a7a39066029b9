//! `execute_python` tool backed by a code sandbox

use crate::sandbox::{CodeSandbox, PRELUDE_LIBRARIES};
use crate::tools::base::{Tool, ToolError};
use crate::tools::types::{RAW_ARGUMENTS_KEY, ToolCall, ToolParameter, ToolResult, ToolSchema};
use async_trait::async_trait;
use std::sync::{Arc, LazyLock};

pub const EXECUTE_PYTHON: &str = "execute_python";

static DESCRIPTION: LazyLock<String> = LazyLock::new(|| {
    format!(
        "Execute Python code for statistical calculations. Available libraries: {}. \
         Standard output is the only result returned. The code should print the final result.",
        PRELUDE_LIBRARIES
    )
});

/// Exposes a [`CodeSandbox`] to the model as a single-argument tool
pub struct ExecutePythonTool {
    sandbox: Arc<dyn CodeSandbox>,
}

impl ExecutePythonTool {
    pub fn new(sandbox: Arc<dyn CodeSandbox>) -> Self {
        Self { sandbox }
    }
}

#[async_trait]
impl Tool for ExecutePythonTool {
    fn name(&self) -> &str {
        EXECUTE_PYTHON
    }

    fn description(&self) -> &str {
        &DESCRIPTION
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(
            EXECUTE_PYTHON,
            self.description(),
            vec![ToolParameter::string(
                "code",
                "Python code to execute. Print your results.",
            )],
        )
    }

    async fn execute(&self, call: &ToolCall) -> Result<ToolResult, ToolError> {
        // Models occasionally send the bare snippet instead of a JSON object
        let code = call
            .get_string("code")
            .or_else(|| call.get_string(RAW_ARGUMENTS_KEY))
            .ok_or_else(|| ToolError::InvalidArguments("missing required argument 'code'".to_string()))?;

        let execution = self.sandbox.execute(&code).await;
        tracing::debug!(
            sandbox = self.sandbox.name(),
            success = execution.success,
            timed_out = execution.timed_out,
            "python snippet finished"
        );

        if execution.success {
            Ok(ToolResult::success(call, execution.output))
        } else {
            let error = execution
                .error
                .unwrap_or_else(|| "execution failed".to_string());
            Ok(ToolResult::failure(call, execution.output, error))
        }
    }
}
