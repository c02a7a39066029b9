//! Bounded tool-use loop
//!
//! One attempt moves between two states: requesting a completion and executing the
//! calls it asked for. The loop ends when a completion carries no tool calls or
//! when `max_iterations` completions have asked for tools. In the second case one
//! more completion is requested with tools omitted, so at most
//! `max_iterations + 1` completions are made per attempt.

use crate::error::BenchResult;
use crate::llm::client::CompletionClient;
use crate::llm::messages::{LlmMessage, ModelResponse, TokenUsage};
use crate::tools::{ToolDispatcher, ToolResult};
use std::sync::Arc;
use tracing::{debug, warn};

/// Drives a model through tool rounds until it answers
#[derive(Clone)]
pub struct ToolLoop {
    client: Arc<dyn CompletionClient>,
    dispatcher: Arc<ToolDispatcher>,
    max_iterations: usize,
}

impl ToolLoop {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        dispatcher: Arc<ToolDispatcher>,
        max_iterations: usize,
    ) -> Self {
        Self {
            client,
            dispatcher,
            max_iterations,
        }
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// Run the loop for one attempt
    ///
    /// The returned response carries every tool result in call order and token
    /// usage summed over all completions. It never carries pending tool calls.
    pub async fn run(
        &self,
        conversation: Vec<LlmMessage>,
        model: &str,
        system_prompt: Option<&str>,
    ) -> BenchResult<ModelResponse> {
        let tools = self.dispatcher.schemas();
        let mut conversation = conversation;
        let mut history: Vec<ToolResult> = Vec::new();
        let mut usage = TokenUsage::default();

        for iteration in 0..self.max_iterations {
            let response = self
                .client
                .complete(&conversation, model, Some(tools.as_slice()), system_prompt)
                .await?;
            usage += response.usage;

            if !response.has_tool_calls() {
                debug!(model, iteration, tool_results = history.len(), "model answered");
                return Ok(finish(response, history, usage));
            }

            debug!(model, iteration, calls = response.tool_calls.len(), "executing tool calls");
            conversation.push(LlmMessage::assistant_with_tools(
                response.content.clone(),
                response.tool_calls.clone(),
            ));

            // Sequential: later calls may depend on earlier ones
            for call in &response.tool_calls {
                let result = self.dispatcher.dispatch(call).await;
                conversation.push(LlmMessage::tool(
                    result.message_content(),
                    call.id.clone(),
                    Some(call.name.clone()),
                ));
                history.push(result);
            }
        }

        debug!(model, max_iterations = self.max_iterations, "tool budget exhausted, forcing final answer");
        let mut response = self
            .client
            .complete(&conversation, model, None, system_prompt)
            .await?;
        usage += response.usage;

        if response.has_tool_calls() {
            warn!(
                model,
                ignored = response.tool_calls.len(),
                "final completion requested tools after they were disabled"
            );
            response.tool_calls.clear();
        }

        Ok(finish(response, history, usage))
    }
}

fn finish(mut response: ModelResponse, history: Vec<ToolResult>, usage: TokenUsage) -> ModelResponse {
    response.tool_results = history;
    response.usage = usage;
    response
}
