//! Completion client for OpenAI-compatible chat endpoints

use crate::config::ProviderConfig;
use crate::error::{BenchError, BenchResult};
use crate::llm::converters::{MessageConverter, ToolConverter};
use crate::llm::messages::{LlmMessage, ModelResponse};
use crate::llm::parser::ResponseParser;
use crate::tools::ToolSchema;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, instrument};

/// Sends one chat-completion request and normalizes the reply
///
/// Transport and endpoint errors are returned as-is; there is no retry at this layer.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete a conversation
    ///
    /// `system_prompt`, when given, is sent before the conversation. Passing
    /// `tools` enables automatic tool choice; `None` omits tools entirely.
    async fn complete(
        &self,
        conversation: &[LlmMessage],
        model: &str,
        tools: Option<&[ToolSchema]>,
        system_prompt: Option<&str>,
    ) -> BenchResult<ModelResponse>;
}

/// Build the JSON body of a chat-completions request
pub fn build_request_body(
    conversation: &[LlmMessage],
    model: &str,
    tools: Option<&[ToolSchema]>,
    system_prompt: Option<&str>,
    max_tokens: u32,
    temperature: f64,
) -> Value {
    let mut messages = Vec::with_capacity(conversation.len() + 1);
    if let Some(system_prompt) = system_prompt {
        messages.push(LlmMessage::system(system_prompt));
    }
    messages.extend_from_slice(conversation);

    let mut request_body = json!({
        "model": model,
        "messages": MessageConverter::to_openai(&messages),
        "max_tokens": max_tokens,
        "temperature": temperature,
    });

    if let Some(tools) = tools.filter(|tools| !tools.is_empty()) {
        request_body["tools"] = json!(ToolConverter::to_openai(tools));
        request_body["tool_choice"] = json!("auto");
    }

    request_body
}

/// Client for OpenRouter and other OpenAI-compatible endpoints
pub struct OpenAiCompatibleClient {
    config: ProviderConfig,
    http_client: Client,
}

impl OpenAiCompatibleClient {
    /// Create a client; fails when no API key is configured
    pub fn new(config: ProviderConfig) -> BenchResult<Self> {
        if config.api_key().is_none() {
            return Err(BenchError::config(
                "API key is required. Set OPENROUTER_API_KEY or provider.api_key.",
            ));
        }

        let http_client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BenchError::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }

    /// Timeouts are reported with the configured limit, everything else as an HTTP failure
    fn transport_error(&self, error: reqwest::Error) -> BenchError {
        if error.is_timeout() {
            BenchError::timeout(self.config.request_timeout.as_secs())
        } else {
            BenchError::from(error)
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiCompatibleClient {
    #[instrument(skip(self, conversation, tools, system_prompt), fields(messages = conversation.len()), level = "debug")]
    async fn complete(
        &self,
        conversation: &[LlmMessage],
        model: &str,
        tools: Option<&[ToolSchema]>,
        system_prompt: Option<&str>,
    ) -> BenchResult<ModelResponse> {
        let request_body = build_request_body(
            conversation,
            model,
            tools,
            system_prompt,
            self.config.max_tokens,
            self.config.temperature,
        );

        let mut request = self.http_client.post(self.endpoint()).json(&request_body);

        if let Some(api_key) = self.config.api_key() {
            request = request.bearer_auth(api_key);
        }
        if let Some(referer) = &self.config.http_referer {
            request = request.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.config.app_title {
            request = request.header("X-Title", title);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BenchError::llm(format!(
                "API error (status {}): {}",
                status, error_text
            )));
        }

        let response_json: Value = response
            .json()
            .await
            .map_err(|e| BenchError::llm(format!("Failed to parse response: {}", e)))?;

        let parsed = ResponseParser::parse_openai(&response_json, model)?;
        debug!(
            tool_calls = parsed.tool_calls.len(),
            input_tokens = parsed.usage.input_tokens,
            output_tokens = parsed.usage.output_tokens,
            "completion received"
        );
        Ok(parsed)
    }
}
