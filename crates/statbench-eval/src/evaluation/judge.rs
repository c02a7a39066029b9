//! Judge-model scoring
//!
//! The judge sees the question, ground truth, rubric, the candidate response and
//! a transcript of every tool call in order. Its reply is parsed leniently: a
//! reply that cannot be parsed scores zero instead of failing the question.

use regex::Regex;
use serde_json::Value;
use statbench_core::error::BenchResult;
use statbench_core::llm::{CompletionClient, LlmMessage, ModelResponse};
use statbench_core::tools::ToolResult;
use std::sync::{Arc, LazyLock};
use tracing::{debug, instrument, warn};

use super::types::JudgeEvaluation;
use crate::prompts::{DEFAULT_JUDGE_TEMPLATE, fill_template};
use crate::questions::Question;

pub const JUDGE_SYSTEM_PROMPT: &str = "You are an expert evaluator. Respond with JSON only.";

const DEFAULT_RUBRIC: &str = "Evaluate correctness and explanation quality";
const NO_TOOL_CALLS: &str = "No tool calls made";
const RAW_REPLY_PREVIEW_CHARS: usize = 200;

static FENCED_JSON: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?s)```json\s*(.*?)\s*```").ok());
static BRACED_JSON: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// Scores responses with a secondary model
pub struct JudgeEvaluator {
    client: Arc<dyn CompletionClient>,
    model: String,
    template: String,
}

impl JudgeEvaluator {
    pub fn new(client: Arc<dyn CompletionClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            template: DEFAULT_JUDGE_TEMPLATE.to_string(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Render the judge prompt for one response
    pub fn render_prompt(&self, question: &Question, response: &ModelResponse) -> String {
        let expected_answer = question.expected_answer.to_string();
        let rubric = question
            .evaluation
            .rubric
            .as_deref()
            .filter(|rubric| !rubric.trim().is_empty())
            .unwrap_or(DEFAULT_RUBRIC);
        let key_concepts = question.evaluation.key_concepts.join(", ");
        let tool_outputs = format_tool_outputs(&response.tool_results);

        fill_template(&self.template, &[
            ("question", question.prompt.as_str()),
            ("expected_answer", expected_answer.as_str()),
            ("rubric", rubric),
            ("key_concepts", key_concepts.as_str()),
            ("response", response.content.as_str()),
            ("tool_outputs", tool_outputs.as_str()),
        ])
    }

    /// Ask the judge model for a verdict
    ///
    /// Transport errors propagate; an unparseable reply yields a zero score.
    #[instrument(skip_all, fields(question = %question.id, judge = %self.model))]
    pub async fn evaluate(&self, question: &Question, response: &ModelResponse) -> BenchResult<JudgeEvaluation> {
        let prompt = self.render_prompt(question, response);
        let reply = self
            .client
            .complete(&[LlmMessage::user(prompt)], &self.model, None, Some(JUDGE_SYSTEM_PROMPT))
            .await?;

        let verdict = parse_judge_reply(&reply.content);
        debug!(score = verdict.score, "judge verdict");
        Ok(verdict)
    }
}

/// Flatten the tool history into the judge transcript
pub fn format_tool_outputs(results: &[ToolResult]) -> String {
    if results.is_empty() {
        return NO_TOOL_CALLS.to_string();
    }

    results
        .iter()
        .map(|result| {
            format!(
                "Tool: {}\nInput: {}\nOutput: {}",
                result.tool_name,
                result.input_json(),
                result.message_content()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a judge reply: fenced JSON block, then the outermost braces, then the whole text
pub fn parse_judge_reply(content: &str) -> JudgeEvaluation {
    let candidate = FENCED_JSON
        .as_ref()
        .and_then(|re| re.captures(content))
        .and_then(|caps| caps.get(1))
        .or_else(|| BRACED_JSON.as_ref().and_then(|re| re.find(content)))
        .map(|m| m.as_str())
        .unwrap_or(content);

    match parse_verdict(candidate) {
        Some(verdict) => verdict,
        None => {
            let preview: String = content.chars().take(RAW_REPLY_PREVIEW_CHARS).collect();
            warn!("Judge reply could not be parsed");
            JudgeEvaluation::new(0.0, format!("Failed to parse judge response: {}", preview))
        }
    }
}

fn parse_verdict(json: &str) -> Option<JudgeEvaluation> {
    let value: Value = serde_json::from_str(json.trim()).ok()?;
    let object = value.as_object()?;

    let score = match object.get("score") {
        None | Some(Value::Null) => 0.0,
        Some(Value::Number(number)) => number.as_f64()?,
        Some(Value::String(text)) => text.trim().parse::<f64>().ok()?,
        Some(_) => return None,
    };

    let strings = |key: &str| -> Vec<String> {
        object
            .get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    };

    let mut verdict = JudgeEvaluation::new(
        score,
        object
            .get("reasoning")
            .and_then(Value::as_str)
            .unwrap_or_default(),
    );
    verdict.key_concepts_found = strings("key_concepts_found");
    verdict.key_concepts_missing = strings("key_concepts_missing");
    Some(verdict)
}
