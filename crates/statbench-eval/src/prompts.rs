//! System and judge prompt templates
//!
//! Templates are plain text with `{name}` placeholders. Substitution is a single
//! pass: values are never re-scanned, and unknown placeholders or JSON braces are
//! left as written.

use regex::{Captures, Regex};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

pub const SYSTEM_PROMPT_FILE: &str = "benchmark_system.txt";
pub const JUDGE_PROMPT_FILE: &str = "judge_prompt.txt";

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert statistician specializing in A/B testing.
Use the execute_python tool for calculations. State your final answer clearly.";

pub const DEFAULT_JUDGE_TEMPLATE: &str = r#"You are evaluating an LLM response to an A/B testing statistics question.

## Question
{question}

## Expected Answer
{expected_answer}

## Grading Rubric
{rubric}

## Key Concepts
{key_concepts}

## Response
{response}

## Tool Outputs
{tool_outputs}

Evaluate and respond with JSON only:
```json
{
    "score": <0.0-1.0>,
    "reasoning": "<explanation>",
    "key_concepts_found": ["concept1"],
    "key_concepts_missing": ["concept2"]
}
```"#;

static PLACEHOLDER: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\{(\w+)\}").ok());

/// Replace `{name}` placeholders with the matching value
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let Some(placeholder) = PLACEHOLDER.as_ref() else {
        return template.to_string();
    };

    placeholder
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            values
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Prompt templates for a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSource {
    pub system_prompt: String,
    pub judge_template: String,
}

impl Default for PromptSource {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            judge_template: DEFAULT_JUDGE_TEMPLATE.to_string(),
        }
    }
}

impl PromptSource {
    /// Read overrides from `prompts_dir`; missing or empty files keep the defaults
    pub fn load(prompts_dir: &Path) -> Self {
        let defaults = Self::default();
        Self {
            system_prompt: read_override(&prompts_dir.join(SYSTEM_PROMPT_FILE))
                .unwrap_or(defaults.system_prompt),
            judge_template: read_override(&prompts_dir.join(JUDGE_PROMPT_FILE))
                .unwrap_or(defaults.judge_template),
        }
    }
}

fn read_override(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    if content.trim().is_empty() {
        return None;
    }
    debug!("Using prompt override {:?}", path);
    Some(content)
}
