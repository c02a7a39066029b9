//! Numeric answer extraction from free text
//!
//! Patterns are tried in priority order. Within the first pattern that yields
//! a parseable number, the last match wins, since models tend to restate a
//! refined answer at the end.

use regex::Regex;
use statbench_core::llm::ModelResponse;
use std::sync::LazyLock;

static ANSWER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // "final answer is", "equals", "="
        r"(?i)(?:final answer|answer is|result is|equals?|=)[:\s]*\$?([+-]?\d+\.?\d*)",
        r"(?i)(?:approximately|≈|about)[:\s]*\$?([+-]?\d+\.?\d*)",
        // **42**
        r"\*\*\$?([+-]?\d+\.?\d*)\*\*",
        // trailing "...: 42"
        r":\s*\$?([+-]?\d+\.?\d*)\s*$",
        r"([+-]?\d+\.?\d*)\s*%",
        r"(?i)(?:sample size|n\s*=)[:\s]*([+-]?\d+\.?\d*)",
        r"(?i)(?:p-value|p\s*=)[:\s]*([+-]?\d+\.?\d*)",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

static ANY_NUMBER: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"[+-]?\d+\.?\d*").ok());

/// Pulls a candidate numeric answer out of model output
pub struct AnswerExtractor;

impl AnswerExtractor {
    /// Extract a number from text
    pub fn extract(text: &str) -> Option<f64> {
        if text.trim().is_empty() {
            return None;
        }

        for pattern in ANSWER_PATTERNS.iter() {
            let last = pattern
                .captures_iter(text)
                .filter_map(|caps| caps.get(1))
                .last();
            if let Some(value) = last.and_then(|m| m.as_str().parse::<f64>().ok()) {
                return Some(value);
            }
        }

        ANY_NUMBER
            .as_ref()?
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<f64>().ok())
            .filter(|value| !looks_like_year(*value))
            .last()
    }

    /// Extract from the response text, falling back to tool outputs in call order
    pub fn extract_from_response(response: &ModelResponse) -> Option<f64> {
        Self::extract(&response.content).or_else(|| {
            response
                .tool_results
                .iter()
                .find_map(|result| Self::extract(&result.output))
        })
    }
}

fn looks_like_year(value: f64) -> bool {
    (1900.0..=2100.0).contains(&value) && value.fract() == 0.0
}
