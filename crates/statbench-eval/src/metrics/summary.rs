//! Per-model aggregation

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::{ModelRun, QuestionResult};
use crate::questions::{Category, Difficulty};

/// Summary statistics for one model
///
/// Accuracy figures are means over successful attempts only; failed attempts
/// count toward `failed` and elapsed time but not toward scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Full identifier as passed to the endpoint
    pub model_id: String,
    /// Part before the first `/`, or `unknown`
    pub provider: String,
    /// Part after the first `/`
    pub model: String,
    pub total_questions: usize,
    pub successful: usize,
    pub failed: usize,
    pub overall_accuracy: f64,
    pub numeric_accuracy: f64,
    pub explanation_accuracy: f64,
    pub by_category: BTreeMap<Category, f64>,
    pub by_difficulty: BTreeMap<Difficulty, f64>,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub total_time_seconds: f64,
}

impl ModelSummary {
    pub fn from_run(run: &ModelRun) -> Self {
        let (provider, model) = split_model_id(&run.model);
        let scored: Vec<&QuestionResult> = run
            .results
            .iter()
            .filter(|r| r.success && r.evaluation.is_some())
            .collect();

        let evaluations = || scored.iter().filter_map(|r| r.evaluation.as_ref());

        let mut by_category: BTreeMap<Category, Vec<f64>> = BTreeMap::new();
        let mut by_difficulty: BTreeMap<Difficulty, Vec<f64>> = BTreeMap::new();
        for result in &scored {
            if let Some(score) = result.overall_score() {
                by_category.entry(result.category).or_default().push(score);
                by_difficulty.entry(result.difficulty).or_default().push(score);
            }
        }

        let (input_tokens, output_tokens) = run.results.iter().fold((0, 0), |(input, output), r| {
            let usage = r.usage();
            (input + usage.input_tokens, output + usage.output_tokens)
        });

        Self {
            model_id: run.model.clone(),
            provider,
            model,
            total_questions: run.results.len(),
            successful: scored.len(),
            failed: run.results.len() - scored.len(),
            overall_accuracy: mean(evaluations().map(|e| e.overall_score)),
            numeric_accuracy: mean(evaluations().map(|e| e.numeric_score)),
            explanation_accuracy: mean(evaluations().map(|e| e.explanation_score)),
            by_category: by_category
                .into_iter()
                .map(|(k, scores)| (k, mean(scores)))
                .collect(),
            by_difficulty: by_difficulty
                .into_iter()
                .map(|(k, scores)| (k, mean(scores)))
                .collect(),
            input_tokens,
            output_tokens,
            total_time_seconds: run.results.iter().map(|r| r.elapsed_seconds).sum(),
        }
    }

    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Split `provider/model`; identifiers without a `/` have an unknown provider
pub fn split_model_id(model_id: &str) -> (String, String) {
    match model_id.split_once('/') {
        Some((provider, model)) => (provider.to_string(), model.to_string()),
        None => ("unknown".to_string(), model_id.to_string()),
    }
}

fn mean(values: impl IntoIterator<Item = f64>) -> f64 {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Evaluation;
    use crate::questions::{ExpectedAnswer, Question};
    use statbench_core::llm::{ModelResponse, TokenUsage};
    use std::time::Duration;

    fn question(id: &str, category: Category, difficulty: Difficulty) -> Question {
        Question::new(id, category, difficulty, "q", ExpectedAnswer::Boolean { value: true })
    }

    fn scored(q: &Question, overall: f64, numeric: f64, explanation: f64) -> QuestionResult {
        QuestionResult::succeeded(
            q,
            ModelResponse::new("a", "m").with_usage(TokenUsage::new(100, 10)),
            Evaluation::new(overall, numeric, explanation),
            Duration::from_millis(1500),
        )
    }

    #[test]
    fn test_split_model_id() {
        assert_eq!(
            split_model_id("meta-llama/llama-3.3-70b-instruct:free"),
            ("meta-llama".to_string(), "llama-3.3-70b-instruct:free".to_string())
        );
        assert_eq!(split_model_id("a/b/c"), ("a".to_string(), "b/c".to_string()));
        assert_eq!(split_model_id("local"), ("unknown".to_string(), "local".to_string()));
    }

    #[test]
    fn test_summary_from_run() {
        let power_easy = question("p1", Category::PowerAnalysis, Difficulty::Easy);
        let power_hard = question("p2", Category::PowerAnalysis, Difficulty::Hard);
        let effect_easy = question("e1", Category::EffectSize, Difficulty::Easy);

        let run = ModelRun::new(
            "openai/gpt-oss-20b:free",
            vec![
                scored(&power_easy, 1.0, 1.0, 0.0),
                scored(&power_hard, 0.5, 0.0, 0.5),
                QuestionResult::failed(&effect_easy, "LLM error: timeout", Duration::from_secs(3)),
            ],
        );
        let summary = run.summary();

        assert_eq!(summary.provider, "openai");
        assert_eq!(summary.model, "gpt-oss-20b:free");
        assert_eq!(summary.total_questions, 3);
        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.overall_accuracy, 0.75);
        assert_eq!(summary.numeric_accuracy, 0.5);
        assert_eq!(summary.explanation_accuracy, 0.25);
        assert_eq!(summary.by_category.get(&Category::PowerAnalysis), Some(&0.75));
        assert!(!summary.by_category.contains_key(&Category::EffectSize));
        assert_eq!(summary.by_difficulty.get(&Difficulty::Hard), Some(&0.5));
        assert_eq!(summary.input_tokens, 200);
        assert_eq!(summary.total_tokens(), 220);
        assert_eq!(summary.total_time_seconds, 6.0);
    }

    #[test]
    fn test_empty_run() {
        let summary = ModelRun::new("x/y", Vec::new()).summary();
        assert_eq!(summary.overall_accuracy, 0.0);
        assert_eq!(summary.failed, 0);
    }
}
