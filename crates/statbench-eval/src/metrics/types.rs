//! Result records for a benchmark run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use statbench_core::llm::{ModelResponse, TokenUsage};
use std::time::Duration;

use super::summary::ModelSummary;
use crate::evaluation::Evaluation;
use crate::questions::{Category, Difficulty, Question};

/// Outcome of one (model, question) attempt
///
/// Either `success` with an evaluation, or a failure with an error and no
/// evaluation. Build through [`QuestionResult::succeeded`] and
/// [`QuestionResult::failed`] to keep that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub success: bool,
    /// Final response snapshot including the tool history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ModelResponse>,
    pub evaluation: Option<Evaluation>,
    pub error: Option<String>,
    /// Wall-clock time of the whole attempt
    pub elapsed_seconds: f64,
}

impl QuestionResult {
    pub fn succeeded(
        question: &Question,
        response: ModelResponse,
        evaluation: Evaluation,
        elapsed: Duration,
    ) -> Self {
        Self {
            question_id: question.id.clone(),
            category: question.category,
            difficulty: question.difficulty,
            success: true,
            response: Some(response),
            evaluation: Some(evaluation),
            error: None,
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }

    pub fn failed(question: &Question, error: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            question_id: question.id.clone(),
            category: question.category,
            difficulty: question.difficulty,
            success: false,
            response: None,
            evaluation: None,
            error: Some(error.into()),
            elapsed_seconds: elapsed.as_secs_f64(),
        }
    }

    pub fn overall_score(&self) -> Option<f64> {
        self.evaluation.as_ref().map(|e| e.overall_score)
    }

    pub fn numeric_score(&self) -> Option<f64> {
        self.evaluation.as_ref().map(|e| e.numeric_score)
    }

    pub fn usage(&self) -> TokenUsage {
        self.response.as_ref().map(|r| r.usage).unwrap_or_default()
    }
}

/// All results for one model, in question order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRun {
    pub model: String,
    pub results: Vec<QuestionResult>,
}

impl ModelRun {
    pub fn new(model: impl Into<String>, results: Vec<QuestionResult>) -> Self {
        Self {
            model: model.into(),
            results,
        }
    }

    pub fn summary(&self) -> ModelSummary {
        ModelSummary::from_run(self)
    }
}

/// A complete run across models, in model order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub timestamp: DateTime<Utc>,
    pub runs: Vec<ModelRun>,
}

impl BenchmarkResult {
    pub fn new(runs: Vec<ModelRun>) -> Self {
        Self {
            timestamp: Utc::now(),
            runs,
        }
    }

    pub fn run(&self, model: &str) -> Option<&ModelRun> {
        self.runs.iter().find(|run| run.model == model)
    }

    pub fn summaries(&self) -> Vec<ModelSummary> {
        self.runs.iter().map(ModelRun::summary).collect()
    }

    pub fn total_questions(&self) -> usize {
        self.runs.iter().map(|run| run.results.len()).sum()
    }
}
