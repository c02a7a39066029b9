//! Policy-driven scoring
//!
//! Dispatches on the question's evaluation method:
//!
//! - `exact_match`: binary score from the answer type's matcher
//! - `llm_judge`: the judge score
//! - `hybrid`: `numeric_weight * numeric + explanation_weight * explanation`

use regex::Regex;
use statbench_core::error::{BenchError, BenchResult};
use statbench_core::llm::ModelResponse;
use std::sync::LazyLock;
use tracing::debug;

use super::judge::JudgeEvaluator;
use super::numeric::NumericEvaluator;
use super::types::Evaluation;
use crate::questions::{EvaluationMethod, ExpectedAnswer, Question};

static AFFIRMATIVE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\b(?:yes|true)\b").ok());
static NEGATIVE: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"(?i)\b(?:no|not|false)\b").ok());

/// Combines numeric matching and judge scoring into one [`Evaluation`]
pub struct CompositeEvaluator {
    judge: Option<JudgeEvaluator>,
    fallback_weights: (f64, f64),
}

impl CompositeEvaluator {
    /// Evaluator without a judge; `llm_judge` and `hybrid` questions will fail
    pub fn exact_match_only() -> Self {
        Self {
            judge: None,
            fallback_weights: (0.7, 0.3),
        }
    }

    pub fn new(judge: JudgeEvaluator) -> Self {
        Self {
            judge: Some(judge),
            fallback_weights: (0.7, 0.3),
        }
    }

    /// Weights used when a hybrid question was built without its own pair
    pub fn with_fallback_weights(mut self, numeric_weight: f64, explanation_weight: f64) -> Self {
        self.fallback_weights = (numeric_weight, explanation_weight);
        self
    }

    pub async fn evaluate(&self, question: &Question, response: &ModelResponse) -> BenchResult<Evaluation> {
        let evaluation = match question.evaluation.method {
            EvaluationMethod::ExactMatch => Self::exact_match(question, response),
            EvaluationMethod::LlmJudge => {
                let verdict = self.judge(question)?.evaluate(question, response).await?;
                Evaluation::new(verdict.score, 0.0, verdict.score).with_judge(verdict)
            }
            EvaluationMethod::Hybrid => self.hybrid(question, response).await?,
        };

        debug!(
            question = %question.id,
            method = %question.evaluation.method,
            score = evaluation.overall_score,
            "evaluated"
        );
        Ok(evaluation)
    }

    /// Binary scoring against the expected answer
    pub fn exact_match(question: &Question, response: &ModelResponse) -> Evaluation {
        match &question.expected_answer {
            expected @ (ExpectedAnswer::Numeric { .. } | ExpectedAnswer::NumericRange { .. }) => {
                let numeric = NumericEvaluator::evaluate_response(response, expected);
                let score = binary(numeric.correct);
                Evaluation::new(score, score, 0.0).with_numeric(numeric)
            }
            ExpectedAnswer::Categorical {
                value,
                alternatives,
            } => {
                let score = binary(matches_categorical(&response.content, value, alternatives));
                Evaluation::new(score, score, 0.0)
            }
            ExpectedAnswer::Boolean { value } => {
                let score = binary(stated_boolean(&response.content) == Some(*value));
                Evaluation::new(score, score, 0.0)
            }
        }
    }

    async fn hybrid(&self, question: &Question, response: &ModelResponse) -> BenchResult<Evaluation> {
        let (numeric_weight, explanation_weight) =
            question.evaluation.weights().unwrap_or(self.fallback_weights);

        let numeric = question
            .expected_answer
            .is_numeric()
            .then(|| NumericEvaluator::evaluate_response(response, &question.expected_answer));
        let numeric_score = numeric.as_ref().map_or(0.0, |n| binary(n.correct));

        let verdict = self.judge(question)?.evaluate(question, response).await?;
        let overall = numeric_weight * numeric_score + explanation_weight * verdict.score;

        let mut evaluation = Evaluation::new(overall, numeric_score, verdict.score).with_judge(verdict);
        evaluation.numeric_evaluation = numeric;
        Ok(evaluation)
    }

    fn judge(&self, question: &Question) -> BenchResult<&JudgeEvaluator> {
        self.judge.as_ref().ok_or_else(|| {
            BenchError::config(format!(
                "Question '{}' uses {} evaluation but no judge model is configured",
                question.id, question.evaluation.method
            ))
        })
    }
}

fn binary(correct: bool) -> f64 {
    if correct { 1.0 } else { 0.0 }
}

/// Case-insensitive substring match against the value or any alternative
fn matches_categorical(content: &str, value: &str, alternatives: &[String]) -> bool {
    let content = content.to_lowercase();
    std::iter::once(value)
        .chain(alternatives.iter().map(String::as_str))
        .map(|candidate| candidate.trim().to_lowercase())
        .any(|candidate| !candidate.is_empty() && content.contains(&candidate))
}

/// The yes/no position a response takes, if any
///
/// Affirmative and negative tokens are matched as whole words and checked
/// independently. When only one kind appears it decides; when both appear
/// the earlier one decides.
fn stated_boolean(content: &str) -> Option<bool> {
    let first = |re: &LazyLock<Option<Regex>>| re.as_ref().and_then(|re| re.find(content)).map(|m| m.start());
    match (first(&AFFIRMATIVE), first(&NEGATIVE)) {
        (Some(_), None) => Some(true),
        (None, Some(_)) => Some(false),
        (Some(yes), Some(no)) => Some(yes < no),
        (None, None) => None,
    }
}
