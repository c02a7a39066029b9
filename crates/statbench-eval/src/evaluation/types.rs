//! Evaluation result types

use serde::{Deserialize, Serialize};

/// Clamp to [0, 1], mapping NaN to 0
pub fn clamp_unit(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

/// Outcome of comparing an extracted number against the ground truth
///
/// `correct == within_tolerance` always holds; a missing extraction is never correct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericEvaluation {
    pub correct: bool,
    pub extracted_value: Option<f64>,
    /// Target value; the midpoint for range targets
    pub expected_value: f64,
    pub difference: Option<f64>,
    pub within_tolerance: bool,
}

/// Structured verdict from the judge model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeEvaluation {
    pub score: f64,
    pub reasoning: String,
    #[serde(default)]
    pub key_concepts_found: Vec<String>,
    #[serde(default)]
    pub key_concepts_missing: Vec<String>,
}

impl JudgeEvaluation {
    pub fn new(score: f64, reasoning: impl Into<String>) -> Self {
        Self {
            score: clamp_unit(score),
            reasoning: reasoning.into(),
            key_concepts_found: Vec::new(),
            key_concepts_missing: Vec::new(),
        }
    }
}

/// Final score for one question attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub overall_score: f64,
    pub numeric_score: f64,
    pub explanation_score: f64,
    pub numeric_evaluation: Option<NumericEvaluation>,
    pub judge_evaluation: Option<JudgeEvaluation>,
}

impl Evaluation {
    /// Create an evaluation; every score is clamped to [0, 1]
    pub fn new(overall_score: f64, numeric_score: f64, explanation_score: f64) -> Self {
        Self {
            overall_score: clamp_unit(overall_score),
            numeric_score: clamp_unit(numeric_score),
            explanation_score: clamp_unit(explanation_score),
            numeric_evaluation: None,
            judge_evaluation: None,
        }
    }

    pub fn with_numeric(mut self, numeric: NumericEvaluation) -> Self {
        self.numeric_evaluation = Some(numeric);
        self
    }

    pub fn with_judge(mut self, judge: JudgeEvaluation) -> Self {
        self.judge_evaluation = Some(judge);
        self
    }
}
