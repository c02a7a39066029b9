//! Benchmark question types
//!
//! A question pairs a statistics word problem with its ground truth and the
//! policy used to score answers to it. Questions are immutable once loaded.

use serde::{Deserialize, Serialize};
use statbench_core::error::{BenchError, BenchResult};
use std::fmt;
use std::str::FromStr;

/// Statistics topic a question belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    PowerAnalysis,
    SampleSize,
    SignificanceTesting,
    ConfidenceIntervals,
    EffectSize,
}

impl Category {
    /// Identifier used in question files, filters and reports
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PowerAnalysis => "power_analysis",
            Category::SampleSize => "sample_size",
            Category::SignificanceTesting => "significance_testing",
            Category::ConfidenceIntervals => "confidence_intervals",
            Category::EffectSize => "effect_size",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::PowerAnalysis => "Power Analysis",
            Category::SampleSize => "Sample Size",
            Category::SignificanceTesting => "Significance Testing",
            Category::ConfidenceIntervals => "Confidence Intervals",
            Category::EffectSize => "Effect Size",
        }
    }

    pub fn all() -> &'static [Category] {
        &[
            Category::PowerAnalysis,
            Category::SampleSize,
            Category::SignificanceTesting,
            Category::ConfidenceIntervals,
            Category::EffectSize,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Category::all()
            .iter()
            .copied()
            .find(|category| category.as_str() == normalized)
            .ok_or_else(|| BenchError::invalid_input(format!("Unknown category: {}", s)))
    }
}

/// Difficulty tier, ordered from easiest to hardest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Expert => "expert",
        }
    }

    pub fn all() -> &'static [Difficulty] {
        &[
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::Expert,
        ]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Difficulty::all()
            .iter()
            .copied()
            .find(|difficulty| difficulty.as_str() == normalized)
            .ok_or_else(|| BenchError::invalid_input(format!("Unknown difficulty: {}", s)))
    }
}

/// How a single-value target is compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceKind {
    Absolute,
    #[default]
    Relative,
}

fn default_tolerance() -> f64 {
    0.01
}

/// Ground truth for a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpectedAnswer {
    Numeric {
        value: f64,
        #[serde(default = "default_tolerance")]
        tolerance: f64,
        #[serde(default)]
        tolerance_type: ToleranceKind,
    },
    NumericRange {
        min: f64,
        max: f64,
    },
    Categorical {
        value: String,
        #[serde(default)]
        alternatives: Vec<String>,
    },
    Boolean {
        value: bool,
    },
}

impl ExpectedAnswer {
    /// Whether the numeric evaluator applies
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ExpectedAnswer::Numeric { .. } | ExpectedAnswer::NumericRange { .. }
        )
    }
}

impl fmt::Display for ExpectedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedAnswer::Numeric {
                value,
                tolerance,
                tolerance_type,
            } => match tolerance_type {
                ToleranceKind::Absolute => write!(f, "{} (absolute tolerance ±{})", value, tolerance),
                ToleranceKind::Relative => {
                    write!(f, "{} (relative tolerance {}%)", value, tolerance * 100.0)
                }
            },
            ExpectedAnswer::NumericRange { min, max } => {
                write!(f, "a value between {} and {}", min, max)
            }
            ExpectedAnswer::Categorical {
                value,
                alternatives,
            } => {
                if alternatives.is_empty() {
                    write!(f, "{}", value)
                } else {
                    write!(f, "{} (also accepted: {})", value, alternatives.join(", "))
                }
            }
            ExpectedAnswer::Boolean { value } => {
                write!(f, "{}", if *value { "yes" } else { "no" })
            }
        }
    }
}

/// Scoring strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationMethod {
    #[default]
    ExactMatch,
    LlmJudge,
    Hybrid,
}

impl fmt::Display for EvaluationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EvaluationMethod::ExactMatch => "exact_match",
            EvaluationMethod::LlmJudge => "llm_judge",
            EvaluationMethod::Hybrid => "hybrid",
        };
        f.write_str(name)
    }
}

/// Per-question scoring policy
///
/// Weights belong to the question. Their sum is conventionally 1 but is not enforced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationPolicy {
    #[serde(default)]
    pub method: EvaluationMethod,
    #[serde(default)]
    pub rubric: Option<String>,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub numeric_weight: Option<f64>,
    #[serde(default)]
    pub explanation_weight: Option<f64>,
}

impl EvaluationPolicy {
    pub fn new(method: EvaluationMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    pub fn with_weights(mut self, numeric_weight: f64, explanation_weight: f64) -> Self {
        self.numeric_weight = Some(numeric_weight);
        self.explanation_weight = Some(explanation_weight);
        self
    }

    pub fn with_rubric(mut self, rubric: impl Into<String>) -> Self {
        self.rubric = Some(rubric.into());
        self
    }

    pub fn with_key_concepts(mut self, key_concepts: Vec<String>) -> Self {
        self.key_concepts = key_concepts;
        self
    }

    /// Weight pair, if both weights are set
    pub fn weights(&self) -> Option<(f64, f64)> {
        self.numeric_weight.zip(self.explanation_weight)
    }
}

/// A single benchmark question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Stable unique identifier (`[a-z0-9_]+`)
    pub id: String,

    #[serde(alias = "topic")]
    pub category: Category,

    pub difficulty: Difficulty,

    /// Problem statement sent to the model
    #[serde(alias = "question")]
    pub prompt: String,

    #[serde(default)]
    pub context: Option<String>,

    pub expected_answer: ExpectedAnswer,

    #[serde(default)]
    pub evaluation: EvaluationPolicy,

    /// Where the problem was adapted from
    #[serde(default)]
    pub source: Option<String>,

    /// Whether the model is offered the code-execution tool
    #[serde(default, alias = "requires_code")]
    pub requires_tools: bool,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        expected_answer: ExpectedAnswer,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            difficulty,
            prompt: prompt.into(),
            context: None,
            expected_answer,
            evaluation: EvaluationPolicy::default(),
            source: None,
            requires_tools: false,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_evaluation(mut self, evaluation: EvaluationPolicy) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn with_tools(mut self, requires_tools: bool) -> Self {
        self.requires_tools = requires_tools;
        self
    }

    /// User turn sent to the model
    pub fn format_prompt(&self) -> String {
        match self.context.as_deref().map(str::trim) {
            Some(context) if !context.is_empty() => {
                format!("{}\n\nAdditional context:\n{}", self.prompt, context)
            }
            _ => self.prompt.clone(),
        }
    }

    /// Check structural constraints that serde cannot express
    pub fn validate(&self) -> BenchResult<()> {
        if self.id.is_empty()
            || !self
                .id
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(BenchError::invalid_input(format!(
                "Question id '{}' must match [a-z0-9_]+",
                self.id
            )));
        }

        if self.prompt.trim().is_empty() {
            return Err(BenchError::invalid_input(format!(
                "Question '{}' has an empty prompt",
                self.id
            )));
        }

        match &self.expected_answer {
            ExpectedAnswer::Numeric { tolerance, .. } if *tolerance < 0.0 => {
                return Err(BenchError::invalid_input(format!(
                    "Question '{}' has a negative tolerance",
                    self.id
                )));
            }
            ExpectedAnswer::NumericRange { min, max } if min > max => {
                return Err(BenchError::invalid_input(format!(
                    "Question '{}' has an empty range [{}, {}]",
                    self.id, min, max
                )));
            }
            _ => {}
        }

        if self.evaluation.method == EvaluationMethod::Hybrid && self.evaluation.weights().is_none() {
            return Err(BenchError::invalid_input(format!(
                "Question '{}' uses hybrid evaluation but does not set both numeric_weight and explanation_weight",
                self.id
            )));
        }

        Ok(())
    }
}
