//! Statbench evaluation library
//!
//! Everything above a single model call: the question bank, answer scoring,
//! run orchestration across models and the reports written at the end.
//!
//! # Example
//!
//! ```rust,ignore
//! use statbench_eval::{BenchmarkRunner, CompositeEvaluator, QuestionFilter, QuestionLoader};
//!
//! let questions = QuestionLoader::new("questions").load(&QuestionFilter::default())?;
//! let runner = BenchmarkRunner::new(client, dispatcher, CompositeEvaluator::exact_match_only());
//! let result = runner.run(&["openai/gpt-4o".to_string()], &questions).await?;
//! ```

pub mod evaluation;
pub mod metrics;
pub mod prompts;
pub mod questions;
pub mod report;
pub mod runner;

// Re-exports for convenience
pub use evaluation::{AnswerExtractor, CompositeEvaluator, Evaluation, JudgeEvaluator, NumericEvaluator};
pub use metrics::{BenchmarkResult, ModelRun, ModelSummary, QuestionResult};
pub use prompts::PromptSource;
pub use questions::{
    Category, Difficulty, EvaluationMethod, ExpectedAnswer, Question, QuestionFilter,
    QuestionLoader,
};
pub use report::{ReportFormat, generate_report, generate_table, write_reports};
pub use runner::{BenchmarkRunner, RunProgress};
