//! Answer evaluation pipeline
//!
//! Extraction and numeric tolerance checks, judge-model scoring, and the
//! composite evaluator that picks a policy per question.

mod composite;
mod extractor;
mod judge;
mod numeric;
mod types;

pub use composite::CompositeEvaluator;
pub use extractor::AnswerExtractor;
pub use judge::{JUDGE_SYSTEM_PROMPT, JudgeEvaluator, format_tool_outputs, parse_judge_reply};
pub use numeric::NumericEvaluator;
pub use types::{Evaluation, JudgeEvaluation, NumericEvaluation, clamp_unit};
