//! Run results and summary metrics

mod summary;
mod types;

pub use summary::{ModelSummary, split_model_id};
pub use types::{BenchmarkResult, ModelRun, QuestionResult};
