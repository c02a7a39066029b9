//! Run orchestration

mod executor;

pub use executor::{
    BenchmarkRunner, DEFAULT_MAX_CONCURRENCY, DEFAULT_MAX_TOOL_ITERATIONS, ProgressCallback,
    RunProgress,
};
