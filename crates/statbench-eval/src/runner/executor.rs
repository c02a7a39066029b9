//! Benchmark execution across models and questions
//!
//! Models run one after another. Within a model every question is an
//! independent attempt; at most `max_concurrency` attempts are in flight at
//! once, and results are reassembled in question order regardless of the
//! order in which they finish. A failing or panicking attempt becomes a failed
//! [`QuestionResult`] and never stops the batch.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use futures::FutureExt;
use futures::future::join_all;
use statbench_core::error::{BenchError, BenchResult};
use statbench_core::llm::{CompletionClient, LlmMessage, ModelResponse, ToolLoop};
use statbench_core::tools::ToolDispatcher;
use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};

use crate::evaluation::{CompositeEvaluator, Evaluation};
use crate::metrics::{BenchmarkResult, ModelRun, QuestionResult};
use crate::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::questions::Question;

pub const DEFAULT_MAX_CONCURRENCY: usize = 3;
pub const DEFAULT_MAX_TOOL_ITERATIONS: usize = 10;

/// Callback for progress updates during a run
pub type ProgressCallback = Arc<dyn Fn(RunProgress) + Send + Sync>;

/// Progress update, emitted each time an attempt finishes
#[derive(Debug, Clone)]
pub struct RunProgress {
    pub model: String,
    pub question_id: String,
    /// Attempts finished so far for this model
    pub completed: usize,
    pub total: usize,
    pub success: bool,
    pub score: Option<f64>,
    pub error: Option<String>,
}

/// Drives every question through the completion client and the evaluator
pub struct BenchmarkRunner {
    client: Arc<dyn CompletionClient>,
    dispatcher: Arc<ToolDispatcher>,
    evaluator: CompositeEvaluator,
    system_prompt: String,
    max_concurrency: usize,
    max_tool_iterations: usize,
    progress_callback: Option<ProgressCallback>,
}

impl BenchmarkRunner {
    pub fn new(
        client: Arc<dyn CompletionClient>,
        dispatcher: Arc<ToolDispatcher>,
        evaluator: CompositeEvaluator,
    ) -> Self {
        Self {
            client,
            dispatcher,
            evaluator,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            max_tool_iterations: DEFAULT_MAX_TOOL_ITERATIONS,
            progress_callback: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Clamped to at least one
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn with_max_tool_iterations(mut self, max_tool_iterations: usize) -> Self {
        self.max_tool_iterations = max_tool_iterations;
        self
    }

    pub fn set_progress_callback(&mut self, callback: ProgressCallback) {
        self.progress_callback = Some(callback);
    }

    /// Run every question against every model
    pub async fn run(&self, models: &[String], questions: &[Question]) -> BenchResult<BenchmarkResult> {
        if questions.is_empty() {
            return Err(BenchError::invalid_input(
                "No questions found matching the specified filters",
            ));
        }
        if models.is_empty() {
            return Err(BenchError::invalid_input("No models specified"));
        }

        info!(
            questions = questions.len(),
            models = models.len(),
            "Starting benchmark run"
        );

        let mut runs = Vec::with_capacity(models.len());
        for model in models {
            runs.push(self.run_model(model, questions).await);
        }

        Ok(BenchmarkResult::new(runs))
    }

    /// Run all questions for one model
    pub async fn run_model(&self, model: &str, questions: &[Question]) -> ModelRun {
        info!(model, questions = questions.len(), "Testing model");

        let admission = Semaphore::new(self.max_concurrency);
        let completed = AtomicUsize::new(0);
        let total = questions.len();

        let attempts = questions.iter().map(|question| {
            let admission = &admission;
            let completed = &completed;
            async move {
                // Never closed, so acquire only fails if that changes
                let _permit = admission.acquire().await.ok();
                let result = self.run_question(model, question).await;
                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                self.report_progress(model, &result, done, total);
                result
            }
        });

        // join_all yields in input order
        let results = join_all(attempts).await;
        ModelRun::new(model, results)
    }

    /// Run and score a single question; never fails
    #[instrument(skip_all, fields(model = %model, question = %question.id))]
    pub async fn run_question(&self, model: &str, question: &Question) -> QuestionResult {
        let started = Instant::now();
        let outcome = AssertUnwindSafe(self.attempt(model, question))
            .catch_unwind()
            .await;
        let elapsed = started.elapsed();

        match outcome {
            Ok(Ok((response, evaluation))) => {
                QuestionResult::succeeded(question, response, evaluation, elapsed)
            }
            Ok(Err(error)) => {
                warn!(%error, "Question attempt failed");
                QuestionResult::failed(question, error.to_string(), elapsed)
            }
            Err(payload) => {
                let message = panic_message(&*payload);
                warn!(panic = %message, "Question attempt panicked");
                QuestionResult::failed(question, format!("Question attempt panicked: {}", message), elapsed)
            }
        }
    }

    async fn attempt(&self, model: &str, question: &Question) -> BenchResult<(ModelResponse, Evaluation)> {
        let conversation = vec![LlmMessage::user(question.format_prompt())];

        let response = if question.requires_tools {
            ToolLoop::new(
                self.client.clone(),
                self.dispatcher.clone(),
                self.max_tool_iterations,
            )
            .run(conversation, model, Some(self.system_prompt.as_str()))
            .await?
        } else {
            self.client
                .complete(&conversation, model, None, Some(self.system_prompt.as_str()))
                .await?
        };

        let evaluation = self.evaluator.evaluate(question, &response).await?;
        Ok((response, evaluation))
    }

    fn report_progress(&self, model: &str, result: &QuestionResult, completed: usize, total: usize) {
        if let Some(callback) = &self.progress_callback {
            callback(RunProgress {
                model: model.to_string(),
                question_id: result.question_id.clone(),
                completed,
                total,
                success: result.success,
                score: result.overall_score(),
                error: result.error.clone(),
            });
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
