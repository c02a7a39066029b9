//! Orchestrator behavior against a scripted completion endpoint
//!
//! Each question prompt carries directives for the fake client, e.g.
//! `sleep=30 answer=64` or `panic`, so a test reads like the batch it drives.

use async_trait::async_trait;
use statbench_core::error::{BenchError, BenchResult};
use statbench_core::llm::{CompletionClient, LlmMessage, MessageRole, ModelResponse, TokenUsage};
use statbench_core::sandbox::{CodeSandbox, ExecutionResult};
use statbench_core::tools::{ExecutePythonTool, ToolArguments, ToolCall, ToolDispatcher, ToolSchema};
use statbench_eval::evaluation::{CompositeEvaluator, JudgeEvaluator};
use statbench_eval::questions::{
    Category, Difficulty, EvaluationMethod, EvaluationPolicy, ExpectedAnswer, Question,
};
use statbench_eval::runner::{BenchmarkRunner, RunProgress};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
struct Seen {
    model: String,
    prompt: String,
    tools_offered: bool,
    system_prompt: Option<String>,
}

#[derive(Default)]
struct ScriptedClient {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    seen: Mutex<Vec<Seen>>,
}

impl ScriptedClient {
    fn seen(&self) -> Vec<Seen> {
        self.seen.lock().unwrap().clone()
    }

    fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn respond(&self, conversation: &[LlmMessage], model: &str) -> BenchResult<ModelResponse> {
        let prompt = conversation.first().map(|m| m.content.clone()).unwrap_or_default();
        let mut answer = "no answer".to_string();

        for directive in prompt.split_whitespace() {
            match directive.split_once('=') {
                Some(("sleep", ms)) => {
                    tokio::time::sleep(Duration::from_millis(ms.parse().unwrap())).await;
                }
                Some(("answer", value)) => answer = format!("The answer is {}", value),
                _ => match directive {
                    "panic" => panic!("scripted panic"),
                    "error" => return Err(BenchError::llm("scripted failure")),
                    "tool" if !conversation.iter().any(|m| m.role == MessageRole::Tool) => {
                        let mut arguments = ToolArguments::new();
                        arguments.insert("code".to_string(), "print(64)".into());
                        return Ok(ModelResponse::new("", model)
                            .with_tool_calls(vec![ToolCall::new("call_1", "execute_python", arguments)])
                            .with_usage(TokenUsage::new(5, 1)));
                    }
                    _ => {}
                },
            }
        }

        Ok(ModelResponse::new(answer, model).with_usage(TokenUsage::new(10, 3)))
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(
        &self,
        conversation: &[LlmMessage],
        model: &str,
        tools: Option<&[ToolSchema]>,
        system_prompt: Option<&str>,
    ) -> BenchResult<ModelResponse> {
        self.seen.lock().unwrap().push(Seen {
            model: model.to_string(),
            prompt: conversation.first().map(|m| m.content.clone()).unwrap_or_default(),
            tools_offered: tools.is_some(),
            system_prompt: system_prompt.map(str::to_string),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        let response = self.respond(conversation, model).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        response
    }
}

/// Judge endpoint with a fixed verdict
struct FixedJudge(&'static str);

#[async_trait]
impl CompletionClient for FixedJudge {
    async fn complete(
        &self,
        _conversation: &[LlmMessage],
        model: &str,
        tools: Option<&[ToolSchema]>,
        _system_prompt: Option<&str>,
    ) -> BenchResult<ModelResponse> {
        assert!(tools.is_none(), "judge must not be offered tools");
        Ok(ModelResponse::new(self.0, model))
    }
}

struct PrintSandbox;

#[async_trait]
impl CodeSandbox for PrintSandbox {
    fn name(&self) -> &str {
        "print"
    }

    async fn execute(&self, _code: &str) -> ExecutionResult {
        ExecutionResult::succeeded("64\n")
    }
}

fn dispatcher() -> Arc<ToolDispatcher> {
    let mut dispatcher = ToolDispatcher::new();
    dispatcher.register(Arc::new(ExecutePythonTool::new(Arc::new(PrintSandbox))));
    Arc::new(dispatcher)
}

fn question(id: &str, prompt: &str) -> Question {
    Question::new(
        id,
        Category::SampleSize,
        Difficulty::Medium,
        prompt,
        ExpectedAnswer::Numeric {
            value: 64.0,
            tolerance: 0.01,
            tolerance_type: Default::default(),
        },
    )
}

fn runner(client: Arc<ScriptedClient>) -> BenchmarkRunner {
    BenchmarkRunner::new(client, dispatcher(), CompositeEvaluator::exact_match_only())
}

fn models(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|id| id.to_string()).collect()
}

#[tokio::test(start_paused = true)]
async fn test_results_keep_question_order() {
    let client = Arc::new(ScriptedClient::default());
    let finished = Arc::new(Mutex::new(Vec::new()));
    let mut runner = runner(client.clone()).with_max_concurrency(5);
    let sink = finished.clone();
    runner.set_progress_callback(Arc::new(move |progress: RunProgress| {
        sink.lock().unwrap().push((progress.question_id, progress.completed, progress.total));
    }));

    let questions: Vec<Question> = (0..5)
        .map(|i| question(&format!("q_{}", i), &format!("sleep={} answer=64", (5 - i) * 10)))
        .collect();

    let result = runner.run(&models(&["vendor/m"]), &questions).await.unwrap();

    let ids: Vec<&str> = result.runs[0].results.iter().map(|r| r.question_id.as_str()).collect();
    assert_eq!(ids, ["q_0", "q_1", "q_2", "q_3", "q_4"]);

    let finished = finished.lock().unwrap().clone();
    let finish_order: Vec<&str> = finished.iter().map(|(id, _, _)| id.as_str()).collect();
    assert_eq!(finish_order, ["q_4", "q_3", "q_2", "q_1", "q_0"]);
    let counts: Vec<usize> = finished.iter().map(|(_, done, _)| *done).collect();
    assert_eq!(counts, [1, 2, 3, 4, 5]);
    assert!(finished.iter().all(|(_, _, total)| *total == 5));
}

#[tokio::test(start_paused = true)]
async fn test_concurrency_cap() {
    let client = Arc::new(ScriptedClient::default());
    let runner = runner(client.clone()).with_max_concurrency(2);
    let questions: Vec<Question> = (0..6)
        .map(|i| question(&format!("q_{}", i), "sleep=20 answer=64"))
        .collect();

    let result = runner.run(&models(&["vendor/m"]), &questions).await.unwrap();

    assert_eq!(result.runs[0].results.len(), 6);
    assert_eq!(client.peak(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_zero_concurrency_is_clamped() {
    let client = Arc::new(ScriptedClient::default());
    let runner = runner(client.clone()).with_max_concurrency(0);
    let questions = vec![question("q_a", "sleep=5 answer=64"), question("q_b", "sleep=5 answer=64")];

    let result = runner.run(&models(&["vendor/m"]), &questions).await.unwrap();

    assert_eq!(result.runs[0].results.len(), 2);
    assert_eq!(client.peak(), 1);
}

#[tokio::test]
async fn test_failures_and_panics_are_isolated() {
    let client = Arc::new(ScriptedClient::default());
    let runner = runner(client.clone());
    let questions = vec![
        question("q_ok", "answer=64"),
        question("q_err", "error"),
        question("q_panic", "panic"),
        question("q_wrong", "answer=12"),
    ];

    let result = runner.run(&models(&["vendor/m"]), &questions).await.unwrap();
    let results = &result.runs[0].results;

    assert!(results[0].success);
    assert_eq!(results[0].overall_score(), Some(1.0));

    assert!(!results[1].success);
    assert_eq!(results[1].error.as_deref(), Some("LLM error: scripted failure"));
    assert!(results[1].evaluation.is_none());

    assert!(!results[2].success);
    let panic_error = results[2].error.as_deref().unwrap();
    assert!(panic_error.starts_with("Question attempt panicked"));
    assert!(panic_error.contains("scripted panic"));

    assert!(results[3].success);
    assert_eq!(results[3].overall_score(), Some(0.0));

    let summary = result.runs[0].summary();
    assert_eq!(summary.successful, 2);
    assert_eq!(summary.failed, 2);
    assert!((summary.overall_accuracy - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_tools_offered_only_when_required() {
    let client = Arc::new(ScriptedClient::default());
    let runner = runner(client.clone()).with_system_prompt("be precise");
    let questions = vec![
        question("q_plain", "answer=64"),
        question("q_tools", "tool").with_tools(true),
    ];

    let result = runner.run(&models(&["vendor/m"]), &questions).await.unwrap();

    let seen = client.seen();
    let plain: Vec<&Seen> = seen.iter().filter(|s| s.prompt == "answer=64").collect();
    let tooled: Vec<&Seen> = seen.iter().filter(|s| s.prompt == "tool").collect();
    assert_eq!(plain.len(), 1);
    assert!(!plain[0].tools_offered);
    assert_eq!(tooled.len(), 2);
    assert!(tooled.iter().all(|s| s.tools_offered));
    assert!(seen.iter().all(|s| s.system_prompt.as_deref() == Some("be precise")));

    let tooled_result = &result.runs[0].results[1];
    let response = tooled_result.response.as_ref().unwrap();
    assert_eq!(response.tool_results.len(), 1);
    assert_eq!(response.tool_results[0].output, "64\n");
    assert_eq!(response.usage, TokenUsage::new(15, 4));
    // The final answer has no number; the extractor falls back to the tool output
    assert_eq!(tooled_result.overall_score(), Some(1.0));
}

#[tokio::test]
async fn test_models_run_sequentially() {
    let client = Arc::new(ScriptedClient::default());
    let runner = runner(client.clone());
    let questions = vec![question("q_1", "answer=64"), question("q_2", "answer=64")];

    let result = runner
        .run(&models(&["a/first", "b/second"]), &questions)
        .await
        .unwrap();

    let order: Vec<String> = client.seen().into_iter().map(|s| s.model).collect();
    assert_eq!(order, ["a/first", "a/first", "b/second", "b/second"]);
    assert_eq!(result.runs.len(), 2);
    assert_eq!(result.run("b/second").unwrap().results.len(), 2);
    assert_eq!(result.total_questions(), 4);
}

#[tokio::test]
async fn test_hybrid_scoring_uses_question_weights() {
    let client = Arc::new(ScriptedClient::default());
    let judge = JudgeEvaluator::new(
        Arc::new(FixedJudge(r#"{"score": 0.5, "reasoning": "thin explanation"}"#)),
        "judge/model",
    );
    let runner = BenchmarkRunner::new(client, dispatcher(), CompositeEvaluator::new(judge));
    let hybrid = question("q_hybrid", "answer=64")
        .with_evaluation(EvaluationPolicy::new(EvaluationMethod::Hybrid).with_weights(0.6, 0.4));

    let result = runner.run(&models(&["vendor/m"]), &[hybrid]).await.unwrap();
    let evaluation = result.runs[0].results[0].evaluation.as_ref().unwrap();

    assert_eq!(evaluation.numeric_score, 1.0);
    assert_eq!(evaluation.explanation_score, 0.5);
    assert!((evaluation.overall_score - 0.8).abs() < 1e-9);
    assert_eq!(
        evaluation.judge_evaluation.as_ref().unwrap().reasoning,
        "thin explanation"
    );
}

#[tokio::test]
async fn test_judge_question_without_judge_fails_only_that_question() {
    let client = Arc::new(ScriptedClient::default());
    let runner = runner(client);
    let judged = question("q_judge", "answer=64")
        .with_evaluation(EvaluationPolicy::new(EvaluationMethod::LlmJudge));

    let result = runner
        .run(&models(&["vendor/m"]), &[judged, question("q_ok", "answer=64")])
        .await
        .unwrap();
    let results = &result.runs[0].results;

    assert!(!results[0].success);
    assert!(results[0].error.as_deref().unwrap().contains("no judge model is configured"));
    assert!(results[1].success);
}

#[tokio::test]
async fn test_empty_inputs_are_rejected() {
    let runner = runner(Arc::new(ScriptedClient::default()));

    let err = runner.run(&models(&["vendor/m"]), &[]).await.unwrap_err();
    assert!(err.to_string().contains("No questions found"));

    let err = runner.run(&[], &[question("q", "answer=1")]).await.unwrap_err();
    assert!(err.to_string().contains("No models specified"));
}
