//! `statbench run`: benchmark every configured model and write reports

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use statbench_core::config::{BenchConfig, load_config};
use statbench_core::llm::OpenAiCompatibleClient;
use statbench_core::sandbox::select_sandbox;
use statbench_core::tools::{ExecutePythonTool, ToolDispatcher};
use statbench_eval::evaluation::{CompositeEvaluator, JudgeEvaluator};
use statbench_eval::prompts::PromptSource;
use statbench_eval::questions::{Category, Difficulty, QuestionFilter, QuestionLoader};
use statbench_eval::report::{ReportFormat, generate_table, write_reports};
use statbench_eval::runner::{BenchmarkRunner, RunProgress};
use tracing::info;

use crate::args::RunArgs;
use crate::console::CliConsole;

pub async fn execute(args: RunArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_to(&mut config);

    let filter = build_filter(&config, &args.question_ids)?;
    let questions = QuestionLoader::new(&config.questions_dir).load(&filter)?;
    if questions.is_empty() {
        bail!(
            "No questions found matching the specified filters in {}",
            config.questions_dir.display()
        );
    }

    if config.provider.api_key().is_none() {
        bail!("No API key configured. Set OPENROUTER_API_KEY or provider.api_key in the config file");
    }

    let prompts = PromptSource::load(&config.prompts_dir);
    let sandbox = select_sandbox(&config.sandbox).await;
    info!(sandbox = sandbox.name(), "sandbox selected");

    let mut dispatcher = ToolDispatcher::new();
    dispatcher.register(Arc::new(ExecutePythonTool::new(sandbox)));

    let client = Arc::new(
        OpenAiCompatibleClient::new(config.provider.clone())
            .context("Failed to create completion client")?,
    );
    let judge = JudgeEvaluator::new(client.clone(), config.evaluation.judge_model.clone())
        .with_template(prompts.judge_template);
    let evaluator = CompositeEvaluator::new(judge).with_fallback_weights(
        config.evaluation.numeric_weight,
        config.evaluation.explanation_weight,
    );

    let mut runner = BenchmarkRunner::new(client, Arc::new(dispatcher), evaluator)
        .with_system_prompt(prompts.system_prompt)
        .with_max_concurrency(config.max_concurrency)
        .with_max_tool_iterations(config.max_tool_iterations);

    CliConsole::print_header("Statistics Benchmark");
    println!(
        "{} questions x {} models (concurrency {}, judge {})",
        questions.len(),
        config.models.len(),
        config.max_concurrency,
        config.evaluation.judge_model
    );

    let bar = CliConsole::progress_bar((questions.len() * config.models.len()) as u64);
    let progress = bar.clone();
    runner.set_progress_callback(Arc::new(move |update: RunProgress| {
        CliConsole::record_progress(&progress, &update);
    }));

    let result = runner.run(&config.models, &questions).await?;
    bar.finish_and_clear();

    let paths = write_reports(&result, &config.results_dir, &args.formats)?;
    for path in &paths {
        CliConsole::success(&format!("Report written to {}", path.display()));
    }

    if args.formats.contains(&ReportFormat::Table) {
        println!("{}", generate_table(&result));
    }
    CliConsole::print_summaries(&result.summaries());

    let failed: usize = result.summaries().iter().map(|s| s.failed).sum();
    if failed > 0 {
        CliConsole::warn(&format!("{} question attempts failed; see the reports for details", failed));
    }

    Ok(())
}

/// Category and difficulty filters come from the merged config; ids only from the command line
fn build_filter(config: &BenchConfig, question_ids: &[String]) -> Result<QuestionFilter> {
    let categories = config
        .categories
        .iter()
        .map(|c| Category::from_str(c))
        .collect::<Result<Vec<_>, _>>()?;
    let difficulties = config
        .difficulties
        .iter()
        .map(|d| Difficulty::from_str(d))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuestionFilter::new()
        .with_categories(categories)
        .with_difficulties(difficulties)
        .with_ids(question_ids.to_vec()))
}
