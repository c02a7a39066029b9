//! Terminal output for the CLI

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use statbench_eval::metrics::ModelSummary;
use statbench_eval::runner::RunProgress;

const BAR_TEMPLATE: &str = "{spinner:.blue} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}";

/// CLI console for formatted output
pub struct CliConsole;

impl CliConsole {
    pub fn success(message: &str) {
        println!("{} {}", "✓".green().bold(), message.green());
    }

    pub fn warn(message: &str) {
        println!("{} {}", "⚠".yellow().bold(), message.yellow());
    }

    pub fn print_header(title: &str) {
        println!();
        println!("{}", title.bold().underline());
        println!("{}", "=".repeat(title.len()).dimmed());
    }

    /// Bar over every (model, question) attempt in the run
    pub fn progress_bar(total: u64) -> ProgressBar {
        let bar = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> ");
        bar.set_style(style);
        bar
    }

    /// Advance the bar for one finished attempt
    pub fn record_progress(bar: &ProgressBar, progress: &RunProgress) {
        bar.inc(1);
        bar.set_message(format!("{} {}", progress.model, progress.question_id));
        if !progress.success {
            bar.println(format!(
                "{} {} / {}: {}",
                "✗".red().bold(),
                progress.model,
                progress.question_id,
                progress.error.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    /// One colored line per model, best first
    pub fn print_summaries(summaries: &[ModelSummary]) {
        Self::print_header("Summary");

        let mut ranked: Vec<&ModelSummary> = summaries.iter().collect();
        ranked.sort_by(|a, b| b.overall_accuracy.total_cmp(&a.overall_accuracy));

        for summary in ranked {
            let accuracy = format!("{:>6.1}%", summary.overall_accuracy * 100.0);
            let accuracy = match summary.overall_accuracy {
                a if a >= 0.8 => accuracy.green().bold(),
                a if a >= 0.5 => accuracy.yellow().bold(),
                _ => accuracy.red().bold(),
            };
            let failed = if summary.failed > 0 {
                format!("{} failed", summary.failed).red().to_string()
            } else {
                "0 failed".dimmed().to_string()
            };
            println!(
                "  {} {:<40} {}/{} answered, {}, {} tokens, {:.1}s",
                accuracy,
                summary.model_id.bold(),
                summary.successful,
                summary.total_questions,
                failed,
                summary.total_tokens(),
                summary.total_time_seconds
            );
        }
    }
}
