//! Report generation for benchmark results
//!
//! Generates reports in various formats (JSON, Markdown, CSV, terminal table).

mod csv;
mod json;
mod markdown;

pub use csv::CsvReporter;
pub use json::JsonReporter;
pub use markdown::MarkdownReporter;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tracing::info;

use crate::metrics::BenchmarkResult;
use crate::questions::Difficulty;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Json,
    Markdown,
    Csv,
    Table,
}

impl ReportFormat {
    /// File extension; `None` for terminal-only formats
    pub fn extension(&self) -> Option<&'static str> {
        match self {
            ReportFormat::Json => Some("json"),
            ReportFormat::Markdown => Some("md"),
            ReportFormat::Csv => Some("csv"),
            ReportFormat::Table => None,
        }
    }
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "markdown" | "md" => Ok(ReportFormat::Markdown),
            "csv" => Ok(ReportFormat::Csv),
            "table" => Ok(ReportFormat::Table),
            other => bail!("Unknown report format: {} (expected json, markdown, csv or table)", other),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Json => "json",
            ReportFormat::Markdown => "markdown",
            ReportFormat::Csv => "csv",
            ReportFormat::Table => "table",
        };
        f.write_str(name)
    }
}

/// Generate a report in the specified format
pub fn generate_report(result: &BenchmarkResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Json => JsonReporter::generate(result),
        ReportFormat::Markdown => MarkdownReporter::generate(result),
        ReportFormat::Csv => CsvReporter::generate(result),
        ReportFormat::Table => Ok(generate_table(result)),
    }
}

/// Write each file-backed format as `results_<YYYYmmdd_HHMMSS>.<ext>` under `dir`
///
/// Returns the written paths in the order of `formats`; terminal-only formats are skipped.
pub fn write_reports(result: &BenchmarkResult, dir: &Path, formats: &[ReportFormat]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir).with_context(|| format!("Failed to create results directory {:?}", dir))?;

    let stem = format!("results_{}", result.timestamp.format("%Y%m%d_%H%M%S"));
    let mut written = Vec::new();

    for format in formats {
        let Some(extension) = format.extension() else {
            continue;
        };
        let path = dir.join(format!("{}.{}", stem, extension));
        if written.contains(&path) {
            continue;
        }

        let content = generate_report(result, *format)?;
        std::fs::write(&path, content).with_context(|| format!("Failed to write report {:?}", path))?;
        info!("Wrote {} report to {:?}", format, path);
        written.push(path);
    }

    Ok(written)
}

/// Generate a plain summary table for terminal output
pub fn generate_table(result: &BenchmarkResult) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{:=<70}\n", "= Benchmark Results "));
    output.push_str(&format!(
        "Timestamp: {}\n",
        result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("{:=<70}\n", ""));

    for summary in result.summaries() {
        output.push_str(&format!("\n{}\n", summary.model_id));
        output.push_str(&format!("{:-<70}\n", ""));
        output.push_str(&format!(
            "  Overall Accuracy:      {:>6.1}%\n",
            summary.overall_accuracy * 100.0
        ));
        output.push_str(&format!(
            "  Numeric Accuracy:      {:>6.1}%\n",
            summary.numeric_accuracy * 100.0
        ));
        output.push_str(&format!(
            "  Explanation Accuracy:  {:>6.1}%\n",
            summary.explanation_accuracy * 100.0
        ));
        output.push_str(&format!(
            "  Questions: {}/{} ({} failed)\n",
            summary.successful, summary.total_questions, summary.failed
        ));
        output.push_str(&format!(
            "  Tokens: {} in / {} out\n",
            summary.input_tokens, summary.output_tokens
        ));
        output.push_str(&format!("  Time: {:.1}s\n", summary.total_time_seconds));

        if !summary.by_category.is_empty() {
            output.push_str("\n  By Category:\n");
            for (category, accuracy) in &summary.by_category {
                output.push_str(&format!("    {:<24} {:>6.1}%\n", category, accuracy * 100.0));
            }
        }

        if !summary.by_difficulty.is_empty() {
            output.push_str("\n  By Difficulty:\n");
            for difficulty in Difficulty::all() {
                if let Some(accuracy) = summary.by_difficulty.get(difficulty) {
                    output.push_str(&format!("    {:<24} {:>6.1}%\n", difficulty, accuracy * 100.0));
                }
            }
        }
    }

    output.push_str(&format!("{:=<70}\n", ""));
    output
}
