//! Markdown report generation

use anyhow::Result;

use crate::metrics::BenchmarkResult;
use crate::questions::Difficulty;

/// Markdown report generator
pub struct MarkdownReporter;

impl MarkdownReporter {
    /// Generate a Markdown report
    pub fn generate(result: &BenchmarkResult) -> Result<String> {
        let summaries = result.summaries();
        let mut md = String::new();

        md.push_str("# Statistics Benchmark Results\n\n");
        md.push_str(&format!(
            "Generated: {}\n\n",
            result.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        // Summary
        md.push_str("## Summary\n\n");
        md.push_str("| Model | Overall | Numeric | Explanation | Questions | Tokens | Time |\n");
        md.push_str("|-------|---------|---------|-------------|-----------|--------|------|\n");
        for summary in &summaries {
            md.push_str(&format!(
                "| {} | {:.1}% | {:.1}% | {:.1}% | {}/{} | {} | {:.1}s |\n",
                summary.model_id,
                summary.overall_accuracy * 100.0,
                summary.numeric_accuracy * 100.0,
                summary.explanation_accuracy * 100.0,
                summary.successful,
                summary.total_questions,
                summary.total_tokens(),
                summary.total_time_seconds
            ));
        }
        md.push('\n');

        // By category
        md.push_str("## Results by Category\n");
        for summary in &summaries {
            md.push_str(&format!("\n### {}\n\n", summary.model_id));
            md.push_str("| Category | Accuracy |\n");
            md.push_str("|----------|----------|\n");
            for (category, accuracy) in &summary.by_category {
                md.push_str(&format!("| {} | {:.1}% |\n", category, accuracy * 100.0));
            }
        }
        md.push('\n');

        // By difficulty
        md.push_str("## Results by Difficulty\n");
        for summary in &summaries {
            md.push_str(&format!("\n### {}\n\n", summary.model_id));
            md.push_str("| Difficulty | Accuracy |\n");
            md.push_str("|------------|----------|\n");
            for difficulty in Difficulty::all() {
                if let Some(accuracy) = summary.by_difficulty.get(difficulty) {
                    md.push_str(&format!("| {} | {:.1}% |\n", difficulty, accuracy * 100.0));
                }
            }
        }
        md.push('\n');

        // Per question
        md.push_str("## Detailed Results\n");
        for run in &result.runs {
            md.push_str(&format!("\n### {}\n\n", run.model));
            md.push_str("| Question | Category | Difficulty | Score | Tools | Time |\n");
            md.push_str("|----------|----------|------------|-------|-------|------|\n");
            for r in &run.results {
                let score = r
                    .overall_score()
                    .map(|score| format!("{:.2}", score))
                    .unwrap_or_else(|| "ERROR".to_string());
                let tools = r.response.as_ref().map_or(0, |resp| resp.tool_results.len());
                md.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {:.1}s |\n",
                    r.question_id, r.category, r.difficulty, score, tools, r.elapsed_seconds
                ));
            }
        }

        // Failures
        let failures: Vec<_> = result
            .runs
            .iter()
            .flat_map(|run| run.results.iter().map(move |r| (run.model.as_str(), r)))
            .filter(|(_, r)| !r.success)
            .collect();
        if !failures.is_empty() {
            md.push_str("\n## Failures\n\n");
            for (model, r) in failures {
                md.push_str(&format!(
                    "- **{}** / `{}`: {}\n",
                    model,
                    r.question_id,
                    r.error.as_deref().unwrap_or("unknown error").replace('\n', " ")
                ));
            }
        }

        Ok(md)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Evaluation;
    use crate::metrics::{ModelRun, QuestionResult};
    use crate::questions::{Category, ExpectedAnswer, Question};
    use statbench_core::llm::ModelResponse;
    use std::time::Duration;

    #[test]
    fn test_markdown_sections() {
        let q1 = Question::new("es_001", Category::EffectSize, Difficulty::Hard, "q", ExpectedAnswer::Boolean { value: true });
        let q2 = Question::new("es_002", Category::EffectSize, Difficulty::Easy, "q", ExpectedAnswer::Boolean { value: true });
        let result = BenchmarkResult::new(vec![ModelRun::new(
            "vendor/model",
            vec![
                QuestionResult::succeeded(&q1, ModelResponse::new("yes", "m"), Evaluation::new(1.0, 1.0, 0.0), Duration::from_secs(2)),
                QuestionResult::failed(&q2, "LLM error: API error (status 500)\nbody", Duration::from_secs(1)),
            ],
        )]);

        let md = MarkdownReporter::generate(&result).unwrap();
        assert!(md.starts_with("# Statistics Benchmark Results"));
        assert!(md.contains("| vendor/model | 100.0% | 100.0% | 0.0% | 1/2 |"));
        assert!(md.contains("| effect_size | 100.0% |"));
        assert!(md.contains("| hard | 100.0% |"));
        assert!(md.contains("| es_001 | effect_size | hard | 1.00 | 0 | 2.0s |"));
        assert!(md.contains("| es_002 | effect_size | easy | ERROR | 0 | 1.0s |"));
        assert!(md.contains("- **vendor/model** / `es_002`: LLM error: API error (status 500) body"));
    }
}
