//! JSON report generation

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::metrics::{BenchmarkResult, ModelSummary, QuestionResult};

/// JSON report generator
pub struct JsonReporter;

impl JsonReporter {
    /// Summaries and per-question rows, scores rounded to 4 places
    pub fn generate(result: &BenchmarkResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(&Self::to_value(result))?)
    }

    /// Lossless dump of the whole result, including response snapshots
    pub fn generate_full(result: &BenchmarkResult) -> Result<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }

    pub fn to_value(result: &BenchmarkResult) -> Value {
        let mut summaries = Map::new();
        let mut detailed = Map::new();

        for run in &result.runs {
            summaries.insert(run.model.clone(), summary_value(&run.summary()));
            detailed.insert(
                run.model.clone(),
                Value::Array(run.results.iter().map(result_value).collect()),
            );
        }

        json!({
            "timestamp": result.timestamp.to_rfc3339(),
            "summaries": summaries,
            "detailed_results": detailed,
        })
    }
}

fn summary_value(summary: &ModelSummary) -> Value {
    let by_category: Map<String, Value> = summary
        .by_category
        .iter()
        .map(|(category, score)| (category.to_string(), json!(round(*score, 4))))
        .collect();
    let by_difficulty: Map<String, Value> = summary
        .by_difficulty
        .iter()
        .map(|(difficulty, score)| (difficulty.to_string(), json!(round(*score, 4))))
        .collect();

    json!({
        "provider": summary.provider,
        "model": summary.model,
        "overall_accuracy": round(summary.overall_accuracy, 4),
        "numeric_accuracy": round(summary.numeric_accuracy, 4),
        "explanation_accuracy": round(summary.explanation_accuracy, 4),
        "by_category": by_category,
        "by_difficulty": by_difficulty,
        "total_questions": summary.total_questions,
        "successful": summary.successful,
        "failed": summary.failed,
        "input_tokens": summary.input_tokens,
        "output_tokens": summary.output_tokens,
        "total_time_seconds": round(summary.total_time_seconds, 2),
    })
}

fn result_value(result: &QuestionResult) -> Value {
    let evaluation = result.evaluation.as_ref();
    json!({
        "question_id": result.question_id,
        "category": result.category,
        "difficulty": result.difficulty,
        "success": result.success,
        "overall_score": evaluation.map(|e| round(e.overall_score, 4)),
        "numeric_score": evaluation.map(|e| round(e.numeric_score, 4)),
        "explanation_score": evaluation.map(|e| round(e.explanation_score, 4)),
        "extracted_value": evaluation
            .and_then(|e| e.numeric_evaluation.as_ref())
            .and_then(|n| n.extracted_value),
        "tool_calls": result.response.as_ref().map_or(0, |r| r.tool_results.len()),
        "elapsed_seconds": round(result.elapsed_seconds, 2),
        "error": result.error,
    })
}

pub(crate) fn round(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
