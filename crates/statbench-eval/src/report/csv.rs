//! CSV report generation, one row per (model, question)

use anyhow::Result;
use serde::Serialize;

use super::json::round;
use crate::metrics::{BenchmarkResult, QuestionResult};
use crate::questions::{Category, Difficulty};

const HEADER: [&str; 9] = [
    "model",
    "question_id",
    "category",
    "difficulty",
    "overall_score",
    "numeric_score",
    "success",
    "elapsed_seconds",
    "error",
];

#[derive(Serialize)]
struct Row<'a> {
    model: &'a str,
    question_id: &'a str,
    category: Category,
    difficulty: Difficulty,
    overall_score: Option<f64>,
    numeric_score: Option<f64>,
    success: bool,
    elapsed_seconds: f64,
    error: Option<&'a str>,
}

impl<'a> Row<'a> {
    fn new(model: &'a str, result: &'a QuestionResult) -> Self {
        Self {
            model,
            question_id: &result.question_id,
            category: result.category,
            difficulty: result.difficulty,
            overall_score: result.overall_score().map(|s| round(s, 4)),
            numeric_score: result.numeric_score().map(|s| round(s, 4)),
            success: result.success,
            elapsed_seconds: round(result.elapsed_seconds, 2),
            error: result.error.as_deref(),
        }
    }
}

/// CSV report generator
pub struct CsvReporter;

impl CsvReporter {
    /// RFC 4180 output with CRLF line endings; the header is written even for an empty run
    pub fn generate(result: &BenchmarkResult) -> Result<String> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::CRLF)
            .from_writer(Vec::new());

        wtr.write_record(HEADER)?;
        for run in &result.runs {
            for r in &run.results {
                wtr.serialize(Row::new(&run.model, r))?;
            }
        }
        wtr.flush()?;

        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }
}
