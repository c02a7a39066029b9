//! `statbench list`: show what the question bank contains

use std::path::Path;

use anyhow::{Context, Result};
use colored::*;
use statbench_core::config::load_config;
use statbench_eval::questions::{Category, Difficulty, QuestionLoader};

use crate::console::CliConsole;

pub fn execute(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path).context("Failed to load configuration")?;
    let loader = QuestionLoader::new(&config.questions_dir);
    let questions = loader.load_all()?;

    if questions.is_empty() {
        CliConsole::warn(&format!("No questions found in {}", loader.questions_dir().display()));
        return Ok(());
    }

    CliConsole::print_header("Questions");
    println!(
        "{:<24} {:<22} {:<8} {:<12} {:<6}",
        "ID", "Category", "Level", "Evaluation", "Tools"
    );
    println!("{:-<76}", "");
    for question in &questions {
        println!(
            "{:<24} {:<22} {:<8} {:<12} {:<6}",
            question.id,
            question.category.display_name(),
            question.difficulty,
            question.evaluation.method.to_string(),
            if question.requires_tools { "yes" } else { "" }
        );
    }

    let stats = loader.statistics()?;
    println!("\nTotal: {} questions ({} require tools)", stats.total.to_string().bold(), stats.requiring_tools);

    println!("\nBy category:");
    for category in Category::all() {
        if let Some(count) = stats.by_category.get(category) {
            println!("  {:<22} {}", category.display_name(), count);
        }
    }

    println!("\nBy difficulty:");
    for difficulty in Difficulty::all() {
        if let Some(count) = stats.by_difficulty.get(difficulty) {
            println!("  {:<22} {}", difficulty, count);
        }
    }

    Ok(())
}
