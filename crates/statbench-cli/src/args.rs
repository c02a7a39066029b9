//! CLI argument definitions using clap
//!
//! - statbench run             # Benchmark the configured models
//! - statbench run -m a/b -c power_analysis -d hard
//! - statbench list            # Show the question bank

use clap::{Args, Parser, Subcommand};
use statbench_core::config::BenchConfig;
use statbench_core::sandbox::SandboxStrategy;
use statbench_eval::questions::{Category, Difficulty};
use statbench_eval::report::ReportFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "statbench")]
#[command(about = "Benchmark LLMs on statistics word problems with sandboxed tool use")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the benchmark and write reports
    Run(RunArgs),

    /// List questions in the question bank
    List {
        /// Path to configuration file (defaults to ./statbench.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Path to configuration file (defaults to ./statbench.toml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Models to benchmark, in run order
    #[arg(short = 'm', long = "model", num_args = 1..)]
    pub models: Vec<String>,

    /// Only questions in these categories
    #[arg(short = 'c', long = "category", num_args = 1..)]
    pub categories: Vec<Category>,

    /// Only questions at these difficulties
    #[arg(short = 'd', long = "difficulty", num_args = 1..)]
    pub difficulties: Vec<Difficulty>,

    /// Only these question ids
    #[arg(short = 'q', long = "question", num_args = 1..)]
    pub question_ids: Vec<String>,

    /// Directory reports are written to
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Report formats: json, markdown, csv, table
    #[arg(short = 'f', long = "format", num_args = 1.., default_values = ["json", "markdown", "table"])]
    pub formats: Vec<ReportFormat>,

    /// Sandbox strategy: auto, container or local
    #[arg(long)]
    pub sandbox: Option<SandboxStrategy>,
}

impl RunArgs {
    /// Command-line values win over the file and the environment
    pub fn apply_to(&self, config: &mut BenchConfig) {
        if !self.models.is_empty() {
            config.models = self.models.clone();
        }
        if !self.categories.is_empty() {
            config.categories = self.categories.iter().map(|c| c.to_string()).collect();
        }
        if !self.difficulties.is_empty() {
            config.difficulties = self.difficulties.iter().map(|d| d.to_string()).collect();
        }
        if let Some(output) = &self.output {
            config.results_dir = output.clone();
        }
        if let Some(strategy) = self.sandbox {
            config.sandbox.strategy = strategy;
        }
    }
}
