//! Environment variable overrides

use super::model::BenchConfig;
use crate::error::{BenchError, BenchResult};
use crate::sandbox::SandboxStrategy;
use std::str::FromStr;
use std::time::Duration;

/// Apply overrides from the process environment
///
/// Supports the `OPENROUTER_` prefix for endpoint settings and the
/// `STATBENCH_` prefix for everything else.
pub fn apply_env_overrides(config: &mut BenchConfig) -> BenchResult<()> {
    apply_overrides_from(config, |key| std::env::var(key).ok())
}

/// Apply overrides from an arbitrary variable lookup
pub fn apply_overrides_from<F>(config: &mut BenchConfig, lookup: F) -> BenchResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_key) = lookup("OPENROUTER_API_KEY") {
        config.provider.api_key = Some(api_key);
    }
    if let Some(base_url) = lookup("OPENROUTER_BASE_URL") {
        config.provider.base_url = base_url;
    }
    if let Some(value) = lookup("OPENROUTER_MAX_TOKENS") {
        config.provider.max_tokens = parse_var("OPENROUTER_MAX_TOKENS", &value)?;
    }
    if let Some(value) = lookup("OPENROUTER_TEMPERATURE") {
        config.provider.temperature = parse_var("OPENROUTER_TEMPERATURE", &value)?;
    }

    if let Some(judge) = lookup("STATBENCH_JUDGE_MODEL") {
        config.evaluation.judge_model = judge;
    }
    if let Some(value) = lookup("STATBENCH_SANDBOX") {
        config.sandbox.strategy = SandboxStrategy::from_str(&value).map_err(BenchError::config)?;
    }
    if let Some(value) = lookup("STATBENCH_SANDBOX_TIMEOUT_SECS") {
        let secs: u64 = parse_var("STATBENCH_SANDBOX_TIMEOUT_SECS", &value)?;
        config.sandbox.timeout = Duration::from_secs(secs);
    }
    if let Some(value) = lookup("STATBENCH_MODELS") {
        let models: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();
        if !models.is_empty() {
            config.models = models;
        }
    }

    Ok(())
}

fn parse_var<T: FromStr>(name: &str, value: &str) -> BenchResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BenchError::config(format!("Invalid {} value: '{}'", name, value)))
}
