//! Configuration data types

use crate::error::{BenchError, BenchResult};
use crate::sandbox::SandboxConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Models benchmarked when neither the config file nor the environment names any
pub const DEFAULT_MODELS: &[&str] = &[
    "tngtech/deepseek-r1t2-chimera:free",
    "z-ai/glm-4.5-air:free",
    "nvidia/nemotron-3-nano-30b-a3b:free",
    "google/gemma-3-27b-it:free",
];

/// Top-level benchmark configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Directory of `*.toml` question files
    pub questions_dir: PathBuf,
    /// Directory reports are written to
    pub results_dir: PathBuf,
    /// Directory holding optional prompt template overrides
    pub prompts_dir: PathBuf,
    /// Model identifiers under test, in run order
    pub models: Vec<String>,
    /// Category filter (empty = all)
    pub categories: Vec<String>,
    /// Difficulty filter (empty = all)
    pub difficulties: Vec<String>,
    /// Question attempts in flight per model
    pub max_concurrency: usize,
    /// Tool rounds before the loop forces a final answer
    pub max_tool_iterations: usize,
    /// Completion endpoint settings
    pub provider: ProviderConfig,
    /// Code sandbox settings
    pub sandbox: SandboxConfig,
    /// Scoring settings
    pub evaluation: EvaluationConfig,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            questions_dir: PathBuf::from("questions"),
            results_dir: PathBuf::from("results"),
            prompts_dir: PathBuf::from("prompts"),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            categories: Vec::new(),
            difficulties: Vec::new(),
            max_concurrency: 3,
            max_tool_iterations: 10,
            provider: ProviderConfig::default(),
            sandbox: SandboxConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

impl BenchConfig {
    /// Check cross-field constraints that serde defaults cannot express
    pub fn validate(&self) -> BenchResult<()> {
        if self.max_concurrency == 0 {
            return Err(BenchError::config("max_concurrency must be at least 1"));
        }
        if self.sandbox.timeout.is_zero() {
            return Err(BenchError::config("sandbox.timeout must be greater than zero"));
        }
        if self.provider.base_url.trim().is_empty() {
            return Err(BenchError::config("provider.base_url must not be empty"));
        }
        for (name, weight) in [
            ("numeric_weight", self.evaluation.numeric_weight),
            ("explanation_weight", self.evaluation.explanation_weight),
        ] {
            if !(0.0..=1.0).contains(&weight) {
                return Err(BenchError::config(format!(
                    "evaluation.{} must be within [0, 1], got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// OpenAI-compatible endpoint settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Bearer token; usually supplied through `OPENROUTER_API_KEY`
    pub api_key: Option<String>,
    /// Base URL, `/chat/completions` is appended
    pub base_url: String,
    pub max_tokens: u32,
    pub temperature: f64,
    /// Per-request timeout
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    /// Optional `HTTP-Referer` attribution header
    pub http_referer: Option<String>,
    /// Optional `X-Title` attribution header
    pub app_title: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://openrouter.ai/api/v1".to_string(),
            max_tokens: 4096,
            temperature: 0.0,
            request_timeout: Duration::from_secs(120),
            http_referer: None,
            app_title: None,
        }
    }
}

impl ProviderConfig {
    /// API key if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Scoring settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Model that grades explanations
    pub judge_model: String,
    /// Fallback numeric weight for hybrid questions built without their own weights
    pub numeric_weight: f64,
    /// Fallback explanation weight for hybrid questions built without their own weights
    pub explanation_weight: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            judge_model: "tngtech/deepseek-r1t2-chimera:free".to_string(),
            numeric_weight: 0.7,
            explanation_weight: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BenchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.models.len(), 4);
        assert_eq!(config.max_concurrency, 3);
        assert_eq!(config.max_tool_iterations, 10);
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = BenchConfig {
            max_concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn test_weight_out_of_range_rejected() {
        let mut config = BenchConfig::default();
        config.evaluation.numeric_weight = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_api_key_is_none() {
        let provider = ProviderConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(provider.api_key(), None);
    }
}
