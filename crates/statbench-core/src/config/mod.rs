//! Configuration management for statbench
//!
//! Layers, lowest precedence first: built-in defaults, an optional TOML file,
//! then environment variables.

mod env_loader;
mod model;

pub use env_loader::{apply_env_overrides, apply_overrides_from};
pub use model::{BenchConfig, DEFAULT_MODELS, EvaluationConfig, ProviderConfig};

use crate::error::{BenchError, BenchResult};
use std::path::Path;

/// Config file picked up from the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "statbench.toml";

/// Load configuration
///
/// With `None`, `statbench.toml` in the working directory is used if present.
/// An explicitly passed path must exist.
pub fn load_config(path: Option<&Path>) -> BenchResult<BenchConfig> {
    let mut config = match path {
        Some(path) => load_config_from_file(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load_config_from_file(default_path)?
            } else {
                BenchConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Parse a TOML config file without applying environment overrides
pub fn load_config_from_file(path: &Path) -> BenchResult<BenchConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        BenchError::config(format!(
            "Failed to read config file '{}': {}",
            path.display(),
            e
        ))
    })?;

    toml::from_str(&content).map_err(|e| {
        BenchError::config(format!(
            "Failed to parse TOML config '{}': {}",
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sandbox::SandboxStrategy;
    use std::io::Write;
    use std::time::Duration;

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
models = ["openai/gpt-4o-mini"]
max_concurrency = 2

[provider]
max_tokens = 1024

[sandbox]
strategy = "local"
timeout = "10s"

[evaluation]
judge_model = "judge/model"
"#
        )
        .unwrap();

        let config = load_config_from_file(file.path()).unwrap();
        assert_eq!(config.models, vec!["openai/gpt-4o-mini".to_string()]);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.max_tool_iterations, 10);
        assert_eq!(config.provider.max_tokens, 1024);
        assert_eq!(config.provider.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(config.sandbox.strategy, SandboxStrategy::Local);
        assert_eq!(config.sandbox.timeout, Duration::from_secs(10));
        assert_eq!(config.evaluation.judge_model, "judge/model");
        assert_eq!(config.evaluation.numeric_weight, 0.7);
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config(Some(&missing)).unwrap_err();
        assert!(matches!(err, BenchError::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "max_concurrency = \"three\"").unwrap();
        assert!(load_config_from_file(file.path()).is_err());
    }
}
