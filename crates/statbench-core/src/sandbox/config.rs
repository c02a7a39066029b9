//! Sandbox configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which execution strategy a run should use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SandboxStrategy {
    /// Probe for a container runtime, fall back to a local subprocess
    #[default]
    Auto,
    /// Always run snippets in a throwaway container
    Container,
    /// Always run snippets in a local resource-limited subprocess
    Local,
}

impl fmt::Display for SandboxStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SandboxStrategy::Auto => write!(f, "auto"),
            SandboxStrategy::Container => write!(f, "container"),
            SandboxStrategy::Local => write!(f, "local"),
        }
    }
}

impl FromStr for SandboxStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(SandboxStrategy::Auto),
            "container" | "docker" => Ok(SandboxStrategy::Container),
            "local" => Ok(SandboxStrategy::Local),
            other => Err(format!(
                "unknown sandbox strategy '{}' (expected auto, container or local)",
                other
            )),
        }
    }
}

/// Sandbox configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Execution strategy
    pub strategy: SandboxStrategy,

    /// Wall-clock limit per snippet
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Memory ceiling per snippet in megabytes
    pub memory_limit_mb: u64,

    /// Image tag the container strategy builds and runs
    pub image: String,

    /// Base image the sandbox image is built from
    pub base_image: String,

    /// Interpreter used by the local strategy
    pub python: String,

    /// Captured stdout/stderr beyond this many bytes is truncated
    pub max_output_bytes: usize,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            strategy: SandboxStrategy::Auto,
            timeout: Duration::from_secs(30),
            memory_limit_mb: 512,
            image: "statbench-sandbox:latest".to_string(),
            base_image: "python:3.11-slim".to_string(),
            python: "python3".to_string(),
            max_output_bytes: 1024 * 1024,
        }
    }
}

impl SandboxConfig {
    /// Memory ceiling in bytes
    pub fn memory_limit_bytes(&self) -> u64 {
        self.memory_limit_mb.saturating_mul(1024 * 1024)
    }

    /// Set the execution strategy
    pub fn with_strategy(mut self, strategy: SandboxStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the per-snippet timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the memory ceiling
    pub fn with_memory_limit_mb(mut self, memory_limit_mb: u64) -> Self {
        self.memory_limit_mb = memory_limit_mb;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SandboxConfig::default();
        assert_eq!(config.strategy, SandboxStrategy::Auto);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.memory_limit_bytes(), 512 * 1024 * 1024);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Docker".parse::<SandboxStrategy>(), Ok(SandboxStrategy::Container));
        assert_eq!(" local ".parse::<SandboxStrategy>(), Ok(SandboxStrategy::Local));
        assert!("podman".parse::<SandboxStrategy>().is_err());
    }

    #[test]
    fn test_humantime_timeout_from_toml() {
        let config: SandboxConfig = toml::from_str("timeout = \"5s\"\nstrategy = \"local\"").unwrap();
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.strategy, SandboxStrategy::Local);
        assert_eq!(config.memory_limit_mb, 512);
    }
}
