//! Sandboxed execution of model-written Python snippets
//!
//! Both strategies share one contract: [`CodeSandbox::execute`] never fails, it
//! folds validation, spawn, runtime and timeout failures into an
//! [`ExecutionResult`]. Every snippet is first checked against a textual denylist
//! (see [`validation`]), then wrapped in a harness that pre-imports the allowed
//! numeric libraries and returns captured stdout as the only output channel.

mod config;
mod container;
mod limits;
mod local;
mod process;
mod script;
pub mod validation;

pub use config::{SandboxConfig, SandboxStrategy};
pub use container::ContainerSandbox;
pub use local::LocalSandbox;
pub use script::{PRELUDE_LIBRARIES, TempScript, render_harness};
pub use validation::{DISALLOWED_PATTERNS, validate_code};

use async_trait::async_trait;
use process::ProcessOutput;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::info;

/// Errors raised inside a sandbox before or around execution
#[derive(Debug, Clone, thiserror::Error)]
pub enum SandboxError {
    #[error("No code provided")]
    EmptyCode,

    #[error("Disallowed operation: {pattern}")]
    DisallowedOperation { pattern: String },

    #[error("Failed to spawn sandboxed process: {0}")]
    SpawnFailed(String),

    #[error("Sandbox image unavailable: {0}")]
    ImageUnavailable(String),

    #[error("Sandbox IO error: {0}")]
    Io(String),

    #[error("Sandbox internal error: {0}")]
    Internal(String),
}

/// Outcome of running one snippet
///
/// `timed_out` implies `!success`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    pub success: bool,
    /// Captured stdout, trimmed
    pub output: String,
    pub error: Option<String>,
    pub timed_out: bool,
}

impl ExecutionResult {
    pub fn succeeded(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
            timed_out: false,
        }
    }

    pub fn failed(output: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
            error: Some(error.into()),
            timed_out: false,
        }
    }

    pub fn timeout(limit: Duration) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(format!(
                "Execution timed out after {}",
                humantime_serde::re::humantime::format_duration(limit)
            )),
            timed_out: true,
        }
    }

    /// A snippet that never ran or whose runner could not be started
    pub fn rejected(error: SandboxError) -> Self {
        Self::failed(String::new(), error.to_string())
    }

    pub(crate) fn from_process(output: ProcessOutput, limit: Duration) -> Self {
        if output.timed_out {
            return Self::timeout(limit);
        }

        let stdout = output.stdout.trim().to_string();
        match output.exit_code {
            Some(0) => Self::succeeded(stdout),
            code => {
                let stderr = output.stderr.trim();
                let error = if !stderr.is_empty() {
                    stderr.to_string()
                } else {
                    match code {
                        Some(137) => "Process killed (exit 137), memory limit likely exceeded".to_string(),
                        Some(code) => format!("Process exited with status {}", code),
                        None => "Process terminated by signal".to_string(),
                    }
                };
                Self::failed(stdout, error)
            }
        }
    }
}

/// A strategy for running snippets in isolation
#[async_trait]
pub trait CodeSandbox: Send + Sync {
    /// Strategy name, used in logs
    fn name(&self) -> &str;

    /// Run one snippet
    async fn execute(&self, code: &str) -> ExecutionResult;
}

/// Pick the strategy for this run
///
/// `auto` checks for a reachable docker daemon and falls back to the local strategy.
pub async fn select_sandbox(config: &SandboxConfig) -> Arc<dyn CodeSandbox> {
    match config.strategy {
        SandboxStrategy::Container => Arc::new(ContainerSandbox::new(config.clone())),
        SandboxStrategy::Local => Arc::new(LocalSandbox::new(config.clone())),
        SandboxStrategy::Auto => {
            if container_runtime_available().await {
                info!("docker daemon reachable, using container sandbox");
                Arc::new(ContainerSandbox::new(config.clone()))
            } else {
                info!("docker unavailable, using local sandbox");
                Arc::new(LocalSandbox::new(config.clone()))
            }
        }
    }
}

/// Whether `docker version` can reach a daemon
pub async fn container_runtime_available() -> bool {
    let mut cmd = Command::new("docker");
    cmd.args(["version", "--format", "{{.Server.Version}}"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    matches!(
        timeout(Duration::from_secs(5), cmd.status()).await,
        Ok(Ok(status)) if status.success()
    )
}
