//! Same-host fallback strategy

use super::limits::{SINGLE_THREAD_ENV, apply_memory_limit};
use super::process::run_with_timeout;
use super::script::TempScript;
use super::validation::validate_code;
use super::{CodeSandbox, ExecutionResult, SandboxConfig};
use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

/// Runs the harness in a local interpreter subprocess
///
/// No network isolation. On unix the memory ceiling is enforced with `RLIMIT_DATA`.
pub struct LocalSandbox {
    config: SandboxConfig,
}

impl LocalSandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }
}

#[async_trait]
impl CodeSandbox for LocalSandbox {
    fn name(&self) -> &str {
        "local"
    }

    async fn execute(&self, code: &str) -> ExecutionResult {
        if let Err(err) = validate_code(code) {
            return ExecutionResult::rejected(err);
        }

        let script = match TempScript::write(code) {
            Ok(script) => script,
            Err(err) => return ExecutionResult::rejected(err),
        };

        let mut cmd = Command::new(&self.config.python);
        cmd.arg(script.path())
            .env("PYTHONDONTWRITEBYTECODE", "1")
            .env("PYTHONIOENCODING", "utf-8");
        for (key, value) in SINGLE_THREAD_ENV {
            cmd.env(key, value);
        }
        apply_memory_limit(&mut cmd, self.config.memory_limit_bytes());

        debug!(python = %self.config.python, script = %script.path().display(), "running snippet locally");

        // `script` stays alive until the child has finished
        let outcome = run_with_timeout(cmd, self.config.timeout, self.config.max_output_bytes).await;
        drop(script);

        match outcome {
            Ok(output) => ExecutionResult::from_process(output, self.config.timeout),
            Err(err) => ExecutionResult::rejected(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn sandbox() -> LocalSandbox {
        LocalSandbox::new(SandboxConfig::default().with_timeout(Duration::from_secs(60)))
    }

    #[tokio::test]
    async fn test_denylisted_code_never_spawns() {
        // A bogus interpreter would fail to spawn, so a validation error proves nothing ran
        let mut config = SandboxConfig::default();
        config.python = "no-such-python-binary".to_string();
        let sandbox = LocalSandbox::new(config);

        let result = sandbox.execute("import os\nos.listdir('.')").await;
        assert!(!result.success);
        assert!(!result.timed_out);
        assert_eq!(result.error.as_deref(), Some("Disallowed operation: import os"));
    }

    #[tokio::test]
    async fn test_empty_code_rejected() {
        let result = sandbox().execute("   ").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("No code provided"));
    }

    #[tokio::test]
    async fn test_missing_interpreter_is_failed_result() {
        let mut config = SandboxConfig::default();
        config.python = "no-such-python-binary".to_string();
        let result = LocalSandbox::new(config).execute("print(1)").await;
        assert!(!result.success);
        assert!(result.error.unwrap_or_default().contains("spawn"));
    }

    fn numeric_stack_available() -> bool {
        std::process::Command::new("python3")
            .args(["-c", "import numpy, scipy, pandas, statsmodels"])
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    #[tokio::test]
    async fn test_numeric_stack_imports_under_default_limits() {
        if !numeric_stack_available() {
            eprintln!("skipping: python3 with numpy, scipy, pandas and statsmodels not found");
            return;
        }

        let sandbox = LocalSandbox::new(SandboxConfig::default());
        let result = sandbox
            .execute("import scipy.stats\nprint(float(np.median(scipy.stats.norm.ppf([0.25, 0.5, 0.75]))))")
            .await;
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.output, "0.0");
    }

    #[tokio::test]
    #[ignore = "requires python3 with numpy, scipy, pandas and statsmodels"]
    async fn test_prints_result() {
        let result = sandbox().execute("print(round(stats.norm.ppf(0.975), 2))").await;
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.output, "1.96");
    }

    #[tokio::test]
    #[ignore = "requires python3 with numpy, scipy, pandas and statsmodels"]
    async fn test_exception_surfaces_type_and_message() {
        let result = sandbox().execute("raise ValueError('bad input')").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Error: ValueError: bad input"));
    }

    #[tokio::test]
    #[ignore = "requires python3 with numpy, scipy, pandas and statsmodels"]
    async fn test_timeout_reported() {
        let sandbox = LocalSandbox::new(SandboxConfig::default().with_timeout(Duration::from_secs(3)));
        let result = sandbox.execute("while True:\n    pass").await;
        assert!(result.timed_out);
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Execution timed out after 3s"));
    }

    #[tokio::test]
    #[ignore = "requires python3 with numpy, scipy, pandas and statsmodels"]
    async fn test_memory_ceiling_enforced() {
        let sandbox = LocalSandbox::new(
            SandboxConfig::default()
                .with_timeout(Duration::from_secs(60))
                .with_memory_limit_mb(512),
        );
        let result = sandbox.execute("x = np.ones(2_000_000_000)\nprint(x.sum())").await;
        assert!(!result.success);
        assert!(result.error.unwrap_or_default().contains("MemoryError"));
    }
}
