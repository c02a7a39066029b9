//! Container-isolated strategy driven through the `docker` CLI

use super::process::run_with_timeout;
use super::script::TempScript;
use super::validation::validate_code;
use super::{CodeSandbox, ExecutionResult, SandboxConfig, SandboxError};
use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::sync::OnceCell;
use tokio::time::timeout;
use tracing::{debug, info, warn};

const DOCKER: &str = "docker";

/// Image builds can take minutes on a cold cache
const BUILD_TIMEOUT: Duration = Duration::from_secs(900);

const CONTROL_TIMEOUT: Duration = Duration::from_secs(30);

const SANDBOX_PACKAGES: &str = "numpy scipy statsmodels pandas";

/// Runs the harness in a throwaway, network-disabled container
///
/// The image is built on first use. The build is guarded per instance, so
/// concurrent first calls wait for one build instead of racing. A failed build
/// leaves the guard unset and the next call tries again.
pub struct ContainerSandbox {
    config: SandboxConfig,
    image_ready: OnceCell<()>,
}

impl ContainerSandbox {
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            config,
            image_ready: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Whether the image has been confirmed or built by this instance
    pub fn is_ready(&self) -> bool {
        self.image_ready.initialized()
    }

    /// Make sure the sandbox image exists, building it at most once at a time
    pub async fn ensure_image(&self) -> Result<(), SandboxError> {
        self.image_ready
            .get_or_try_init(|| async {
                if self.image_exists().await {
                    debug!(image = %self.config.image, "sandbox image already present");
                    return Ok(());
                }
                self.build_image().await
            })
            .await
            .map(|_| ())
    }

    async fn image_exists(&self) -> bool {
        let mut cmd = Command::new(DOCKER);
        cmd.args(["image", "inspect", &self.config.image])
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        matches!(
            timeout(CONTROL_TIMEOUT, cmd.status()).await,
            Ok(Ok(status)) if status.success()
        )
    }

    async fn build_image(&self) -> Result<(), SandboxError> {
        info!(image = %self.config.image, base = %self.config.base_image, "building sandbox image");

        let mut child = Command::new(DOCKER)
            .args(["build", "-t", &self.config.image, "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SandboxError::ImageUnavailable(format!("docker build: {}", e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(self.dockerfile().as_bytes())
                .await
                .map_err(|e| SandboxError::ImageUnavailable(format!("writing Dockerfile: {}", e)))?;
        }

        let output = timeout(BUILD_TIMEOUT, child.wait_with_output())
            .await
            .map_err(|_| SandboxError::ImageUnavailable("docker build timed out".to_string()))?
            .map_err(|e| SandboxError::ImageUnavailable(e.to_string()))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SandboxError::ImageUnavailable(stderr.trim().to_string()));
        }

        info!(image = %self.config.image, "sandbox image built");
        Ok(())
    }

    fn dockerfile(&self) -> String {
        format!(
            "FROM {}\nRUN pip install --no-cache-dir {}\nWORKDIR /app\n",
            self.config.base_image, SANDBOX_PACKAGES
        )
    }

    fn run_args(&self, container_name: &str, script_path: &str) -> Vec<String> {
        let memory = format!("{}m", self.config.memory_limit_mb);
        vec![
            "run".to_string(),
            "--rm".to_string(),
            "--name".to_string(),
            container_name.to_string(),
            "--network".to_string(),
            "none".to_string(),
            "--memory".to_string(),
            memory.clone(),
            "--memory-swap".to_string(),
            memory,
            "--pids-limit".to_string(),
            "64".to_string(),
            "-e".to_string(),
            "OPENBLAS_NUM_THREADS=1".to_string(),
            "-v".to_string(),
            format!("{}:/app/script.py:ro", script_path),
            self.config.image.clone(),
            "python".to_string(),
            "/app/script.py".to_string(),
        ]
    }

    async fn kill_container(&self, container_name: &str) {
        let mut cmd = Command::new(DOCKER);
        cmd.args(["kill", container_name])
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        if !matches!(timeout(CONTROL_TIMEOUT, cmd.status()).await, Ok(Ok(status)) if status.success()) {
            debug!(container = container_name, "container already gone or kill failed");
        }
    }
}

#[async_trait]
impl CodeSandbox for ContainerSandbox {
    fn name(&self) -> &str {
        "container"
    }

    async fn execute(&self, code: &str) -> ExecutionResult {
        if let Err(err) = validate_code(code) {
            return ExecutionResult::rejected(err);
        }

        if let Err(err) = self.ensure_image().await {
            warn!(error = %err, "sandbox image unavailable");
            return ExecutionResult::rejected(err);
        }

        let script = match TempScript::write(code) {
            Ok(script) => script,
            Err(err) => return ExecutionResult::rejected(err),
        };

        let container_name = format!("statbench-{}", uuid::Uuid::new_v4().simple());
        let mut cmd = Command::new(DOCKER);
        cmd.args(self.run_args(&container_name, &script.path().to_string_lossy()));

        debug!(container = %container_name, "running snippet in container");
        let outcome = run_with_timeout(cmd, self.config.timeout, self.config.max_output_bytes).await;

        if matches!(&outcome, Ok(output) if output.timed_out) {
            self.kill_container(&container_name).await;
        }
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

    #[test]
    fn test_run_args_isolate_container() {
        let sandbox = ContainerSandbox::new(SandboxConfig::default().with_memory_limit_mb(256));
        let args = sandbox.run_args("statbench-abc", "/tmp/x.py");
        let joined = args.join(" ");
        assert!(joined.contains("--rm"));
        assert!(joined.contains("--network none"));
        assert!(joined.contains("--memory 256m"));
        assert!(joined.contains("-v /tmp/x.py:/app/script.py:ro"));
        assert!(joined.ends_with("statbench-sandbox:latest python /app/script.py"));
    }

    #[test]
    fn test_dockerfile_uses_base_image() {
        let sandbox = ContainerSandbox::new(SandboxConfig::default());
        let dockerfile = sandbox.dockerfile();
        assert!(dockerfile.starts_with("FROM python:3.11-slim\n"));
        assert!(dockerfile.contains("statsmodels"));
    }

    #[tokio::test]
    async fn test_validation_happens_before_image_check() {
        let sandbox = ContainerSandbox::new(SandboxConfig::default());
        let result = sandbox.execute("import os").await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Disallowed operation: import os"));
        assert!(!sandbox.is_ready());
    }

    #[tokio::test]
    #[ignore = "requires a docker daemon"]
    async fn test_runs_in_container() {
        let sandbox = ContainerSandbox::new(SandboxConfig::default());
        let result = sandbox.execute("print(np.mean([1, 2, 3]))").await;
        assert!(result.success, "{:?}", result.error);
        assert_eq!(result.output, "2.0");
        assert!(sandbox.is_ready());
    }
}
