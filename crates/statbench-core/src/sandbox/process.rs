//! Child process supervision shared by both strategies

use super::SandboxError;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// How long to wait for pipe readers after killing a timed-out child
const DRAIN_GRACE: Duration = Duration::from_secs(2);

const TRUNCATION_MARKER: &str = "\n... (output truncated due to size limit)";

/// Raw outcome of one supervised child
#[derive(Debug, Clone)]
pub(crate) struct ProcessOutput {
    /// Exit code, `None` when killed by a signal or on timeout
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
    pub timed_out: bool,
    pub duration: Duration,
}

/// Spawn `cmd`, collect its output and kill it if it outlives `timeout_duration`
pub(crate) async fn run_with_timeout(
    mut cmd: Command,
    timeout_duration: Duration,
    max_output_bytes: usize,
) -> Result<ProcessOutput, SandboxError> {
    let start = Instant::now();

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| SandboxError::SpawnFailed(e.to_string()))?;

    let stdout_handle = child.stdout.take();
    let stderr_handle = child.stderr.take();

    let stdout_task = tokio::spawn(async move {
        match stdout_handle {
            Some(stdout) => read_output_limited(stdout, max_output_bytes).await,
            None => String::new(),
        }
    });
    let stderr_task = tokio::spawn(async move {
        match stderr_handle {
            Some(stderr) => read_output_limited(stderr, max_output_bytes).await,
            None => String::new(),
        }
    });

    let (exit_code, timed_out) = match timeout(timeout_duration, child.wait()).await {
        Ok(Ok(status)) => (status.code(), false),
        Ok(Err(e)) => {
            return Err(SandboxError::Internal(format!("Process wait failed: {}", e)));
        }
        Err(_) => {
            tracing::debug!(timeout = ?timeout_duration, "killing sandboxed process");
            let _ = child.kill().await;
            (None, true)
        }
    };

    let (stdout, stderr) = if timed_out {
        (
            drain_or_abort(stdout_task, DRAIN_GRACE).await,
            drain_or_abort(stderr_task, DRAIN_GRACE).await,
        )
    } else {
        (
            stdout_task.await.unwrap_or_default(),
            stderr_task.await.unwrap_or_default(),
        )
    };

    Ok(ProcessOutput {
        exit_code,
        stdout,
        stderr,
        timed_out,
        duration: start.elapsed(),
    })
}

/// Wait up to `grace` for a pipe reader, then cancel it
///
/// A grandchild that inherited the pipe can keep it open after the child is killed.
async fn drain_or_abort(mut task: JoinHandle<String>, grace: Duration) -> String {
    match timeout(grace, &mut task).await {
        Ok(joined) => joined.unwrap_or_default(),
        Err(_) => {
            task.abort();
            String::new()
        }
    }
}

/// Read a pipe to EOF, keeping at most `max_bytes`
///
/// Bytes past the limit are drained and discarded so the child never blocks on a
/// full pipe.
async fn read_output_limited<R: AsyncRead + Unpin>(mut reader: R, max_bytes: usize) -> String {
    let mut kept = Vec::new();
    let mut truncated = false;
    let mut chunk = [0u8; 8192];

    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                let room = max_bytes.saturating_sub(kept.len());
                if n > room {
                    truncated = true;
                }
                kept.extend_from_slice(&chunk[..n.min(room)]);
            }
            Err(_) => break,
        }
    }

    let mut output = String::from_utf8_lossy(&kept).into_owned();
    if truncated {
        output.push_str(TRUNCATION_MARKER);
    }
    output
}
