//! Static denylist gate for submitted snippets
//!
//! This is a conservative textual filter, not a security boundary. It rejects the
//! obvious ways a snippet could touch the filesystem, spawn processes, import
//! modules dynamically or exit the interpreter. A determined snippet can still get
//! around a substring check. Actual containment comes from the process or container
//! the snippet runs in.

use super::SandboxError;

/// Substrings that make a snippet ineligible for execution, matched case-insensitively
pub const DISALLOWED_PATTERNS: &[&str] = &[
    "os.system",
    "subprocess",
    "__import__",
    "open(",
    "file(",
    "input(",
    "quit(",
    "exit(",
    "os.remove",
    "os.unlink",
    "shutil.rmtree",
    "import os",
    "from os",
    "eval(",
    "exec(",
];

/// Reject empty snippets and snippets that contain a disallowed pattern
pub fn validate_code(code: &str) -> Result<(), SandboxError> {
    if code.trim().is_empty() {
        return Err(SandboxError::EmptyCode);
    }

    let lowered = code.to_lowercase();
    if let Some(pattern) = DISALLOWED_PATTERNS
        .iter()
        .find(|pattern| lowered.contains(*pattern))
    {
        return Err(SandboxError::DisallowedOperation {
            pattern: (*pattern).to_string(),
        });
    }

    Ok(())
}
