//! Harness script rendering and temp-file lifetime

use super::SandboxError;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Libraries pre-bound in the snippet's globals
pub const PRELUDE_LIBRARIES: &str = "numpy (np), scipy.stats (stats), pandas (pd), math, \
statsmodels power analysis (TTestIndPower, NormalIndPower, tt_ind_solve_power) and \
proportion helpers (proportion_effectsize, proportions_ztest)";

const HARNESS_HEAD: &str = r#"import contextlib
import io
import math
import sys

import numpy as np
import pandas as pd
import scipy.stats as stats
from statsmodels.stats.power import NormalIndPower, TTestIndPower, tt_ind_solve_power
from statsmodels.stats.proportion import proportion_effectsize, proportions_ztest

"#;

const HARNESS_TAIL: &str = r#"
_globals = {
    "__name__": "__main__",
    "np": np,
    "pd": pd,
    "stats": stats,
    "math": math,
    "TTestIndPower": TTestIndPower,
    "NormalIndPower": NormalIndPower,
    "tt_ind_solve_power": tt_ind_solve_power,
    "proportion_effectsize": proportion_effectsize,
    "proportions_ztest": proportions_ztest,
}
_stdout = io.StringIO()
_stderr = io.StringIO()
try:
    with contextlib.redirect_stdout(_stdout), contextlib.redirect_stderr(_stderr):
        exec(compile(_code, "<snippet>", "exec"), _globals)
except BaseException as _exc:
    sys.__stdout__.write(_stdout.getvalue())
    sys.__stderr__.write("Error: %s: %s\n" % (type(_exc).__name__, _exc))
    sys.__stderr__.flush()
    sys.exit(1)
sys.__stdout__.write(_stdout.getvalue())
"#;

/// Wrap a snippet in the harness
///
/// The snippet travels as a JSON string literal, which Python parses as an
/// ordinary string, so quotes inside the snippet cannot terminate it early.
pub fn render_harness(code: &str) -> Result<String, SandboxError> {
    let literal = serde_json::to_string(code)
        .map_err(|e| SandboxError::Internal(format!("Failed to encode snippet: {}", e)))?;

    let mut script = String::with_capacity(HARNESS_HEAD.len() + literal.len() + HARNESS_TAIL.len() + 16);
    script.push_str(HARNESS_HEAD);
    script.push_str("_code = ");
    script.push_str(&literal);
    script.push('\n');
    script.push_str(HARNESS_TAIL);
    Ok(script)
}

/// A harness script on disk, removed when dropped
pub struct TempScript {
    file: NamedTempFile,
}

impl TempScript {
    /// Render the harness around `code` and write it to a fresh temp file
    pub fn write(code: &str) -> Result<Self, SandboxError> {
        let script = render_harness(code)?;
        let mut file = tempfile::Builder::new()
            .prefix("statbench-")
            .suffix(".py")
            .tempfile()
            .map_err(|e| SandboxError::Io(format!("Failed to create script file: {}", e)))?;
        file.write_all(script.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| SandboxError::Io(format!("Failed to write script file: {}", e)))?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snippet_embedded_as_literal() {
        let script = render_harness("print(\"\"\"hi\"\"\")\nx = '\\n'").unwrap();
        assert!(script.contains(r#"_code = "print(\"\"\"hi\"\"\")\nx = '\\n'""#));
        assert!(script.contains("exec(compile(_code"));
        assert!(script.starts_with("import contextlib"));
    }

    #[test]
    fn test_temp_script_removed_on_drop() {
        let script = TempScript::write("print(1)").unwrap();
        let path = script.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("py"));
        drop(script);
        assert!(!path.exists());
    }
}
