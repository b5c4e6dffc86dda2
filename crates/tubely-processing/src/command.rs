//! Bounded execution of external tools

use crate::error::ProcessingError;
use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;
use tokio::process::Command;

/// Validate that a tool path doesn't contain shell metacharacters or dangerous sequences
pub(crate) fn validate_tool_path(tool: &'static str, path: &str) -> Result<(), ProcessingError> {
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.is_empty() {
        return Err(ProcessingError::InvalidToolPath {
            tool,
            reason: "path is empty".to_string(),
        });
    }
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(ProcessingError::InvalidToolPath {
            tool,
            reason: format!("{} contains dangerous characters", path),
        });
    }
    Ok(())
}

/// Run `program` with `args`, capturing stdout and stderr.
///
/// The child is killed when `timeout` elapses. A non-zero exit status is returned as
/// [`ProcessingError::ToolFailed`] carrying the captured stderr.
pub(crate) async fn run_tool<I, S>(
    tool: &'static str,
    program: &str,
    args: I,
    timeout: Duration,
) -> Result<Output, ProcessingError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = match tokio::time::timeout(timeout, child).await {
        Ok(result) => result.map_err(|source| ProcessingError::ToolUnavailable { tool, source })?,
        Err(_) => return Err(ProcessingError::TimedOut { tool, timeout }),
    };

    if !output.status.success() {
        return Err(ProcessingError::ToolFailed {
            tool,
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    Ok(output)
}
