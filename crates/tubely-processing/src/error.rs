use std::path::PathBuf;
use std::time::Duration;

/// Errors raised while running an external media tool
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Invalid {tool} path: {reason}")]
    InvalidToolPath { tool: &'static str, reason: String },

    #[error("Failed to execute {tool}: {source}")]
    ToolUnavailable {
        tool: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: String,
        stderr: String,
    },

    #[error("{tool} timed out after {timeout:?}")]
    TimedOut {
        tool: &'static str,
        timeout: Duration,
    },

    #[error("Invalid tool output: {0}")]
    InvalidOutput(String),

    #[error("No video stream found")]
    NoVideoStream,

    #[error("Output file {0} is missing or empty")]
    EmptyOutput(PathBuf),
}
