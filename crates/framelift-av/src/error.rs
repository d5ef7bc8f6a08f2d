//! Error types for framelift-av.

use crate::tools::Tool;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the external tools.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external artifact is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: Tool },

    /// An external command exited unsuccessfully.
    #[error("command failed: {program}: {output}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    /// Frame-rate probing failed.
    #[error("probe failed: {message}")]
    Probe { message: String },

    /// Workspace error.
    #[error("workspace error: {0}")]
    Workspace(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: Tool) -> Self {
        Self::ToolNotFound { tool }
    }

    /// Create a command failed error.
    pub fn command_failed(
        program: impl Into<String>,
        code: Option<i32>,
        output: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            program: program.into(),
            code,
            output: output.into(),
        }
    }

    /// Create a probe error.
    pub fn probe(message: impl Into<String>) -> Self {
        Self::Probe {
            message: message.into(),
        }
    }

    /// Create a workspace error.
    pub fn workspace(message: impl Into<String>) -> Self {
        Self::Workspace(message.into())
    }
}
