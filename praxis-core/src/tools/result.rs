//! Tool result and error model
//!
//! Every public execution surface in this crate returns a [`ToolResult`]
//! rather than unwinding: the agent loop upstream must never see a tool-use
//! request go unanswered. Errors carry a closed taxonomy code plus an
//! advisory retryability flag consumed by the retry layer.

use serde::{Deserialize, Serialize};

/// Result type for tool execution surfaces.
pub type ToolResult<T> = std::result::Result<T, ToolError>;

/// Closed error taxonomy for tool failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorCode {
    /// No static or MCP tool is registered under the requested name
    ToolNotFound,

    /// The tool rejected its arguments (client-class failure)
    ToolInvalidInput,

    /// The tool or its server cannot be reached (auth, disabled, transport)
    ToolUnavailable,

    /// The tool ran but failed, or the response was unusable
    ToolExecutionFailed,

    /// The server asked us to back off
    RateLimited,

    /// Connection-level failure reaching an MCP server
    McpConnectionFailed,
}

impl std::fmt::Display for ToolErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ToolErrorCode::ToolNotFound => "TOOL_NOT_FOUND",
            ToolErrorCode::ToolInvalidInput => "TOOL_INVALID_INPUT",
            ToolErrorCode::ToolUnavailable => "TOOL_UNAVAILABLE",
            ToolErrorCode::ToolExecutionFailed => "TOOL_EXECUTION_FAILED",
            ToolErrorCode::RateLimited => "RATE_LIMITED",
            ToolErrorCode::McpConnectionFailed => "MCP_CONNECTION_FAILED",
        };
        f.write_str(s)
    }
}

/// Structured tool error.
///
/// `retryable` is advisory to the retry layer, not binding: auth-class
/// failures are never retried regardless of the flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    /// Taxonomy code
    pub code: ToolErrorCode,

    /// Human-readable error message
    pub message: String,

    /// Whether the failure is likely transient
    pub retryable: bool,
}

impl ToolError {
    /// Create a new tool error
    pub fn new(code: ToolErrorCode, message: impl Into<String>, retryable: bool) -> Self {
        Self {
            code,
            message: message.into(),
            retryable,
        }
    }

    /// Create a not-found error for the given tool name
    pub fn not_found(tool_name: &str) -> Self {
        Self::new(
            ToolErrorCode::ToolNotFound,
            format!("No tool registered under '{}'", tool_name),
            false,
        )
    }

    /// Create an invalid-input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::ToolInvalidInput, message, false)
    }

    /// Create an unavailable error
    pub fn unavailable(message: impl Into<String>, retryable: bool) -> Self {
        Self::new(ToolErrorCode::ToolUnavailable, message, retryable)
    }

    /// Create an execution-failed error
    pub fn execution_failed(message: impl Into<String>, retryable: bool) -> Self {
        Self::new(ToolErrorCode::ToolExecutionFailed, message, retryable)
    }

    /// Create a rate-limited error
    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::RateLimited, message, true)
    }

    /// Create a connection-failed error
    pub fn connection_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorCode::McpConnectionFailed, message, true)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}
