//! Failure classification and model-facing error rendering
//!
//! Maps arbitrary failure text and MCP error payloads onto the closed
//! [`ToolErrorCode`] taxonomy, decides retryability, and renders the short
//! advisory sentence the calling model sees instead of stack traces or raw
//! HTTP statuses.

use crate::mcp::ToolCallResult;
use crate::tools::{ToolError, ToolErrorCode};

/// Substrings indicating a connection-level failure.
const CONNECTION_MARKERS: [&str; 6] = [
    "connection refused",
    "connection reset",
    "connect error",
    "failed to connect",
    "dns",
    "name resolution",
];

/// Classify free-text failure messages into the taxonomy.
///
/// Total over any input; evaluated in precedence order.
pub fn classify_message(message: &str) -> ToolError {
    let lower = message.to_lowercase();

    if lower.contains("429") || lower.contains("rate limit") {
        return ToolError::rate_limited(message);
    }

    if lower.contains("timeout") || lower.contains("timed out") || lower.contains("aborted") {
        return ToolError::execution_failed(message, true);
    }

    if CONNECTION_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return ToolError::connection_failed(message);
    }

    if lower.contains("401") || lower.contains("403") {
        return ToolError::unavailable(message, false);
    }

    if lower.contains("400") || lower.contains("404") {
        return ToolError::invalid_input(message);
    }

    // Fallback: execution failure with a transience probe over the text.
    let retryable = lower.contains("temporar")
        || lower.contains("unavailable")
        || lower.contains("try again");
    ToolError::execution_failed(message, retryable)
}

/// Convert an MCP `isError: true` payload into a tool error.
///
/// The server answered the transport successfully but the tool itself
/// failed; the joined text blocks become the message.
pub fn error_from_call_result(result: &ToolCallResult) -> ToolError {
    let message = result
        .joined_text()
        .unwrap_or_else(|| "Tool reported an unspecified error".to_string());
    ToolError::execution_failed(message, false)
}

/// Decide whether a failure should be retried.
///
/// The `retryable` flag is advisory; a message carrying a client/auth-class
/// status digit sequence vetoes it. The substring match is deliberately
/// blunt so imprecisely-classified upstream errors still don't get retried;
/// it can misfire on incidental digit runs (a port number, say), which is
/// accepted for parity with the behavior it preserves.
pub fn should_retry(error: &ToolError) -> bool {
    if !error.retryable {
        return false;
    }
    const NO_RETRY_MARKERS: [&str; 4] = ["400", "401", "403", "404"];
    !NO_RETRY_MARKERS
        .iter()
        .any(|marker| error.message.contains(marker))
}

/// Render a one-sentence, tool-name-qualified advisory for the model.
///
/// The model uses this to decide whether to retry, rephrase, or give up;
/// it never sees raw statuses or stack traces.
pub fn format_error_for_model(tool_name: &str, error: &ToolError) -> String {
    match error.code {
        ToolErrorCode::ToolNotFound => {
            format!("There is no tool named `{}` available right now.", tool_name)
        }
        ToolErrorCode::ToolInvalidInput => format!(
            "The `{}` tool rejected the input it was given. Check the arguments and try again.",
            tool_name
        ),
        ToolErrorCode::ToolUnavailable => format!(
            "The `{}` tool is not available right now. It may be disabled or misconfigured.",
            tool_name
        ),
        ToolErrorCode::ToolExecutionFailed => format!(
            "The `{}` tool failed to complete: {}",
            tool_name, error.message
        ),
        ToolErrorCode::RateLimited => format!(
            "The `{}` tool is rate limited right now. Please wait a bit and try again.",
            tool_name
        ),
        ToolErrorCode::McpConnectionFailed => format!(
            "Could not reach the server behind the `{}` tool. Please try again later.",
            tool_name
        ),
    }
}
