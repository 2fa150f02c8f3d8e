//! Deadline wrapper for tool execution
//!
//! Runs an operation against a deadline and always resolves to a
//! [`ToolResult`]. Each invocation gets its own cancellation token; when a
//! caller supplies an outer token, the per-invocation token is created as
//! its child so either source can cancel the same call independently.

use crate::tools::{ToolError, ToolResult};
use std::future::Future;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Run `operation` with a deadline.
///
/// The operation receives a fresh cancellation token. If the timer wins,
/// the token is cancelled (stopping any work the operation linked to it)
/// and the call resolves to a retryable execution failure whose message
/// states the elapsed deadline. The timer is dropped on whichever branch
/// wins.
pub async fn with_timeout<T, F, Fut>(
    limit: Duration,
    parent: Option<&CancellationToken>,
    operation: F,
) -> ToolResult<T>
where
    F: FnOnce(CancellationToken) -> Fut,
    Fut: Future<Output = ToolResult<T>>,
{
    let token = match parent {
        Some(parent) => parent.child_token(),
        None => CancellationToken::new(),
    };
    let guard = token.clone();

    match tokio::time::timeout(limit, operation(token)).await {
        Ok(outcome) => outcome,
        Err(_) => {
            guard.cancel();
            Err(ToolError::execution_failed(
                format!("Timeout after {}ms", limit.as_millis()),
                true,
            ))
        }
    }
}
