//! Public entry point for tool execution
//!
//! Composes retry around timeout around the injected route function, runs
//! the whole call inside a tracing span, and renders the outcome into the
//! string the calling model consumes. Every code path resolves to a
//! [`ToolResult`]; a tool-use request is never left unanswered.

use super::classify::format_error_for_model;
use super::retry::{RetryPolicy, with_retry};
use super::router::RouteRequest;
use super::timeout::with_timeout;
use crate::tools::{ToolError, ToolResult};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

/// Options for one execution.
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Per-call deadline
    pub timeout: Duration,

    /// Attempt budget including the first call
    pub max_attempts: usize,

    /// Correlation id; generated when absent
    pub trace_id: Option<String>,

    /// Caller-supplied cancellation for the whole execution
    pub cancel: Option<CancellationToken>,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_attempts: 3,
            trace_id: None,
            cancel: None,
        }
    }
}

impl ExecuteOptions {
    /// Create default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-call deadline
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the attempt budget
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Set the trace id
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Set the caller-supplied cancellation token
    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }
}

/// Execute a tool call through the hardened pipeline.
///
/// `route` is invoked once per attempt with a fresh cancellation token and
/// must resolve the call against the registry or an MCP server; the
/// [`Router`](super::Router) provides the production implementation. On
/// success the payload is rendered for the model: the text of MCP `content`
/// blocks joined with newlines when present, the JSON encoding otherwise.
/// On failure the error message is rewritten into a short advisory
/// sentence.
pub async fn execute<F, Fut>(
    tool_name: &str,
    tool_use_id: &str,
    args: Value,
    route: F,
    options: ExecuteOptions,
) -> ToolResult<String>
where
    F: Fn(RouteRequest) -> Fut + Send + Sync,
    Fut: Future<Output = ToolResult<Value>> + Send,
{
    let trace_id = options
        .trace_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
    let args_hash = hash_args(&args);

    let span = tracing::info_span!(
        "tool_execute",
        tool = %tool_name,
        tool_use_id = %tool_use_id,
        trace_id = %trace_id,
        args_hash = %args_hash,
    );

    async {
        let started = Instant::now();
        let attempts = AtomicUsize::new(1);
        let policy = RetryPolicy::new(options.max_attempts);

        let outcome = with_retry(
            &policy,
            |attempt, error: &ToolError| {
                attempts.store(attempt + 1, Ordering::SeqCst);
                tracing::warn!(
                    attempt,
                    code = %error.code,
                    error = %error.message,
                    "tool call failed, retrying"
                );
            },
            || {
                with_timeout(options.timeout, options.cancel.as_ref(), |cancel| {
                    route(RouteRequest {
                        tool_name: tool_name.to_string(),
                        args: args.clone(),
                        trace_id: Some(trace_id.clone()),
                        cancel: Some(cancel),
                    })
                })
            },
        )
        .await;

        let duration_ms = started.elapsed().as_millis() as u64;
        let attempt_count = attempts.load(Ordering::SeqCst);

        match outcome {
            Ok(payload) => {
                tracing::info!(
                    duration_ms,
                    attempts = attempt_count,
                    success = true,
                    "tool call complete"
                );
                Ok(render_payload(&payload))
            }
            Err(error) => {
                tracing::warn!(
                    duration_ms,
                    attempts = attempt_count,
                    success = false,
                    code = %error.code,
                    "tool call failed"
                );
                Err(ToolError {
                    message: format_error_for_model(tool_name, &error),
                    ..error
                })
            }
        }
    }
    .instrument(span)
    .await
}

/// Render a routed payload into the string handed back to the model.
fn render_payload(payload: &Value) -> String {
    if let Some(blocks) = payload.get("content").and_then(Value::as_array) {
        let texts: Vec<&str> = blocks
            .iter()
            .filter(|block| block.get("type").and_then(Value::as_str) == Some("text"))
            .filter_map(|block| block.get("text").and_then(Value::as_str))
            .collect();
        if !texts.is_empty() {
            return texts.join("\n");
        }
    }
    payload.to_string()
}

fn hash_args(args: &Value) -> String {
    let encoded = serde_json::to_string(args).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(encoded.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}
