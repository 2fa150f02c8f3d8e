//! HTTP JSON-RPC client for a single MCP tool server
//!
//! One client per configured server, holding only connection parameters -
//! each call is an independent request/response, there is no persistent
//! socket. Every failure mode maps onto the closed [`ToolError`] taxonomy;
//! nothing here unwinds past the public surface.

use super::protocol::{
    JsonRpcRequest, JsonRpcResponse, McpTool, METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, ToolCallParams,
    ToolCallResult, ToolsListResult,
};
use crate::config::McpServerConfig;
use crate::tools::{ToolError, ToolResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Per-client diagnostic state, overwritten on every call.
///
/// Not consulted for control flow; exposed for degradation reporting.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub last_error_at: Option<DateTime<Utc>>,
    pub last_latency: Option<Duration>,
}

/// Client-side view of a remote MCP server.
///
/// The seam Discovery and the Router program against; tests substitute
/// fakes, production code uses [`McpClient`].
#[async_trait]
pub trait McpService: Send + Sync {
    /// Fetch the server's tool list
    async fn list_tools(&self) -> ToolResult<Vec<McpTool>>;

    /// Invoke a tool by its server-side name
    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
        cancel: Option<&CancellationToken>,
    ) -> ToolResult<ToolCallResult>;
}

/// JSON-RPC-over-HTTP MCP client.
pub struct McpClient {
    server_name: String,
    endpoint: String,
    bearer_token: Option<String>,
    request_timeout: Duration,
    http: reqwest::Client,
    next_id: AtomicI64,
    state: RwLock<ClientState>,
}

impl McpClient {
    /// Create a client for the given server configuration.
    ///
    /// Callers are expected to have checked that the server has a URL; an
    /// absent URL yields a client whose every request fails as unavailable.
    pub fn new(config: &McpServerConfig) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connection_timeout)
            .build()
            .unwrap_or_default();

        Self {
            server_name: config.name.clone(),
            endpoint: config.url.clone().unwrap_or_default(),
            bearer_token: config.bearer_token.clone(),
            request_timeout: config.request_timeout,
            http,
            next_id: AtomicI64::new(1),
            state: RwLock::new(ClientState::default()),
        }
    }

    /// The server this client talks to
    pub fn server_name(&self) -> &str {
        &self.server_name
    }

    /// Snapshot of the diagnostic state
    pub fn state(&self) -> ClientState {
        self.state.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record_success(&self, latency: Duration) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.last_success_at = Some(Utc::now());
        state.last_latency = Some(latency);
    }

    fn record_failure(&self, message: &str) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.last_error = Some(message.to_string());
        state.last_error_at = Some(Utc::now());
    }

    async fn request(
        &self,
        method: &str,
        params: Value,
        cancel: Option<&CancellationToken>,
    ) -> ToolResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let envelope = JsonRpcRequest::new(id, method).with_params(params);

        let mut builder = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(self.request_timeout)
            .json(&envelope);
        if let Some(token) = &self.bearer_token {
            builder = builder.bearer_auth(token);
        }

        let started = Instant::now();
        let send = builder.send();

        // An upstream cancellation (the whole agent turn being abandoned)
        // must terminate the in-flight request, not just its own timeout.
        let sent = match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => {
                    let error = ToolError::unavailable(
                        format!(
                            "Request to '{}' aborted after {}ms",
                            self.server_name,
                            started.elapsed().as_millis()
                        ),
                        true,
                    );
                    self.record_failure(&error.message);
                    return Err(error);
                }
                result = send => result,
            },
            None => send.await,
        };

        let response = match sent {
            Ok(response) => response,
            Err(source) => {
                let error = classify_transport_error(&source, self.request_timeout);
                self.record_failure(&error.message);
                return Err(error);
            }
        };

        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => {
                let error = ToolError::unavailable(
                    format!("Failed reading response from '{}': {}", self.server_name, source),
                    true,
                );
                self.record_failure(&error.message);
                return Err(error);
            }
        };

        let outcome = decode_response(status, &body);
        match &outcome {
            Ok(_) => self.record_success(started.elapsed()),
            Err(error) => self.record_failure(&error.message),
        }
        outcome
    }
}

#[async_trait]
impl McpService for McpClient {
    async fn list_tools(&self) -> ToolResult<Vec<McpTool>> {
        let result = self.request(METHOD_TOOLS_LIST, json!({}), None).await?;
        let listed: ToolsListResult = serde_json::from_value(result).map_err(|source| {
            ToolError::execution_failed(
                format!("Malformed tools/list result from '{}': {}", self.server_name, source),
                false,
            )
        })?;
        Ok(listed.tools)
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Value,
        cancel: Option<&CancellationToken>,
    ) -> ToolResult<ToolCallResult> {
        let params = ToolCallParams {
            name: name.to_string(),
            arguments,
        };
        let result = self
            .request(
                METHOD_TOOLS_CALL,
                serde_json::to_value(params).unwrap_or_default(),
                cancel,
            )
            .await?;
        serde_json::from_value(result).map_err(|source| {
            ToolError::execution_failed(
                format!("Malformed tools/call result from '{}': {}", self.server_name, source),
                false,
            )
        })
    }
}

/// Map a reqwest transport failure onto the taxonomy.
///
/// Timeouts and connection-level failures (refused, DNS) are unavailable
/// and retryable; they say nothing about the tool itself.
fn classify_transport_error(source: &reqwest::Error, timeout: Duration) -> ToolError {
    if source.is_timeout() {
        return ToolError::unavailable(
            format!("Request timed out after {}ms", timeout.as_millis()),
            true,
        );
    }
    if source.is_connect() {
        return ToolError::unavailable(format!("Connection failed: {}", source), true);
    }
    ToolError::unavailable(format!("Request failed: {}", source), true)
}

/// Decode an HTTP response body into the JSON-RPC result.
///
/// Precedence: HTTP status, JSON parse, JSON-RPC error field, missing
/// result field, success.
fn decode_response(status: u16, body: &str) -> ToolResult<Value> {
    if !(200..300).contains(&status) {
        let retryable = status >= 500 || status == 429;
        let summary: String = body.trim().chars().take(200).collect();
        return Err(ToolError::execution_failed(
            format!("HTTP {}: {}", status, summary),
            retryable,
        ));
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(parsed) => parsed,
        Err(_) => {
            return Err(ToolError::execution_failed(
                "Response body is not valid JSON",
                false,
            ));
        }
    };

    let response: JsonRpcResponse = match serde_json::from_value(parsed) {
        Ok(response) => response,
        Err(source) => {
            return Err(ToolError::execution_failed(
                format!("Malformed JSON-RPC response: {}", source),
                false,
            ));
        }
    };

    if let Some(error) = response.error {
        return Err(ToolError::execution_failed(
            format!("Server error {}: {}", error.code, error.message),
            false,
        ));
    }

    match response.result {
        Some(result) => Ok(result),
        None => Err(ToolError::execution_failed(
            "Response missing result field",
            false,
        )),
    }
}
