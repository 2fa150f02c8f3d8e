//! Tool-name resolution and dispatch
//!
//! Resolves an incoming tool name to either an MCP server call or a static
//! handler. A transport-successful MCP response is re-inspected here for a
//! semantic failure (`isError: true`) before it may count as a success -
//! this is the only place that inspection happens.

use super::classify::error_from_call_result;
use crate::config::McpServerConfig;
use crate::health::HealthTracker;
use crate::mcp::{McpClientFactory, default_client_factory};
use crate::tools::{ToolError, ToolErrorCode, ToolRegistry, ToolResult, parse_exposed_name};
use serde_json::Value;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// One tool invocation as the executor hands it down.
#[derive(Debug, Clone, Default)]
pub struct RouteRequest {
    /// Exposed tool name
    pub tool_name: String,

    /// Tool arguments
    pub args: Value,

    /// Correlation id for logs and spans
    pub trace_id: Option<String>,

    /// Cancellation for the in-flight call
    pub cancel: Option<CancellationToken>,
}

/// Resolves tool names to backends and dispatches calls.
pub struct Router {
    registry: Arc<ToolRegistry>,
    servers: Vec<McpServerConfig>,
    health: Arc<HealthTracker>,
    factory: McpClientFactory,
}

impl Router {
    /// Create a router using real HTTP clients
    pub fn new(
        registry: Arc<ToolRegistry>,
        servers: Vec<McpServerConfig>,
        health: Arc<HealthTracker>,
    ) -> Self {
        Self::with_factory(registry, servers, health, default_client_factory())
    }

    /// Create a router with a custom client factory
    pub fn with_factory(
        registry: Arc<ToolRegistry>,
        servers: Vec<McpServerConfig>,
        health: Arc<HealthTracker>,
        factory: McpClientFactory,
    ) -> Self {
        Self {
            registry,
            servers,
            health,
            factory,
        }
    }

    /// Route a tool invocation to its backend.
    ///
    /// MCP-prefixed names go to their server when it is configured,
    /// enabled, and has a URL; everything else falls back to a static-tool
    /// lookup. An unresolvable name is a non-retryable not-found failure -
    /// no network is touched.
    pub async fn route(&self, request: RouteRequest) -> ToolResult<Value> {
        if let Some((server_name, tool_name)) = parse_exposed_name(&request.tool_name) {
            if let Some(server) = self
                .servers
                .iter()
                .find(|s| s.name == server_name && s.is_callable())
            {
                return self
                    .call_mcp(server, tool_name, request.args, request.cancel.as_ref())
                    .await;
            }
            tracing::debug!(
                tool = %request.tool_name,
                "prefixed name has no callable server, trying static tools"
            );
        }

        match self.registry.static_tool(&request.tool_name) {
            Some(handler) => handler.handle(request.args).await,
            None => Err(ToolError::not_found(&request.tool_name)),
        }
    }

    async fn call_mcp(
        &self,
        server: &McpServerConfig,
        tool_name: &str,
        args: Value,
        cancel: Option<&CancellationToken>,
    ) -> ToolResult<Value> {
        let client = (self.factory)(server);
        match client.call_tool(tool_name, args, cancel).await {
            Ok(result) => {
                if result.is_error() {
                    // Transport success wrapping a semantic failure.
                    return Err(error_from_call_result(&result));
                }
                self.health.mark_available(&server.name);
                serde_json::to_value(&result).map_err(|source| {
                    ToolError::execution_failed(
                        format!("Failed to encode tool result: {}", source),
                        false,
                    )
                })
            }
            Err(error) => {
                if matches!(
                    error.code,
                    ToolErrorCode::ToolUnavailable | ToolErrorCode::McpConnectionFailed
                ) {
                    self.health.mark_unavailable(&server.name, &error.message);
                }
                Err(error)
            }
        }
    }
}
