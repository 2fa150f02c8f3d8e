//! TTL-gated tool discovery across configured MCP servers
//!
//! Discovery refreshes the registry from each server's `tools/list`. All
//! stale servers refresh concurrently; one server's failure never blocks
//! another's. A failed refresh leaves the server's previously registered
//! tools in place: stale-but-available beats unavailable.

use super::client::{McpClient, McpService};
use crate::config::McpServerConfig;
use crate::health::HealthTracker;
use crate::tools::{McpRegistration, ToolRegistry, ToolResult, to_model_tool};
use futures::future::join_all;
use std::sync::Arc;

/// Builds a client for a server; the seam tests use to substitute fakes.
pub type McpClientFactory = Arc<dyn Fn(&McpServerConfig) -> Arc<dyn McpService> + Send + Sync>;

/// Production factory: one [`McpClient`] per server config.
pub fn default_client_factory() -> McpClientFactory {
    Arc::new(|config| Arc::new(McpClient::new(config)) as Arc<dyn McpService>)
}

/// Refreshes the registry from configured servers.
pub struct McpDiscovery {
    registry: Arc<ToolRegistry>,
    health: Arc<HealthTracker>,
    factory: McpClientFactory,
}

impl McpDiscovery {
    /// Create a discovery service using real HTTP clients
    pub fn new(registry: Arc<ToolRegistry>, health: Arc<HealthTracker>) -> Self {
        Self::with_factory(registry, health, default_client_factory())
    }

    /// Create a discovery service with a custom client factory
    pub fn with_factory(
        registry: Arc<ToolRegistry>,
        health: Arc<HealthTracker>,
        factory: McpClientFactory,
    ) -> Self {
        Self {
            registry,
            health,
            factory,
        }
    }

    /// Refresh every stale server and prune disabled ones.
    ///
    /// Returns the total number of tools registered this pass, or the
    /// first failing server's error (in configuration order). Successful
    /// servers' registrations commit even when the aggregate result is an
    /// error.
    pub async fn refresh(&self, servers: &[McpServerConfig]) -> ToolResult<usize> {
        for server in servers.iter().filter(|s| !s.enabled) {
            let removed = self.registry.remove_server_tools(&server.name);
            if removed > 0 {
                tracing::info!(
                    server = %server.name,
                    removed,
                    "removed tools for disabled server"
                );
            }
        }

        let stale: Vec<&McpServerConfig> = servers
            .iter()
            .filter(|s| s.is_callable())
            .filter(|s| self.registry.is_discovery_stale(&s.name))
            .collect();

        if stale.is_empty() {
            return Ok(0);
        }

        let results = join_all(stale.iter().map(|server| self.refresh_server(server))).await;

        let mut registered = 0;
        let mut first_error = None;
        for result in results {
            match result {
                Ok(count) => registered += count,
                Err(error) => {
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(registered),
        }
    }

    async fn refresh_server(&self, server: &McpServerConfig) -> ToolResult<usize> {
        let client = (self.factory)(server);
        match client.list_tools().await {
            Ok(tools) => {
                let registrations: Vec<McpRegistration> = tools
                    .iter()
                    .map(|tool| McpRegistration {
                        original_name: tool.name.clone(),
                        tool: to_model_tool(&server.name, tool),
                    })
                    .collect();
                let count = self.registry.register_mcp_tools(&server.name, registrations);
                self.health.mark_available(&server.name);
                tracing::debug!(server = %server.name, count, "discovery refreshed");
                Ok(count)
            }
            Err(error) => {
                // Previously registered tools stay put; only the aggregate
                // return value signals the failure.
                self.health.mark_unavailable(&server.name, &error.message);
                tracing::warn!(
                    server = %server.name,
                    error = %error,
                    "discovery failed, keeping stale tools"
                );
                Err(error)
            }
        }
    }
}
