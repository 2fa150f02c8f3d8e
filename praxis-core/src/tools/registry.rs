//! Tool Registry for static and MCP-discovered tools
//!
//! The `ToolRegistry` provides:
//! - Static tool registration with handler lookup
//! - Full-replace registration of a server's discovered tools
//! - Conflict rejection when an MCP tool's bare name shadows a static tool
//! - A TTL-gated discovery cache per server
//! - A deterministic, lexicographically sorted tool list for the model
//!
//! Mutation is synchronized with a `std::sync::RwLock`: a server's
//! remove-then-insert happens under one write-lock acquisition, so readers
//! observe either the full pre- or full post-replacement set for that
//! server, never an interleaving.

use super::handler::BoxedHandler;
use super::schema::{exposed_name, ModelTool};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Freshness window after which a server's tool list is re-fetched.
pub const DISCOVERY_TTL: Duration = Duration::from_secs(300);

/// Candidate produced by discovery for registration.
#[derive(Debug, Clone)]
pub struct McpRegistration {
    /// Tool name as the server reported it
    pub original_name: String,

    /// Converted model-facing tool (already server-prefixed)
    pub tool: ModelTool,
}

/// An MCP-sourced tool known to the registry.
#[derive(Debug, Clone)]
pub struct RegisteredMcpTool {
    /// Model-facing tool schema
    pub tool: ModelTool,

    /// Owning server
    pub server_name: String,

    /// Tool name as the server reported it
    pub original_name: String,
}

struct StaticEntry {
    tool: ModelTool,
    handler: BoxedHandler,
}

struct DiscoveryStamp {
    last_discovery: Instant,
    #[allow(dead_code)]
    tool_count: usize,
}

#[derive(Default)]
struct RegistryInner {
    static_tools: HashMap<String, StaticEntry>,
    mcp_tools: HashMap<String, RegisteredMcpTool>,
    discovery_cache: HashMap<String, DiscoveryStamp>,
}

/// Catalogue of callable tools, shared across discovery and execution.
pub struct ToolRegistry {
    ttl: Duration,
    inner: RwLock<RegistryInner>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        f.debug_struct("ToolRegistry")
            .field("static_tools", &inner.static_tools.len())
            .field("mcp_tools", &inner.mcp_tools.len())
            .finish()
    }
}

impl ToolRegistry {
    /// Create a new empty registry with the default discovery TTL
    pub fn new() -> Self {
        Self::with_ttl(DISCOVERY_TTL)
    }

    /// Create a registry with a custom discovery TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            inner: RwLock::new(RegistryInner::default()),
        }
    }

    /// Register a built-in tool under its bare name.
    ///
    /// Re-registering the same name overwrites the previous entry.
    pub fn register_static(&self, tool: ModelTool, handler: BoxedHandler) {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner
            .static_tools
            .insert(tool.name.clone(), StaticEntry { tool, handler });
    }

    /// Replace a server's tools with a freshly discovered set.
    ///
    /// Existing tools owned by `server_name` are removed first; each
    /// candidate is then inserted unless its bare original name collides
    /// with a static tool (static tools always win naming conflicts; the
    /// candidate is logged and skipped). Stamps the discovery cache and
    /// returns the number of tools actually inserted.
    pub fn register_mcp_tools(
        &self,
        server_name: &str,
        registrations: Vec<McpRegistration>,
    ) -> usize {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        inner
            .mcp_tools
            .retain(|_, entry| entry.server_name != server_name);

        let mut inserted = 0;
        for registration in registrations {
            if inner.static_tools.contains_key(&registration.original_name) {
                tracing::warn!(
                    server = server_name,
                    tool = %registration.original_name,
                    "skipping MCP tool that shadows a static tool"
                );
                continue;
            }
            let exposed = exposed_name(server_name, &registration.original_name);
            inner.mcp_tools.insert(
                exposed,
                RegisteredMcpTool {
                    tool: registration.tool,
                    server_name: server_name.to_string(),
                    original_name: registration.original_name,
                },
            );
            inserted += 1;
        }

        inner.discovery_cache.insert(
            server_name.to_string(),
            DiscoveryStamp {
                last_discovery: Instant::now(),
                tool_count: inserted,
            },
        );

        inserted
    }

    /// Remove every tool owned by a server.
    ///
    /// Used both during replacement and when a server is disabled.
    pub fn remove_server_tools(&self, server_name: &str) -> usize {
        let mut inner = self.inner.write().unwrap_or_else(|e| e.into_inner());
        let before = inner.mcp_tools.len();
        inner
            .mcp_tools
            .retain(|_, entry| entry.server_name != server_name);
        inner.discovery_cache.remove(server_name);
        before - inner.mcp_tools.len()
    }

    /// List every tool in the model's format, sorted lexicographically by
    /// exposed name.
    ///
    /// The ordering is a determinism requirement: identical registry
    /// contents must produce a byte-identical tool list, which keeps
    /// upstream prompt caches stable.
    pub fn tools_for_model(&self) -> Vec<ModelTool> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut tools: Vec<ModelTool> = inner
            .static_tools
            .values()
            .map(|entry| entry.tool.clone())
            .chain(inner.mcp_tools.values().map(|entry| entry.tool.clone()))
            .collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }

    /// Look up a static tool's handler by bare name
    pub fn static_tool(&self, name: &str) -> Option<BoxedHandler> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner
            .static_tools
            .get(name)
            .map(|entry| entry.handler.clone())
    }

    /// Look up an MCP tool by exposed name
    pub fn mcp_tool(&self, exposed_name: &str) -> Option<RegisteredMcpTool> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.mcp_tools.get(exposed_name).cloned()
    }

    /// Whether a server's tool list should be re-fetched.
    ///
    /// True when the server has never been discovered or its cache entry
    /// has outlived the TTL.
    pub fn is_discovery_stale(&self, server_name: &str) -> bool {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        match inner.discovery_cache.get(server_name) {
            Some(stamp) => stamp.last_discovery.elapsed() > self.ttl,
            None => true,
        }
    }

    /// Total number of registered tools
    pub fn len(&self) -> usize {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        inner.static_tools.len() + inner.mcp_tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Names of servers with a live discovery cache entry, sorted
    pub fn server_names(&self) -> Vec<String> {
        let inner = self.inner.read().unwrap_or_else(|e| e.into_inner());
        let mut names: Vec<String> = inner.discovery_cache.keys().cloned().collect();
        names.sort();
        names
    }
}
