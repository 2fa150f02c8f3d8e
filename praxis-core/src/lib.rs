//! # Praxis - Tool Discovery, Routing, and Hardened Execution
//!
//! Praxis is a conversational agent's tool-execution layer. It discovers
//! callable capabilities on remote MCP servers (JSON-RPC 2.0 over HTTP),
//! exposes them to the calling model under stable names, and executes
//! invocations behind timeout, retry, and error-normalization layers so a
//! flaky backend never crashes the surrounding agent loop.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use praxis_core::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = PraxisConfig::load().unwrap_or_default();
//!     let registry = Arc::new(ToolRegistry::new());
//!     let health = Arc::new(HealthTracker::new());
//!
//!     // Discover tools from configured servers
//!     let discovery = McpDiscovery::new(registry.clone(), health.clone());
//!     let _ = discovery.refresh(&config.servers).await;
//!
//!     // Route and execute one tool call
//!     let router = Arc::new(Router::new(registry.clone(), config.servers.clone(), health));
//!     let result = execute(
//!         "docs__search",
//!         "toolu_01",
//!         serde_json::json!({"query": "hello"}),
//!         |request| {
//!             let router = router.clone();
//!             async move { router.route(request).await }
//!         },
//!         ExecuteOptions::default(),
//!     )
//!     .await;
//!
//!     match result {
//!         Ok(text) => println!("{text}"),
//!         Err(error) => println!("{}", error.message),
//!     }
//! }
//! ```
//!
//! ## Architecture
//!
//! - **tools**: model-facing schemas, the registry, conflict rules
//! - **mcp**: wire protocol, per-server HTTP client, TTL-gated discovery
//! - **runtime**: timeout/retry wrappers, classification, router, executor
//! - **health**: advisory per-server failure/recovery records
//!
//! Every public execution surface returns a [`tools::ToolResult`]; the
//! agent loop never sees a panic or an unanswered tool-use request.

pub mod config;
pub mod error;
pub mod health;
pub mod mcp;
pub mod runtime;
pub mod tools;

/// Current library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ExecutorConfig, McpServerConfig, PraxisConfig};
    pub use crate::error::{PraxisError, Result};
    pub use crate::health::{HealthTracker, ServerHealth};
    pub use crate::mcp::{
        ClientState, ContentBlock, McpClient, McpClientFactory, McpDiscovery, McpService, McpTool,
        ToolCallResult, default_client_factory,
    };
    pub use crate::runtime::{
        ExecuteOptions, RetryPolicy, RouteRequest, Router, classify_message, execute,
        format_error_for_model, with_retry, with_timeout,
    };
    pub use crate::tools::{
        BoxedHandler, DISCOVERY_TTL, FnHandler, McpRegistration, ModelTool, RegisteredMcpTool,
        ToolError, ToolErrorCode, ToolHandler, ToolRegistry, ToolResult, parse_exposed_name,
        to_model_tool,
    };
}
