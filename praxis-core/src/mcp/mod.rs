//! MCP (Model Context Protocol) client support
//!
//! JSON-RPC 2.0 over HTTP against remote tool servers: wire types, a
//! per-server client, and TTL-gated discovery that feeds the registry.

mod client;
mod discovery;
mod protocol;

pub use client::{ClientState, McpClient, McpService};
pub use discovery::{McpClientFactory, McpDiscovery, default_client_factory};
pub use protocol::{
    ContentBlock, JSONRPC_VERSION, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    METHOD_TOOLS_CALL, METHOD_TOOLS_LIST, McpTool, RequestId, ToolCallParams, ToolCallResult,
    ToolsListResult,
};
