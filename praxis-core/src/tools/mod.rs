//! Tool catalogue and schema conversion
//!
//! This module owns the model-facing view of tools:
//! - Conversion from MCP tool descriptors to the model's native schema
//! - The registry of static and discovered tools with conflict rules
//! - The result/error types every execution surface returns

mod handler;
mod registry;
mod result;
mod schema;

pub use handler::{BoxedHandler, FnHandler, ToolHandler};
pub use registry::{
    DISCOVERY_TTL, McpRegistration, RegisteredMcpTool, ToolRegistry,
};
pub use result::{ToolError, ToolErrorCode, ToolResult};
pub use schema::{
    NAME_SEPARATOR, ModelTool, convert_schema, exposed_name, parse_exposed_name, to_model_tool,
};
