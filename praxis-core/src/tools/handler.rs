//! Handler trait for statically-registered tools

use super::result::{ToolError, ToolResult};
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// Execution logic for a built-in tool.
///
/// Implementations return a [`ToolResult`] directly; the router treats any
/// error as already normalized.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with the given arguments
    async fn handle(&self, args: Value) -> ToolResult<Value>;
}

/// Type alias for shared handlers
pub type BoxedHandler = Arc<dyn ToolHandler>;

/// Wrap an async-compatible closure as a [`ToolHandler`].
///
/// Convenient for tests and small built-ins that don't warrant a struct.
pub struct FnHandler<F>(pub F);

#[async_trait]
impl<F> ToolHandler for FnHandler<F>
where
    F: Fn(Value) -> Result<Value, ToolError> + Send + Sync,
{
    async fn handle(&self, args: Value) -> ToolResult<Value> {
        (self.0)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_fn_handler() {
        let handler = FnHandler(|args: Value| Ok(json!({ "echo": args })));
        let result = handler.handle(json!("hi")).await.unwrap();
        assert_eq!(result, json!({ "echo": "hi" }));
    }
}
