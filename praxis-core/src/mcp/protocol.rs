//! MCP Protocol Types
//!
//! JSON-RPC 2.0 message types for the Model Context Protocol, limited to
//! the client-side surface this crate speaks: `tools/list` and
//! `tools/call`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 version string
pub const JSONRPC_VERSION: &str = "2.0";

/// Method name for listing a server's tools
pub const METHOD_TOOLS_LIST: &str = "tools/list";

/// Method name for invoking a tool
pub const METHOD_TOOLS_CALL: &str = "tools/call";

/// JSON-RPC Request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id: id.into(),
            method: method.into(),
            params: None,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }
}

/// JSON-RPC Response
///
/// Fields are lenient on deserialization so malformed server replies still
/// decode far enough for the client to classify them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: RequestId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// Request ID (can be string, number, or null)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    #[default]
    Null,
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

/// JSON-RPC Error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Tool definition as reported by a server's `tools/list`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct McpTool {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_schema: Value,
}

/// `tools/list` result payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<McpTool>,
}

/// `tools/call` request parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// `tools/call` result payload
///
/// A transport-successful response may still carry `isError: true`; the
/// router inspects that flag before declaring the call a success.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallResult {
    pub content: Vec<ContentBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl ToolCallResult {
    /// Whether the server flagged this result as a semantic failure
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Join the text of all text content blocks with newlines
    pub fn joined_text(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }
}

/// Content block in tool results
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        data: String,
        mime_type: String,
    },
    #[serde(rename_all = "camelCase")]
    Resource {
        uri: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_serialization() {
        let req = JsonRpcRequest::new(1i64, METHOD_TOOLS_LIST).with_params(json!({}));
        let encoded = serde_json::to_value(&req).unwrap();
        assert_eq!(encoded["jsonrpc"], "2.0");
        assert_eq!(encoded["id"], 1);
        assert_eq!(encoded["method"], "tools/list");
        assert_eq!(encoded["params"], json!({}));
    }

    #[test]
    fn test_response_with_error() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32601,"message":"Method not found"}}"#;
        let resp: JsonRpcResponse = serde_json::from_str(body).unwrap();
        assert!(resp.result.is_none());
        assert_eq!(resp.error.unwrap().code, -32601);
    }

    #[test]
    fn test_response_lenient_on_missing_fields() {
        let resp: JsonRpcResponse = serde_json::from_str(r#"{"unexpected": true}"#).unwrap();
        assert_eq!(resp.id, RequestId::Null);
        assert!(resp.result.is_none());
        assert!(resp.error.is_none());
    }

    #[test]
    fn test_mcp_tool_camel_case() {
        let body = json!({
            "name": "search",
            "description": "find things",
            "inputSchema": {"type": "object"}
        });
        let tool: McpTool = serde_json::from_value(body).unwrap();
        assert_eq!(tool.name, "search");
        assert_eq!(tool.input_schema["type"], "object");
    }

    #[test]
    fn test_content_block_wire_shapes() {
        let text = serde_json::to_value(ContentBlock::text("Hello")).unwrap();
        assert_eq!(text, json!({"type": "text", "text": "Hello"}));

        let image: ContentBlock = serde_json::from_value(json!({
            "type": "image",
            "data": "aGk=",
            "mimeType": "image/png"
        }))
        .unwrap();
        assert!(matches!(image, ContentBlock::Image { .. }));
    }

    #[test]
    fn test_call_result_joined_text() {
        let result = ToolCallResult {
            content: vec![
                ContentBlock::text("line one"),
                ContentBlock::Image {
                    data: String::new(),
                    mime_type: "image/png".to_string(),
                },
                ContentBlock::text("line two"),
            ],
            is_error: None,
        };
        assert_eq!(result.joined_text().unwrap(), "line one\nline two");
        assert!(!result.is_error());
    }
}
