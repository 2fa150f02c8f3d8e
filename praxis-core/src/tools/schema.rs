//! Schema conversion between MCP tool descriptors and the calling model's
//! native tool format
//!
//! MCP-sourced tools are exposed to the model as `{server}__{name}` so the
//! router can recover the owning server later. Conversion is a pure, total
//! function: it cannot fail, it only copies the parts of a JSON-Schema tree
//! the model understands.

use crate::mcp::McpTool;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Separator between server name and original tool name in exposed names.
pub const NAME_SEPARATOR: &str = "__";

/// A tool in the calling model's native format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelTool {
    /// Exposed tool name (bare for static tools, server-prefixed for MCP)
    pub name: String,

    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// JSON Schema for input parameters
    pub input_schema: Value,
}

/// Build the exposed name for an MCP tool.
pub fn exposed_name(server_name: &str, tool_name: &str) -> String {
    format!("{}{}{}", server_name, NAME_SEPARATOR, tool_name)
}

/// Parse an exposed name back into `(server_name, tool_name)`.
///
/// Splits on the first `__`, so an original tool name that itself contains
/// `__` survives the round trip. Returns `None` when there is no separator
/// or either side is empty.
pub fn parse_exposed_name(name: &str) -> Option<(&str, &str)> {
    let (server, tool) = name.split_once(NAME_SEPARATOR)?;
    if server.is_empty() || tool.is_empty() {
        return None;
    }
    Some((server, tool))
}

/// Convert a remote MCP tool descriptor into the model's tool format.
pub fn to_model_tool(server_name: &str, tool: &McpTool) -> ModelTool {
    ModelTool {
        name: exposed_name(server_name, &tool.name),
        description: tool.description.clone(),
        input_schema: convert_schema(&tool.input_schema),
    }
}

/// Keys copied verbatim at each level of the schema tree.
///
/// `nullable` has no native keyword in the model's schema dialect; it is
/// passed through unchanged for the model to interpret instead of being
/// lossily coerced into a type union.
const VERBATIM_KEYS: [&str; 5] = ["type", "description", "enum", "default", "nullable"];

/// Recursively rewrite a JSON-Schema-like tree into the subset the model
/// understands.
pub fn convert_schema(schema: &Value) -> Value {
    let Value::Object(obj) = schema else {
        return schema.clone();
    };

    let mut out = Map::new();

    for key in VERBATIM_KEYS {
        if let Some(value) = obj.get(key) {
            out.insert(key.to_string(), value.clone());
        }
    }

    if let Some(required) = obj.get("required") {
        out.insert("required".to_string(), required.clone());
    }

    if let Some(items) = obj.get("items") {
        out.insert("items".to_string(), convert_schema(items));
    }

    if let Some(Value::Object(props)) = obj.get("properties") {
        let converted: Map<String, Value> = props
            .iter()
            .map(|(name, prop)| (name.clone(), convert_schema(prop)))
            .collect();
        out.insert("properties".to_string(), Value::Object(converted));
    }

    for combinator in ["oneOf", "anyOf", "allOf"] {
        if let Some(Value::Array(members)) = obj.get(combinator) {
            let converted: Vec<Value> = members.iter().map(convert_schema).collect();
            out.insert(combinator.to_string(), Value::Array(converted));
        }
    }

    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_tool(name: &str, schema: Value) -> McpTool {
        McpTool {
            name: name.to_string(),
            description: Some("a sample tool".to_string()),
            input_schema: schema,
        }
    }

    #[test]
    fn test_exposed_name_prefixing() {
        let tool = sample_tool("search", json!({"type": "object"}));
        let converted = to_model_tool("docs", &tool);
        assert_eq!(converted.name, "docs__search");
        assert_eq!(converted.description.as_deref(), Some("a sample tool"));
    }

    #[test]
    fn test_parse_exposed_name() {
        assert_eq!(parse_exposed_name("docs__search"), Some(("docs", "search")));
        assert_eq!(parse_exposed_name("plain_name"), None);
        assert_eq!(parse_exposed_name("__search"), None);
        assert_eq!(parse_exposed_name("docs__"), None);
    }

    #[test]
    fn test_parse_splits_on_first_separator() {
        // a tool whose original name contains __ survives the round trip
        assert_eq!(
            parse_exposed_name("docs__get__raw"),
            Some(("docs", "get__raw"))
        );
    }

    #[test]
    fn test_naming_round_trip() {
        for (server, tool) in [("docs", "search"), ("a", "b"), ("files", "read_file")] {
            let name = exposed_name(server, tool);
            assert_eq!(parse_exposed_name(&name), Some((server, tool)));
        }
    }

    #[test]
    fn test_schema_preserves_known_keys() {
        let schema = json!({
            "type": "object",
            "description": "query params",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "search text",
                    "default": "",
                    "nullable": true
                },
                "limit": { "type": "integer", "enum": [10, 20, 50] }
            },
            "required": ["query"]
        });

        let converted = convert_schema(&schema);
        assert_eq!(converted["type"], "object");
        assert_eq!(converted["properties"]["query"]["nullable"], true);
        assert_eq!(converted["properties"]["limit"]["enum"], json!([10, 20, 50]));
        assert_eq!(converted["required"], json!(["query"]));
    }

    #[test]
    fn test_schema_drops_unknown_keys() {
        let schema = json!({
            "type": "object",
            "$schema": "http://json-schema.org/draft-07/schema#",
            "additionalProperties": false
        });

        let converted = convert_schema(&schema);
        assert_eq!(converted["type"], "object");
        assert!(converted.get("$schema").is_none());
        assert!(converted.get("additionalProperties").is_none());
    }

    #[test]
    fn test_schema_recurses_into_items_and_combinators() {
        let schema = json!({
            "type": "array",
            "items": {
                "oneOf": [
                    { "type": "string", "maxLength": 10 },
                    { "type": "number" }
                ]
            }
        });

        let converted = convert_schema(&schema);
        let members = converted["items"]["oneOf"].as_array().unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0]["type"], "string");
        // unknown keyword dropped inside the recursion too
        assert!(members[0].get("maxLength").is_none());
    }
}
