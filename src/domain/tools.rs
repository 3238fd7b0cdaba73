//! Remote tool listings and tool call results

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::project_field;
use crate::errors::RpcError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    #[serde(default)]
    pub content: Vec<Value>,
    #[serde(default)]
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

pub fn call_params(name: &str, arguments: Value) -> Value {
    json!({
        "name": name,
        "arguments": arguments,
    })
}

pub fn tools_from_result(result: &Value) -> Result<Vec<ToolDescriptor>, RpcError> {
    project_field(result, "tools")
}

impl ToolResult {
    pub fn from_result(result: &Value) -> Result<Self, RpcError> {
        Ok(Self {
            content: project_field(result, "content")?,
            is_error: project_field(result, "isError")?,
            structured_content: result
                .get("structuredContent")
                .filter(|value| !value.is_null())
                .cloned(),
        })
    }

    /// Builds a local error result carrying `message` as a single text item.
    pub fn from_error(message: impl Into<String>) -> Self {
        Self {
            content: vec![json!({"type": "text", "text": message.into()})],
            is_error: true,
            structured_content: None,
        }
    }

    /// The `text` of every text content item, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|item| {
            match item.get("type").and_then(Value::as_str) {
                Some("text") => item.get("text").and_then(Value::as_str),
                _ => None,
            }
        })
    }
}
