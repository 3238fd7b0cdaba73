//! Resource and prompt listings
//!
//! Resources are addressed by URI, prompts by name. Both are displayed, never interpreted.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::domain::project_field;
use crate::errors::RpcError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub uri: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceContents {
    #[serde(default)]
    pub contents: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptDescriptor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<Value>,
}

pub fn read_params(uri: &str) -> Value {
    json!({ "uri": uri })
}

pub fn resources_from_result(result: &Value) -> Result<Vec<ResourceDescriptor>, RpcError> {
    project_field(result, "resources")
}

pub fn prompts_from_result(result: &Value) -> Result<Vec<PromptDescriptor>, RpcError> {
    project_field(result, "prompts")
}

impl ResourceContents {
    pub fn from_result(result: &Value) -> Result<Self, RpcError> {
        Ok(Self {
            contents: project_field(result, "contents")?,
        })
    }

    /// Text of the first textual entry, if the server sent one.
    pub fn first_text(&self) -> Option<&str> {
        self.contents
            .iter()
            .find_map(|entry| entry.get("text").and_then(Value::as_str))
    }
}
