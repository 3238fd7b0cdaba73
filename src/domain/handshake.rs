//! `initialize` request parameters and the server identity it returns

use rust_mcp_sdk::schema::{Implementation, ProtocolVersion};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::RpcError;

pub const UNKNOWN_SERVER_NAME: &str = "Unknown";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: String,
    pub capabilities: Value,
    pub client_info: Implementation,
}

impl InitializeParams {
    pub fn new(client_name: &str, client_version: &str) -> Self {
        Self {
            protocol_version: ProtocolVersion::V2024_11_05.into(),
            capabilities: json!({}),
            client_info: Implementation {
                name: client_name.to_string(),
                version: client_version.to_string(),
                title: None,
                description: None,
                icons: vec![],
                website_url: None,
            },
        }
    }

    pub fn to_value(&self) -> Result<Value, RpcError> {
        serde_json::to_value(self)
            .map_err(|err| RpcError::decode(format!("failed to encode initialize params: {err}")))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawServerInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInitializeResult {
    #[serde(default)]
    protocol_version: Option<String>,
    #[serde(default)]
    server_info: Option<RawServerInfo>,
    #[serde(default)]
    instructions: Option<String>,
    #[serde(default)]
    capabilities: Value,
}

/// What the server chose to report about itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerInfo {
    pub name: String,
    pub version: Option<String>,
    pub protocol_version: Option<String>,
    pub instructions: Option<String>,
    pub capabilities: Value,
}

impl ServerInfo {
    pub fn from_result(result: Value) -> Result<Self, RpcError> {
        let raw: RawInitializeResult = match result {
            Value::Null => RawInitializeResult::default(),
            value => serde_json::from_value(value)
                .map_err(|err| RpcError::decode(format!("invalid initialize result: {err}")))?,
        };
        let server_info = raw.server_info.unwrap_or_default();

        Ok(Self {
            name: server_info
                .name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| UNKNOWN_SERVER_NAME.to_string()),
            version: server_info.version,
            protocol_version: raw.protocol_version,
            instructions: raw.instructions,
            capabilities: raw.capabilities,
        })
    }
}
