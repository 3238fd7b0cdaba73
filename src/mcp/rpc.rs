//! JSON-RPC request/response envelopes
//!
//! Provides the wire representation of a single exchange and the dual-mode
//! (plain JSON or event-stream) body decoding.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::errors::RpcError;
use crate::http::sse::{first_data_payload, is_event_stream};

pub const JSONRPC_VERSION: &str = "2.0";
pub const METHOD_NOT_FOUND: i64 = -32601;

#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    pub jsonrpc: &'static str,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    pub id: i64,
}

impl RequestEnvelope {
    pub fn new(id: i64, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.into(),
            params,
            id,
        }
    }

    pub fn to_body(&self) -> Result<Vec<u8>, RpcError> {
        serde_json::to_vec(self)
            .map_err(|err| RpcError::decode(format!("failed to encode request: {err}")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Result(Value),
    Error(ErrorObject),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub jsonrpc: String,
    pub id: Value,
    pub outcome: Outcome,
}

#[derive(Debug, Deserialize)]
struct RawResponse {
    #[serde(default)]
    jsonrpc: Option<String>,
    #[serde(default)]
    id: Value,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<ErrorObject>,
}

// Keeps `"result": null` distinct from an absent member.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl ResponseEnvelope {
    pub fn is_error(&self) -> bool {
        matches!(self.outcome, Outcome::Error(_))
    }

    /// Surfaces a remote `error` object as [`RpcError::Protocol`].
    pub fn into_result(self) -> Result<Value, RpcError> {
        match self.outcome {
            Outcome::Result(result) => Ok(result),
            Outcome::Error(err) => Err(RpcError::protocol(err.code, err.message, err.data)),
        }
    }

    fn from_value(value: Value) -> Result<Self, RpcError> {
        let raw: RawResponse = serde_json::from_value(value)
            .map_err(|err| RpcError::decode(format!("invalid json-rpc response: {err}")))?;

        let outcome = match (raw.result, raw.error) {
            (Some(_), Some(_)) => {
                return Err(RpcError::decode(
                    "json-rpc response carries both result and error",
                ))
            }
            (None, Some(err)) => Outcome::Error(err),
            (Some(result), None) => Outcome::Result(result),
            (None, None) => {
                return Err(RpcError::decode(
                    "json-rpc response carries neither result nor error",
                ))
            }
        };

        let jsonrpc = raw.jsonrpc.unwrap_or_default();
        if jsonrpc != JSONRPC_VERSION {
            warn!(jsonrpc = %jsonrpc, "unexpected jsonrpc version in response");
        }

        Ok(Self {
            jsonrpc,
            id: raw.id,
            outcome,
        })
    }
}

/// Decodes a buffered response body, choosing the mode from `content_type`.
pub fn decode_response(content_type: &str, body: &str) -> Result<ResponseEnvelope, RpcError> {
    let payload = if is_event_stream(content_type) {
        first_data_payload(body)
            .ok_or_else(|| RpcError::decode("event stream contains no data line"))?
    } else {
        body
    };

    let value: Value = serde_json::from_str(payload)
        .map_err(|err| RpcError::decode(format!("response body is not valid json: {err}")))?;

    ResponseEnvelope::from_value(value)
}
