//! Typed views over MCP results
//!
//! Provides lenient projections of the `initialize`, tool, resource and prompt results.
//! Remote tools, resources and prompts stay opaque beyond their identifying fields.

pub mod handshake;
pub mod resources;
pub mod tools;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::RpcError;

/// Projects `result[field]` into `T`, treating an absent or null member as `T::default()`.
pub(crate) fn project_field<T>(result: &Value, field: &str) -> Result<T, RpcError>
where
    T: DeserializeOwned + Default,
{
    match result.get(field) {
        None | Some(Value::Null) => Ok(T::default()),
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|err| RpcError::decode(format!("invalid `{field}` in result: {err}"))),
    }
}
