use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("configuration error: {message}")]
    Configuration { message: String },
    #[error("transport error: {message}")]
    Transport { status: Option<u16>, message: String },
    #[error("request timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },
    #[error("decode error: {message}")]
    Decode { message: String },
    #[error("remote error {code}: {message}")]
    Protocol {
        code: i64,
        message: String,
        data: Option<Value>,
    },
}

impl RpcError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Non-2xx reply. The message mirrors `HTTP <status>: <reason>`.
    pub fn http_status(status: u16, reason: Option<&str>) -> Self {
        Self::Transport {
            status: Some(status),
            message: format!("HTTP {status}: {}", reason.unwrap_or("Unknown Status")),
        }
    }

    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn protocol(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self::Protocol {
            code,
            message: message.into(),
            data,
        }
    }

    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration { .. } => "configuration",
            Self::Transport { .. } => "transport",
            Self::Timeout { .. } => "timeout",
            Self::Decode { .. } => "decode",
            Self::Protocol { .. } => "protocol",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}
