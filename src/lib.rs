pub mod config;
pub mod demo;
pub mod domain;
pub mod errors;
pub mod http;
pub mod logging;
pub mod mcp;

pub use config::ClientConfig;
pub use errors::RpcError;
pub use mcp::client::McpClient;
