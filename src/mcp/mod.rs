//! Model Context Protocol client and JSON-RPC envelopes
//!
//! Provides the request/response envelope codec and the exchange client built on top of it.

pub mod client;
pub mod rpc;
