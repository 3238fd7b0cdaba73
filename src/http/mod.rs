//! HTTP edge of the client
//!
//! Provides the POST transport used for every exchange and the event-stream payload extraction.

pub mod sse;
pub mod transport;
