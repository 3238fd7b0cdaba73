//! Server-Sent-Events payload extraction
//!
//! Only the first non-blank `data:` line of the buffered body is used, so an
//! empty priming event ahead of the response is skipped. A single JSON-RPC
//! response is expected per exchange, so this is not an incremental SSE parser:
//! multi-line data fields and later events are ignored.

use std::sync::LazyLock;

use regex::Regex;

pub const EVENT_STREAM: &str = "text/event-stream";

static DATA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^data: ?(\S.*?)\r?$").expect("valid data line pattern"));

pub fn is_event_stream(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains(EVENT_STREAM)
}

/// Returns the payload of the first `data:` line that carries something, if any.
pub fn first_data_payload(body: &str) -> Option<&str> {
    DATA_LINE
        .captures(body)
        .and_then(|captures| captures.get(1))
        .map(|payload| payload.as_str())
}
