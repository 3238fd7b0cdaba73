use std::time::Instant;

use tracing::{debug, warn};
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

/// Emits the per-exchange summary. `status` is absent when no HTTP reply arrived.
pub fn record_exchange(
    method: &str,
    id: i64,
    status: Option<u16>,
    content_type: &str,
    outcome: &str,
    started_at: Instant,
) {
    let elapsed_ms = started_at.elapsed().as_millis();

    debug!(
        method = %method,
        id,
        status = status.unwrap_or_default(),
        content_type = %content_type,
        duration_ms = elapsed_ms,
        outcome = %outcome,
        "rpc exchange summary"
    );

    if matches!(status, Some(401) | Some(403)) {
        warn!(method = %method, id, "authentication failure");
    }
}
