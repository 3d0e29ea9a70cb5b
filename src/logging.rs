use std::{net::SocketAddr, time::Instant};

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use crate::protocol::{Response, StatusCode};

pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

pub fn log_exchange(peer: SocketAddr, request_bytes: usize, response: &Response, started_at: Instant) {
    let elapsed_ms = started_at.elapsed().as_millis();

    info!(
        peer = %peer,
        request_bytes,
        status = %response.status,
        duration_ms = elapsed_ms,
        "request summary"
    );

    if response.status_code() == Some(StatusCode::BadRequest) {
        warn!(peer = %peer, status = %response.status, "request rejected");
    }
}
