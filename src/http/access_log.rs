//! Per-request access log.

use std::net::SocketAddr;

use crate::http::response::StatusCode;

/// Emits one line for an answered request.
pub fn log_request(peer: SocketAddr, request_line: &str, status: StatusCode, resource: &str) {
    tracing::info!(
        peer = %peer,
        request_line = %request_line,
        status = status.as_u16(),
        resource = %resource,
        "Request served"
    );
}
