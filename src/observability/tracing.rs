//! Request spans.
//!
//! # Responsibilities
//! - Create one span per inbound HTTP request
//! - Carry method, URI, remote address and request ID on that span
//!
//! # Design Decisions
//! - Request ID is assigned before the span is created, so every log line of
//!   a request can be correlated
//! - Remote address comes from axum's `ConnectInfo` extension

use std::net::SocketAddr;

use axum::extract::ConnectInfo;
use axum::http::Request;
use tracing::Span;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Build the span for an inbound request.
pub fn request_span<B>(request: &Request<B>) -> Span {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "-".to_string());
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");

    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        remote_addr = %remote_addr,
        request_id = %request_id,
    )
}
