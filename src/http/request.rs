//! Request inspection helpers.
//!
//! # Responsibilities
//! - Extract the raw request target used for matching and forwarding
//! - Decide which methods the proxy relays
//! - Open the per-request tracing span
//!
//! # Design Decisions
//! - The request id is generated here for logging only; it is never added
//!   to the headers sent upstream
//! - Absolute-form targets (browser proxy mode) are reduced to path + query

use axum::body::Body;
use axum::http::{Method, Request, Uri};
use tracing::Span;
use uuid::Uuid;

/// Path plus query exactly as received, without scheme or authority.
pub fn request_target(uri: &Uri) -> &str {
    uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/")
}

/// Methods relayed upstream. Everything else that no rule intercepts gets 501.
pub fn is_forwardable(method: &Method) -> bool {
    *method == Method::GET || *method == Method::POST
}

/// Span wrapping every event logged while handling one request.
pub fn make_request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        id = %Uuid::new_v4(),
        method = %request.method(),
        target = %request_target(request.uri()),
    )
}
