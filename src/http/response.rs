//! Response handling and transformation.
//!
//! # Responsibilities
//! - Sanitize upstream headers before they are replayed to the client
//! - Rebuild the relayed response around the buffered body
//! - Map forwarding failures and unsupported methods to responses
//!
//! # Design Decisions
//! - The body is buffered, so framing headers from upstream no longer apply
//! - `Content-Length` is recomputed from the bytes actually written
//! - Body bytes arrive content-decoded from the forwarder, so `Content-Encoding`
//!   no longer describes them; otherwise only headers are filtered

use axum::body::Body;
use axum::http::header::{CONTENT_ENCODING, CONTENT_LENGTH, TRANSFER_ENCODING};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::upstream::{ForwardError, UpstreamResponse};

/// Headers never copied from a buffered upstream response.
fn is_excluded(name: &HeaderName) -> bool {
    *name == TRANSFER_ENCODING || *name == CONTENT_ENCODING || *name == CONTENT_LENGTH
}

/// Filter upstream response headers for replay.
///
/// Drops `Transfer-Encoding`, `Content-Encoding` and `Content-Length`, keeps
/// everything else in order (duplicates included), and appends a fresh
/// `Content-Length` when `body` is non-empty.
///
/// For an empty body hyper still frames the response on the wire with
/// `Content-Length: 0`, so keep-alive clients know where it ends.
pub fn sanitize_response_headers(headers: &HeaderMap, body: &[u8]) -> HeaderMap {
    let mut sanitized = HeaderMap::with_capacity(headers.len() + 1);
    for (name, value) in headers {
        if !is_excluded(name) {
            sanitized.append(name.clone(), value.clone());
        }
    }
    if !body.is_empty() {
        sanitized.insert(CONTENT_LENGTH, HeaderValue::from(body.len()));
    }
    sanitized
}

/// Client response for a successful upstream exchange.
pub fn relay_response(upstream: UpstreamResponse) -> Response {
    let headers = sanitize_response_headers(&upstream.headers, &upstream.body);
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;
    *response.headers_mut() = headers;
    *response.extensions_mut() = upstream.extensions;
    response
}

/// `500` carrying the failure text.
pub fn forward_error_response(err: &ForwardError) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
}

/// `501` for methods that are neither intercepted nor forwarded.
pub fn unsupported_method_response(method: &Method) -> Response {
    (
        StatusCode::NOT_IMPLEMENTED,
        format!("Unsupported method ('{method}')"),
    )
        .into_response()
}

/// `400` when the client body cannot be read.
pub fn bad_request_response(reason: impl std::fmt::Display) -> Response {
    (
        StatusCode::BAD_REQUEST,
        format!("failed to read request body: {reason}"),
    )
        .into_response()
}
