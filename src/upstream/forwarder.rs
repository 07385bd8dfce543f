//! Forwarding to the upstream backend.
//!
//! # Responsibilities
//! - Replay the inbound request (method, target, headers, body) upstream
//! - Enforce connect timeout and an overall deadline
//! - Buffer the full upstream response, content-decoded
//! - Turn every network failure into a `ForwardError` with its cause chain
//!
//! # Design Decisions
//! - Request headers go out verbatim, `Host` included; no request-side sanitizing
//! - HTTP/1 header case is preserved on the way out and on the way back
//! - Response extensions are kept so the original header case reaches the client
//! - gzip, deflate, br and zstd bodies are decoded before relay; when the client
//!   sent no `Accept-Encoding`, those codings are advertised upstream

use std::error::Error as StdError;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::request::Parts;
use axum::http::uri::InvalidUri;
use axum::http::{Extensions, HeaderMap, Request, StatusCode};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use thiserror::Error;
use tower::ServiceExt;
use tower_http::decompression::Decompression;

use crate::config::{LimitsConfig, TimeoutConfig};
use crate::http::request::request_target;
use crate::upstream::target::ForwardTarget;

/// Failure reaching the upstream. Display text is what the client sees.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("upstream request to {target} failed: {cause}")]
    Request { target: ForwardTarget, cause: String },

    #[error("failed to read upstream response body: {0}")]
    Body(String),

    #[error("upstream {target} did not respond within {after:?}")]
    Timeout { target: ForwardTarget, after: Duration },

    #[error("invalid upstream URI: {0}")]
    InvalidTarget(#[from] InvalidUri),
}

/// Fully buffered upstream response.
#[derive(Debug)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Carries the original header case recorded by the HTTP/1 client.
    pub extensions: Extensions,
    pub body: Bytes,
}

/// Replays requests against the fixed upstream.
#[derive(Debug, Clone)]
pub struct UpstreamForwarder {
    client: Decompression<Client<HttpConnector, Body>>,
    target: ForwardTarget,
    request_timeout: Duration,
    max_body_bytes: usize,
}

impl UpstreamForwarder {
    pub fn new(target: ForwardTarget, timeouts: &TimeoutConfig, limits: &LimitsConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(timeouts.connect_secs)));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new())
            .http1_preserve_header_case(true)
            .build(connector);

        Self {
            client: Decompression::new(client),
            target,
            request_timeout: Duration::from_secs(timeouts.request_secs),
            max_body_bytes: limits.max_body_bytes,
        }
    }

    pub fn target(&self) -> &ForwardTarget {
        &self.target
    }

    /// Perform the request upstream and buffer the response.
    ///
    /// `parts` are the inbound request parts; only the URI is rewritten.
    pub async fn forward(
        &self,
        mut parts: Parts,
        body: Bytes,
    ) -> Result<UpstreamResponse, ForwardError> {
        let uri = self.target.uri_for(request_target(&parts.uri))?;
        parts.uri = uri;
        let request = Request::from_parts(parts, Body::from(body));

        let exchange = async {
            let response = self
                .client
                .clone()
                .oneshot(request)
                .await
                .map_err(|e| ForwardError::Request {
                    target: self.target.clone(),
                    cause: error_chain(&e),
                })?;

            let (parts, body) = response.into_parts();
            let body = axum::body::to_bytes(Body::new(body), self.max_body_bytes)
                .await
                .map_err(|e| ForwardError::Body(error_chain(&e)))?;

            Ok::<_, ForwardError>(UpstreamResponse {
                status: parts.status,
                headers: parts.headers,
                extensions: parts.extensions,
                body,
            })
        };

        match tokio::time::timeout(self.request_timeout, exchange).await {
            Ok(result) => result,
            Err(_) => Err(ForwardError::Timeout {
                target: self.target.clone(),
                after: self.request_timeout,
            }),
        }
    }
}

/// `outer: inner: root` rendering of an error and its sources.
fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
