//! HTTP server setup and the proxy handler.
//!
//! # Responsibilities
//! - Create the Axum Router with the proxy handler on every path
//! - Wire up the request span layer
//! - Accept connections and hand each one to its own task
//! - Per request: log, evaluate interception rules, forward or synthesize
//! - Log upstream status, headers and body text for diagnosis

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    routing::any,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{ProxyConfig, ValidationError};
use crate::http::request::{is_forwardable, make_request_span, request_target};
use crate::http::response::{
    bad_request_response, forward_error_response, relay_response, unsupported_method_response,
};
use crate::intercept::RuleSet;
use crate::net::{connection::serve_connection, Listener};
use crate::observability::{BodyText, HeaderDump};
use crate::upstream::{ForwardTarget, UpstreamForwarder};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub rules: Arc<RuleSet>,
    pub forwarder: Arc<UpstreamForwarder>,
    pub max_body_bytes: usize,
}

/// The intercepting proxy: rule set, forwarder and router.
pub struct ProxyServer {
    router: Router,
    rule_count: usize,
    target: ForwardTarget,
}

impl ProxyServer {
    /// Compile the rule set and build the forwarder from a validated config.
    pub fn new(config: &ProxyConfig) -> Result<Self, ValidationError> {
        let rules = Arc::new(RuleSet::from_config(config)?);
        let target = ForwardTarget::from_config(config);
        let forwarder = Arc::new(UpstreamForwarder::new(
            target.clone(),
            &config.timeouts,
            &config.limits,
        ));

        let rule_count = rules.len();
        let state = AppState {
            rules,
            forwarder,
            max_body_bytes: config.limits.max_body_bytes,
        };

        Ok(Self {
            router: Self::build_router(state),
            rule_count,
            target,
        })
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(proxy_handler))
            .route("/", any(proxy_handler))
            // Targets without a path (e.g. CONNECT authority-form) land here.
            .fallback(proxy_handler)
            .with_state(state)
            .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
    }

    /// The request router, for serving connections by hand or in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Accept connections until the process ends, one task per connection.
    pub async fn run(self, listener: Listener) {
        match listener.local_addr() {
            Ok(address) => tracing::info!(
                address = %address,
                upstream = %self.target,
                rules = self.rule_count,
                "Proxy server starting"
            ),
            Err(e) => tracing::warn!(error = %e, "Listener address unavailable"),
        }

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    tokio::spawn(serve_connection(stream, peer, self.router.clone()));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Accept failed");
                    // Back off so a persistent error (e.g. EMFILE) does not spin.
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
}

/// Main proxy handler.
/// Intercepts matching requests; relays GET and POST to the upstream.
async fn proxy_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let method = request.method().clone();
    let target = request_target(request.uri()).to_owned();

    tracing::info!(
        "Request {} {}\n{}",
        method,
        target,
        HeaderDump(request.headers())
    );

    if let Some(rule) = state.rules.find(&method, &target) {
        let synthetic = rule.response();
        tracing::info!(
            rule = rule.name(),
            status = %synthetic.status(),
            "Request intercepted"
        );
        return synthetic.to_response();
    }

    if !is_forwardable(&method) {
        tracing::warn!(method = %method, "Method not supported, not forwarding");
        return unsupported_method_response(&method);
    }

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read request body");
            return bad_request_response(e);
        }
    };
    if !body.is_empty() {
        tracing::info!("Request body\n{}", BodyText(&body));
    }

    tracing::info!(upstream = %state.forwarder.target(), "Forwarding request");

    match state.forwarder.forward(parts, body).await {
        Ok(upstream) => {
            tracing::info!(
                "Upstream responded {}\n{}",
                upstream.status,
                HeaderDump(&upstream.headers)
            );
            if !upstream.body.is_empty() {
                tracing::info!("Response body\n{}", BodyText(&upstream.body));
            }
            relay_response(upstream)
        }
        Err(e) => {
            tracing::error!(error = %e, "Forwarding failed");
            forward_error_response(&e)
        }
    }
}
