//! Per-connection serving.
//!
//! # Responsibilities
//! - Generate unique connection IDs for tracing
//! - Drive one HTTP/1 connection through the router until it closes
//! - Keep connection errors inside the connection's own task

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpStream;
use tracing::Instrument;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is enough; only uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    /// Generate a new unique connection ID.
    pub fn new() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Serve every request on `stream` until the client or server closes it.
///
/// Header name case is recorded on parse and reused on write, so the
/// upstream and the client both see the casing their peer sent.
pub async fn serve_connection(stream: TcpStream, peer: SocketAddr, router: Router) {
    let id = ConnectionId::new();
    let span = tracing::info_span!("connection", id = %id, peer = %peer);

    async move {
        let service = TowerToHyperService::new(router);
        let result = http1::Builder::new()
            .preserve_header_case(true)
            .serve_connection(TokioIo::new(stream), service)
            .await;

        match result {
            Ok(()) => tracing::debug!("Connection closed"),
            // Resets and malformed requests end here; nothing else is affected.
            Err(e) => tracing::debug!(error = %e, "Connection ended with error"),
        }
    }
    .instrument(span)
    .await
}
