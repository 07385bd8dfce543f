//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! accepted connection (net::connection)
//!     → server.rs (axum Router, request span, proxy handler)
//!     → request.rs (request target, method support)
//!     → intercept rule set: SyntheticResponse | forward
//!     → upstream forwarder
//!     → response.rs (sanitize headers, recompute length, error responses)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use response::sanitize_response_headers;
pub use server::{AppState, ProxyServer};
