//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! Non-intercepted request (parts + buffered body)
//!     → target.rs (rewrite URI onto the fixed upstream)
//!     → forwarder.rs (single attempt, deadline, buffer response)
//!     → UpstreamResponse | ForwardError
//! ```
//!
//! # Design Decisions
//! - One fixed target for the process lifetime
//! - Exactly one attempt per request; no retries
//! - Every call has a deadline; a timeout is a forward failure like any other

pub mod forwarder;
pub mod target;

pub use forwarder::{ForwardError, UpstreamForwarder, UpstreamResponse};
pub use target::ForwardTarget;
