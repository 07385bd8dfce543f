//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept)
//!     → connection.rs (connection id, HTTP/1 serving with header case kept)
//!     → Hand off to the HTTP layer (axum Router)
//! ```
//!
//! # Design Decisions
//! - One task per connection; nothing shared but read-only state
//! - No connection limit: this is a debugging tool, not an edge proxy
//! - Plaintext HTTP/1.1 only

pub mod connection;
pub mod listener;

pub use connection::ConnectionId;
pub use listener::{Listener, ListenerError};
