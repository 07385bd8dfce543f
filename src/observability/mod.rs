//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! connection task
//!     → connection span (connection id, peer address)
//!     → request span (request id, method, target)
//!     → diagnostic events (header dumps, decisions, body text)
//!
//! Consumers:
//!     → stdout through the tracing-subscriber fmt layer
//! ```
//!
//! # Design Decisions
//! - Human-readable output; not meant for machine parsing
//! - Body text is decoded lossily and only for display
//! - Request ids live in spans, never in forwarded headers

pub mod dump;
pub mod logging;

pub use dump::{BodyText, HeaderDump};
pub use logging::init_logging;
