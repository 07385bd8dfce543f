//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Apply overrides → Init logging
//!     → Validate → Build server → Bind listener → Serve
//!
//! Signals (signals.rs):
//!     SIGINT (Ctrl+C) → stop accepting and exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - No drain phase; in-flight requests end with the process

pub mod signals;

pub use signals::shutdown_signal;
