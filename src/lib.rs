//! Intercepting debug proxy.
//!
//! Sits between a browser and a router's LuCI admin interface. Requests to
//! the OpenClash status endpoint are answered with a fixed `403 Forbidden`;
//! everything else is relayed to the real router with full request/response
//! logging, so the admin UI's handling of a failing status call can be
//! reproduced on demand.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request        ┌─────────┐    ┌─────────┐    ┌─────────────┐
//!     ─────────────────────▶│   net   │───▶│  http   │───▶│  intercept  │
//!                           │listener │    │ server  │    │  rule set   │
//!                           └─────────┘    └─────────┘    └──────┬──────┘
//!                                                    match │     │ no match
//!                                     ┌────────────────────┘     ▼
//!                                     │                   ┌─────────────┐
//!                                     │                   │  upstream   │◀──▶ Router
//!                                     │                   │  forwarder  │
//!                                     ▼                   └──────┬──────┘
//!     Client Response       ┌──────────────────┐                 │
//!     ◀─────────────────────│ synthetic | relay│◀────────────────┘
//!                           │ (sanitized hdrs) │
//!                           └──────────────────┘
//!
//!     Cross-cutting: config, observability, lifecycle
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod intercept;
pub mod net;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;
