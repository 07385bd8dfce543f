//! Interception subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, request target)
//!     → rules.rs (ordered rule lookup)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: SyntheticResponse, or None to forward upstream
//!
//! Rule Compilation (at startup):
//!     intercept_prefix + RuleConfig[]
//!     → intercept_prefix rule first, the rest by priority
//!     → Compile matchers and response templates
//!     → Freeze as immutable RuleSet
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Prefix matching only, on the raw target (query included)
//! - Deterministic: first match wins

pub mod matcher;
pub mod rules;

pub use matcher::{AndMatcher, Matcher, MethodMatcher, PathPrefixMatcher};
pub use rules::{parse_methods, InterceptionRule, RuleError, RuleSet, SyntheticResponse};
