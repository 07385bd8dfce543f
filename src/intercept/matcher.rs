//! Request matching logic.
//!
//! # Responsibilities
//! - Match request target prefix (case-sensitive, query included)
//! - Match request method against a set
//! - Combine conditions with AND semantics

use std::fmt;

use axum::http::Method;

/// Trait for matching requests against conditions.
///
/// `target` is the request target as received: path plus query, no scheme
/// or authority.
pub trait Matcher: Send + Sync + fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, method: &Method, target: &str) -> bool;
}

/// Matches the start of the request target.
///
/// Anything may follow the prefix, including `?query` or further path
/// segments.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, _method: &Method, target: &str) -> bool {
        target.starts_with(&self.prefix)
    }
}

/// Matches any of a fixed set of methods.
#[derive(Debug, Clone)]
pub struct MethodMatcher {
    methods: Vec<Method>,
}

impl MethodMatcher {
    pub fn new(methods: Vec<Method>) -> Self {
        Self { methods }
    }
}

impl Matcher for MethodMatcher {
    fn matches(&self, method: &Method, _target: &str) -> bool {
        self.methods.contains(method)
    }
}

/// Combines multiple matchers with AND semantics.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn Matcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }
}

impl Matcher for AndMatcher {
    fn matches(&self, method: &Method, target: &str) -> bool {
        self.matchers.iter().all(|m| m.matches(method, target))
    }
}
