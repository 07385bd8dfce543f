//! Interception rules and the ordered rule set.
//!
//! # Responsibilities
//! - Compile rule configuration into matchers and response templates
//! - Look up the first rule matching a request
//! - Render the synthetic response of a matched rule
//!
//! # Design Decisions
//! - Immutable after construction (shared across connections without locks)
//! - O(n) scan; rule counts are tiny
//! - Explicit `None` means "forward", never a silent default response

use axum::body::{Body, Bytes};
use axum::http::header::{CONTENT_LENGTH, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::Response;
use thiserror::Error;

use crate::config::schema::{ProxyConfig, ResponseTemplateConfig};
use crate::config::validation::{ValidationError, PRIMARY_RULE_NAME};
use crate::intercept::matcher::{AndMatcher, Matcher, MethodMatcher, PathPrefixMatcher};

/// Error building a rule from configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("invalid status code {0}")]
    InvalidStatus(u16),

    #[error("invalid content type {0:?}")]
    InvalidContentType(String),

    #[error("invalid method {0:?}")]
    InvalidMethod(String),
}

/// Parse method names as configured. Names are case-sensitive, like HTTP.
pub fn parse_methods(names: &[String]) -> Result<Vec<Method>, RuleError> {
    names
        .iter()
        .map(|name| {
            Method::from_bytes(name.as_bytes()).map_err(|_| RuleError::InvalidMethod(name.clone()))
        })
        .collect()
}

/// Fixed response produced by a matching rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntheticResponse {
    status: StatusCode,
    content_type: HeaderValue,
    body: Bytes,
}

impl SyntheticResponse {
    pub fn new(status: StatusCode, content_type: HeaderValue, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            content_type,
            body: body.into(),
        }
    }

    /// `403`, `text/plain`, `Forbidden`.
    pub fn forbidden() -> Self {
        Self::new(
            StatusCode::FORBIDDEN,
            HeaderValue::from_static("text/plain"),
            Bytes::from_static(b"Forbidden"),
        )
    }

    pub fn from_config(config: &ResponseTemplateConfig) -> Result<Self, RuleError> {
        let status =
            StatusCode::from_u16(config.status).map_err(|_| RuleError::InvalidStatus(config.status))?;
        let content_type = HeaderValue::from_str(&config.content_type)
            .map_err(|_| RuleError::InvalidContentType(config.content_type.clone()))?;
        Ok(Self::new(status, content_type, config.body.clone()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Build the wire response: status, `Content-Type`, `Content-Length`, body.
    pub fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        let headers = response.headers_mut();
        headers.insert(CONTENT_TYPE, self.content_type.clone());
        headers.insert(CONTENT_LENGTH, HeaderValue::from(self.body.len()));
        response
    }
}

/// A predicate over the request plus the response it short-circuits with.
#[derive(Debug)]
pub struct InterceptionRule {
    name: String,
    matcher: Box<dyn Matcher>,
    response: SyntheticResponse,
}

impl InterceptionRule {
    pub fn new(
        name: impl Into<String>,
        matcher: Box<dyn Matcher>,
        response: SyntheticResponse,
    ) -> Self {
        Self {
            name: name.into(),
            matcher,
            response,
        }
    }

    /// Any-method prefix rule answering with the fixed 403.
    pub fn forbid_prefix(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self::new(
            name,
            Box::new(PathPrefixMatcher::new(prefix)),
            SyntheticResponse::forbidden(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn response(&self) -> &SyntheticResponse {
        &self.response
    }

    pub fn matches(&self, method: &Method, target: &str) -> bool {
        self.matcher.matches(method, target)
    }
}

/// Ordered interception rules. First match wins.
#[derive(Debug, Default)]
pub struct RuleSet {
    rules: Vec<InterceptionRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<InterceptionRule>) -> Self {
        Self { rules }
    }

    /// Compile the configured rules.
    ///
    /// The `intercept_prefix` rule comes first; `[[rules]]` follow by
    /// descending priority, ties keeping file order.
    pub fn from_config(config: &ProxyConfig) -> Result<Self, ValidationError> {
        let mut rules = vec![InterceptionRule::forbid_prefix(
            PRIMARY_RULE_NAME,
            config.intercept_prefix.clone(),
        )];

        let mut extra: Vec<_> = config.rules.iter().collect();
        extra.sort_by(|a, b| b.priority.cmp(&a.priority));

        for rule in extra {
            let in_rule = |source| ValidationError::Rule {
                rule: rule.name.clone(),
                source,
            };
            let methods = parse_methods(&rule.methods).map_err(in_rule)?;
            let response = SyntheticResponse::from_config(&rule.response).map_err(in_rule)?;

            let prefix: Box<dyn Matcher> = Box::new(PathPrefixMatcher::new(rule.path_prefix.clone()));
            let matcher: Box<dyn Matcher> = if methods.is_empty() {
                prefix
            } else {
                Box::new(AndMatcher::new(vec![
                    prefix,
                    Box::new(MethodMatcher::new(methods)),
                ]))
            };

            rules.push(InterceptionRule::new(rule.name.clone(), matcher, response));
        }

        Ok(Self { rules })
    }

    /// First rule matching the request, if any.
    pub fn find(&self, method: &Method, target: &str) -> Option<&InterceptionRule> {
        self.rules.iter().find(|rule| rule.matches(method, target))
    }

    /// Synthetic response for the request, or `None` to forward it.
    pub fn evaluate(&self, method: &Method, target: &str) -> Option<&SyntheticResponse> {
        self.find(method, target).map(InterceptionRule::response)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RuleConfig;

    const STATUS: &str = "/cgi-bin/luci/admin/services/openclash/status";

    fn extra_rule(name: &str, prefix: &str, priority: u32, status: u16) -> RuleConfig {
        RuleConfig {
            name: name.to_string(),
            path_prefix: prefix.to_string(),
            methods: Vec::new(),
            priority,
            response: ResponseTemplateConfig {
                status,
                ..ResponseTemplateConfig::default()
            },
        }
    }

    #[test]
    fn default_rule_set_intercepts_status_for_any_method() {
        let rules = RuleSet::from_config(&ProxyConfig::default()).unwrap();
        assert_eq!(rules.len(), 1);

        for method in [Method::GET, Method::POST, Method::PUT] {
            let response = rules.evaluate(&method, &format!("{STATUS}?x=1")).unwrap();
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            assert_eq!(response.body().as_ref(), b"Forbidden");
        }

        assert!(rules.evaluate(&Method::GET, "/cgi-bin/luci").is_none());
        assert!(rules.evaluate(&Method::GET, &format!("/foo{STATUS}")).is_none());
    }

    #[test]
    fn forbidden_response_has_fixed_headers() {
        let response = SyntheticResponse::forbidden().to_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(response.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(response.headers()[CONTENT_LENGTH], "9");
    }

    #[test]
    fn primary_rule_wins_over_extra_rules() {
        let mut config = ProxyConfig::default();
        config.rules.push(extra_rule("teapot", STATUS, 100, 418));

        let rules = RuleSet::from_config(&config).unwrap();
        let rule = rules.find(&Method::GET, STATUS).unwrap();
        assert_eq!(rule.name(), PRIMARY_RULE_NAME);
    }

    #[test]
    fn extra_rules_are_ordered_by_priority_then_file_order() {
        let mut config = ProxyConfig::default();
        config.rules.push(extra_rule("low", "/api", 1, 500));
        config.rules.push(extra_rule("high", "/api/v1", 10, 503));
        config.rules.push(extra_rule("low-later", "/api", 1, 502));

        let rules = RuleSet::from_config(&config).unwrap();
        assert_eq!(rules.find(&Method::GET, "/api/v1/x").unwrap().name(), "high");
        assert_eq!(rules.find(&Method::GET, "/api/v2").unwrap().name(), "low");
        assert!(rules.find(&Method::GET, "/other").is_none());
    }

    #[test]
    fn method_restricted_rule() {
        let mut config = ProxyConfig::default();
        let mut rule = extra_rule("post-only", "/submit", 0, 429);
        rule.methods = vec!["POST".into()];
        config.rules.push(rule);

        let rules = RuleSet::from_config(&config).unwrap();
        let response = rules.evaluate(&Method::POST, "/submit").unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(rules.evaluate(&Method::GET, "/submit").is_none());
    }

    #[test]
    fn invalid_template_is_reported_with_rule_name() {
        let mut config = ProxyConfig::default();
        config.rules.push(extra_rule("broken", "/x", 0, 1000));

        let err = RuleSet::from_config(&config).unwrap_err();
        assert_eq!(
            err,
            ValidationError::Rule {
                rule: "broken".into(),
                source: RuleError::InvalidStatus(1000),
            }
        );
    }
}
