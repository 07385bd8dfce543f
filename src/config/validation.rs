//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the upstream target and every rule can actually be built
//! - Validate value ranges (timeouts > 0, port != 0)
//! - Detect duplicate rule names
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Rule templates are checked with the same constructors the rule set uses

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::intercept::{parse_methods, RuleError, SyntheticResponse};

/// Name under which the `intercept_prefix` rule is reported.
pub const PRIMARY_RULE_NAME: &str = "intercept_prefix";

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("upstream_host must not be empty")]
    EmptyUpstreamHost,

    #[error("upstream_port must not be 0")]
    ZeroUpstreamPort,

    #[error("rule '{rule}': prefix '{prefix}' must start with '/'")]
    InvalidPrefix { rule: String, prefix: String },

    #[error("rule name must not be empty")]
    EmptyRuleName,

    #[error("rule name '{0}' is used more than once")]
    DuplicateRule(String),

    #[error("rule '{rule}': {source}")]
    Rule {
        rule: String,
        #[source]
        source: RuleError,
    },

    #[error("timeouts.{0} must be greater than 0")]
    ZeroTimeout(&'static str),

    #[error("limits.max_body_bytes must be greater than 0")]
    ZeroBodyLimit,
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.upstream_host.trim().is_empty() {
        errors.push(ValidationError::EmptyUpstreamHost);
    }
    if config.upstream_port == 0 {
        errors.push(ValidationError::ZeroUpstreamPort);
    }

    check_prefix(PRIMARY_RULE_NAME, &config.intercept_prefix, &mut errors);

    let mut seen = HashSet::new();
    for rule in &config.rules {
        if rule.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRuleName);
        } else if rule.name == PRIMARY_RULE_NAME || !seen.insert(rule.name.as_str()) {
            errors.push(ValidationError::DuplicateRule(rule.name.clone()));
        }

        check_prefix(&rule.name, &rule.path_prefix, &mut errors);

        if let Err(source) = parse_methods(&rule.methods) {
            errors.push(ValidationError::Rule {
                rule: rule.name.clone(),
                source,
            });
        }
        if let Err(source) = SyntheticResponse::from_config(&rule.response) {
            errors.push(ValidationError::Rule {
                rule: rule.name.clone(),
                source,
            });
        }
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_prefix(rule: &str, prefix: &str, errors: &mut Vec<ValidationError>) {
    if !prefix.starts_with('/') {
        errors.push(ValidationError::InvalidPrefix {
            rule: rule.to_string(),
            prefix: prefix.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{ResponseTemplateConfig, RuleConfig};

    fn rule(name: &str, prefix: &str) -> RuleConfig {
        RuleConfig {
            name: name.to_string(),
            path_prefix: prefix.to_string(),
            methods: Vec::new(),
            priority: 0,
            response: ResponseTemplateConfig::default(),
        }
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(validate_config(&ProxyConfig::default()), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let mut config = ProxyConfig::default();
        config.upstream_host = " ".into();
        config.upstream_port = 0;
        config.intercept_prefix = "cgi-bin".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyUpstreamHost,
                ValidationError::ZeroUpstreamPort,
                ValidationError::InvalidPrefix {
                    rule: PRIMARY_RULE_NAME.into(),
                    prefix: "cgi-bin".into(),
                },
                ValidationError::ZeroTimeout("request_secs"),
            ]
        );
    }

    #[test]
    fn rejects_duplicate_and_reserved_rule_names() {
        let mut config = ProxyConfig::default();
        config.rules.push(rule("a", "/a"));
        config.rules.push(rule("a", "/b"));
        config.rules.push(rule(PRIMARY_RULE_NAME, "/c"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::DuplicateRule("a".into()),
                ValidationError::DuplicateRule(PRIMARY_RULE_NAME.into()),
            ]
        );
    }

    #[test]
    fn rejects_unbuildable_rule_templates() {
        let mut bad_status = rule("bad-status", "/x");
        bad_status.response.status = 42;
        let mut bad_type = rule("bad-type", "/y");
        bad_type.response.content_type = "text/plain\n".into();
        let mut bad_method = rule("bad-method", "/z");
        bad_method.methods = vec!["GE T".into()];

        let mut config = ProxyConfig::default();
        config.rules = vec![bad_status, bad_type, bad_method];

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().all(|e| matches!(e, ValidationError::Rule { .. })));
        assert!(errors[0].to_string().starts_with("rule 'bad-status'"));
    }
}
