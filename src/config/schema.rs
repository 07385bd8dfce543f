//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from a TOML file.
//! The four scalar keys at the root (`listen_port`, `upstream_host`,
//! `upstream_port`, `intercept_prefix`) are the ones the command line can
//! override as well.

use serde::{Deserialize, Serialize};

/// Path of the OpenClash status endpoint polled by the LuCI admin UI.
pub const DEFAULT_INTERCEPT_PREFIX: &str = "/cgi-bin/luci/admin/services/openclash/status";

/// Root configuration for the intercepting proxy.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Interface to bind (e.g. "0.0.0.0").
    pub bind_host: String,

    /// TCP port the proxy listens on.
    pub listen_port: u16,

    /// Host of the real backend every non-intercepted request goes to.
    pub upstream_host: String,

    /// Port of the real backend.
    pub upstream_port: u16,

    /// Requests whose target starts with this prefix get the fixed 403.
    pub intercept_prefix: String,

    /// Additional interception rules, evaluated after `intercept_prefix`.
    pub rules: Vec<RuleConfig>,

    /// Upstream timeouts.
    pub timeouts: TimeoutConfig,

    /// Body size limits.
    pub limits: LimitsConfig,

    /// Diagnostic output settings.
    pub observability: ObservabilityConfig,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            listen_port: 8091,
            upstream_host: "192.168.110.45".to_string(),
            upstream_port: 80,
            intercept_prefix: DEFAULT_INTERCEPT_PREFIX.to_string(),
            rules: Vec::new(),
            timeouts: TimeoutConfig::default(),
            limits: LimitsConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl ProxyConfig {
    /// Address the listener binds to, in `host:port` form.
    pub fn listen_address(&self) -> String {
        if self.bind_host.contains(':') {
            format!("[{}]:{}", self.bind_host, self.listen_port)
        } else {
            format!("{}:{}", self.bind_host, self.listen_port)
        }
    }
}

/// An extra interception rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    /// Rule identifier for logging.
    pub name: String,

    /// Request target prefix to match (path plus query, case-sensitive).
    pub path_prefix: String,

    /// Methods this rule applies to. Empty means every method.
    #[serde(default)]
    pub methods: Vec<String>,

    /// Rule priority (higher = checked first).
    #[serde(default)]
    pub priority: u32,

    /// Response returned when the rule matches.
    #[serde(default)]
    pub response: ResponseTemplateConfig,
}

/// Synthetic response returned by a matching rule.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResponseTemplateConfig {
    pub status: u16,
    pub content_type: String,
    pub body: String,
}

impl Default for ResponseTemplateConfig {
    fn default() -> Self {
        Self {
            status: 403,
            content_type: "text/plain".to_string(),
            body: "Forbidden".to_string(),
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time allowed for the upstream exchange, body included, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Body size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Largest request or response body buffered by the proxy, in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log filter (e.g. "info" or "intercept_proxy=debug"). `RUST_LOG` wins if set.
    pub log_level: String,

    /// Colorize output.
    pub ansi: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            ansi: true,
        }
    }
}
