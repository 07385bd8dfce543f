//! The fixed upstream address.

use std::fmt;

use axum::http::uri::InvalidUri;
use axum::http::Uri;

use crate::config::ProxyConfig;

/// Immutable `(host, port)` pair every forwarded request goes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardTarget {
    host: String,
    port: u16,
}

impl ForwardTarget {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &ProxyConfig) -> Self {
        Self::new(config.upstream_host.clone(), config.upstream_port)
    }

    /// Absolute `http://` URI for a request target (path plus query).
    pub fn uri_for(&self, target: &str) -> Result<Uri, InvalidUri> {
        format!("http://{self}{target}").parse()
    }
}

impl fmt::Display for ForwardTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
