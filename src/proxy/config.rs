//! Proxy configuration.
//!
//! Established once at startup and shared read-only by every exchange,
//! usually behind an `Arc`.

use crate::base::context::host_with_port;
use crate::base::neterror::NetError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use url::Url;

/// Default reserved query parameter carrying the hand-off target.
pub const DEFAULT_HANDOFF_PARAM: &str = "__proxy_cookies_to";

/// Configuration for the cookie and link rewriting layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    /// Path prefix of the proxy namespace, e.g. `/proxy/`.
    pub prefix: String,

    /// Reserved query parameter used by the cookie hand-off.
    pub cookie_handoff_param: String,

    /// Content types whose bodies are scanned for links.
    pub process_content_types: Vec<String>,

    /// Content types treated as HTML.
    pub html_content_types: Vec<String>,

    /// Insert a NOINDEX, NOFOLLOW meta tag into HTML bodies.
    pub meta_robots: bool,

    /// Status code of the hand-off redirect.
    pub handoff_redirect_status: u16,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        let html: Vec<String> = ["text/html", "application/xml+xhtml", "application/xhtml+xml"]
            .into_iter()
            .map(String::from)
            .collect();
        let mut process = html.clone();
        process.push("text/css".to_string());

        Self {
            prefix: "/proxy/".to_string(),
            cookie_handoff_param: DEFAULT_HANDOFF_PARAM.to_string(),
            process_content_types: process,
            html_content_types: html,
            meta_robots: true,
            handoff_redirect_status: 307,
        }
    }
}

impl ProxyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_handoff_param(mut self, param: impl Into<String>) -> Self {
        self.cookie_handoff_param = param.into();
        self
    }

    pub fn with_process_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.process_content_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_meta_robots(mut self, enabled: bool) -> Self {
        self.meta_robots = enabled;
        self
    }

    /// Parse and validate a JSON configuration. Missing keys take their
    /// default values.
    pub fn from_json_str(json: &str) -> Result<Self, NetError> {
        let config: Self = serde_json::from_str(json).map_err(|e| NetError::ConfigParse {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, NetError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| NetError::ConfigIo {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), NetError> {
        if !self.prefix.starts_with('/') || !self.prefix.ends_with('/') {
            return Err(NetError::invalid_config(format!(
                "prefix must start and end with '/': {:?}",
                self.prefix
            )));
        }
        if self.cookie_handoff_param.is_empty() {
            return Err(NetError::invalid_config("cookie_handoff_param is empty"));
        }
        if !(300..400).contains(&self.handoff_redirect_status) {
            return Err(NetError::invalid_config(format!(
                "handoff_redirect_status must be 3xx, got {}",
                self.handoff_redirect_status
            )));
        }
        Ok(())
    }

    /// The proxy directory of a remote origin: `prefix + scheme://host`,
    /// without a trailing slash.
    pub fn origin_path(&self, url: &Url) -> Result<String, NetError> {
        let host = host_with_port(url).ok_or_else(|| NetError::missing_host(url))?;
        Ok(format!("{}{}://{}", self.prefix, url.scheme(), host))
    }

    /// The proxied form of an absolute remote URL.
    pub fn proxied_url(&self, url: &str) -> String {
        format!("{}{}", self.prefix, url)
    }
}
