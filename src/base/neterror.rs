use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum NetError {
    // URL Errors
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("URL has no host: {url}")]
    UrlMissingHost { url: String },

    // HTTP Errors
    #[error("Invalid value for header {name}")]
    InvalidHeaderValue { name: String },
    #[error("HTTP body error: {message}")]
    HttpBodyError { message: String },

    // Configuration Errors
    #[error("Invalid proxy configuration: {reason}")]
    InvalidConfig { reason: String },
    #[error("Failed to read config {path}: {message}")]
    ConfigIo { path: String, message: String },
    #[error("Failed to parse config: {message}")]
    ConfigParse { message: String },
}

impl NetError {
    /// Numeric code in Chromium's scheme. Codes without a Chromium
    /// counterpart live in the -10000 range.
    pub fn as_i32(&self) -> i32 {
        match self {
            NetError::InvalidUrl { .. } => -300,
            NetError::UrlMissingHost { .. } => -300,
            NetError::InvalidHeaderValue { .. } => -320,
            NetError::HttpBodyError { .. } => -330,
            NetError::InvalidConfig { .. } => -10100,
            NetError::ConfigIo { .. } => -10101,
            NetError::ConfigParse { .. } => -10102,
        }
    }

    pub fn invalid_url(url: impl Into<String>, err: url::ParseError) -> Self {
        NetError::InvalidUrl {
            url: url.into(),
            reason: err.to_string(),
        }
    }

    pub fn missing_host(url: &url::Url) -> Self {
        NetError::UrlMissingHost {
            url: url.to_string(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        NetError::InvalidConfig {
            reason: reason.into(),
        }
    }

    pub fn body(err: impl std::fmt::Display) -> Self {
        NetError::HttpBodyError {
            message: err.to_string(),
        }
    }

    /// Whether the failure is scoped to one exchange rather than to the
    /// proxy's configuration.
    pub fn is_exchange_error(&self) -> bool {
        !matches!(
            self,
            NetError::InvalidConfig { .. } | NetError::ConfigIo { .. } | NetError::ConfigParse { .. }
        )
    }
}
