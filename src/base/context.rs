//! Ergonomic error context helpers.
//!
//! Provides extension traits for adding context to `Result` types,
//! converting URL parse errors into context-rich `NetError` variants.

use crate::base::neterror::NetError;

/// Extension trait for adding context to URL parse Results.
pub trait UrlResultExt<T> {
    /// Attach the raw URL text to a parse error.
    ///
    /// # Example
    /// ```ignore
    /// use proxynet::base::context::UrlResultExt;
    ///
    /// let url = Url::parse(raw).url_context(raw)?;
    /// // Error: "Invalid URL ht!tp://x: relative URL without a base"
    /// ```
    fn url_context(self, raw: &str) -> Result<T, NetError>;
}

impl<T> UrlResultExt<T> for Result<T, url::ParseError> {
    fn url_context(self, raw: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::invalid_url(raw, e))
    }
}

/// Parse an absolute URL, reporting the input on failure.
pub fn parse_url(raw: &str) -> Result<url::Url, NetError> {
    url::Url::parse(raw).url_context(raw)
}

/// The URL's authority host, with the port appended when it is not the
/// scheme default. `None` for URLs without a host (`data:`, `mailto:`).
pub fn host_with_port(url: &url::Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_context() {
        let err = parse_url("not a url").unwrap_err();

        match err {
            NetError::InvalidUrl { url, .. } => {
                assert_eq!(url, "not a url");
            }
            _ => panic!("Expected InvalidUrl"),
        }
    }

    #[test]
    fn test_host_with_port() {
        let url = parse_url("http://example.com:8080/x").unwrap();
        assert_eq!(host_with_port(&url).as_deref(), Some("example.com:8080"));

        // Default port is elided by the parser
        let url = parse_url("https://example.com:443/x").unwrap();
        assert_eq!(host_with_port(&url).as_deref(), Some("example.com"));

        let url = parse_url("mailto:someone@example.com").unwrap();
        assert_eq!(host_with_port(&url), None);
    }

    #[test]
    fn test_parse_url_ok() {
        let url = parse_url("https://example.com/a").unwrap();
        assert_eq!(url.host_str(), Some("example.com"));
    }
}
