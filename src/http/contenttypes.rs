//! Content-type classification.
//!
//! Decides which response bodies the rewriting stages attach to. The
//! default classifier matches the mime essence against the lists in
//! [`ProxyConfig`].

use crate::proxy::config::ProxyConfig;

/// Classifies responses by content type.
pub trait ContentClassifier: Send + Sync {
    /// Whether the body should be scanned for links.
    fn should_process(&self, content_type: &str) -> bool;

    /// Whether the body is an HTML document.
    fn is_html(&self, content_type: &str) -> bool;
}

/// Classifier over fixed content-type lists.
#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    process: Vec<String>,
    html: Vec<String>,
}

impl ContentTypes {
    pub fn from_config(config: &ProxyConfig) -> Self {
        Self {
            process: config
                .process_content_types
                .iter()
                .map(|t| mime_essence(t))
                .collect(),
            html: config
                .html_content_types
                .iter()
                .map(|t| mime_essence(t))
                .collect(),
        }
    }
}

impl ContentClassifier for ContentTypes {
    fn should_process(&self, content_type: &str) -> bool {
        let essence = mime_essence(content_type);
        self.process.iter().any(|t| *t == essence)
    }

    fn is_html(&self, content_type: &str) -> bool {
        let essence = mime_essence(content_type);
        self.html.iter().any(|t| *t == essence)
    }
}

/// Lower-cased type/subtype with parameters removed:
/// `Text/HTML; charset=utf-8` becomes `text/html`.
pub fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}
