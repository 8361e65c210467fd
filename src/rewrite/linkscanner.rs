//! Rewrites embedded cross-origin links so they pass through the cookie
//! hand-off first.
//!
//! On a page proxied from `http://www.site.com`, a link to
//! `<prefix>https://shop.site.com/cart` becomes
//! `<prefix>http://www.site.com/cart?__proxy_cookies_to=https%3A%2F%2Fshop.site.com%2Fcart`.
//! Following it sends the old origin's cookies to the proxy, which mints
//! them under the new origin and redirects (see `cookies::carrier`).
//!
//! Matching is per chunk. A link split across two chunks is not seen.

use crate::base::context::host_with_port;
use crate::base::neterror::NetError;
use crate::cookies::psl::RegistrableDomain;
use crate::http::bodystream::ChunkTransform;
use crate::proxy::config::ProxyConfig;
use bytes::Bytes;
use regex::bytes::{Captures, Regex, RegexBuilder};
use std::borrow::Cow;
use std::sync::Arc;
use url::Url;

/// Build the per-page link pattern: the proxy prefix, then an http(s) URL
/// whose host is `site` or one label below it. Group 1 is the remote URL.
pub fn link_pattern(prefix: &str, site: &str) -> Result<Regex, NetError> {
    let pattern = format!(
        r#"{}(https?://(?:[a-z0-9-]+\.)?{}[^'")\s\\]*)"#,
        regex::escape(prefix),
        regex::escape(site)
    );
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .size_limit(1_000_000)
        .build()
        .map_err(|e| NetError::invalid_config(format!("link pattern: {}", e)))
}

/// Link rewriting state for one page.
pub struct LinkRewriter {
    pattern: Regex,
    prefix: String,
    handoff_param: String,
    page_scheme: String,
    page_host: String,
    page_site: String,
    domains: Arc<dyn RegistrableDomain>,
}

impl LinkRewriter {
    /// Prepare a rewriter for a page. Returns `Ok(None)` when the page host
    /// has no registrable domain, in which case nothing is rewritten.
    pub fn for_page(
        config: &ProxyConfig,
        page: &Url,
        domains: Arc<dyn RegistrableDomain>,
    ) -> Result<Option<Self>, NetError> {
        let page_host = host_with_port(page).ok_or_else(|| NetError::missing_host(page))?;
        let Some(page_site) = page.host_str().and_then(|h| domains.registrable_domain(h)) else {
            tracing::debug!(page = %page, "no registrable domain, link scanning disabled");
            return Ok(None);
        };

        Ok(Some(Self {
            pattern: link_pattern(&config.prefix, &page_site)?,
            prefix: config.prefix.clone(),
            handoff_param: config.cookie_handoff_param.clone(),
            page_scheme: page.scheme().to_string(),
            page_host,
            page_site,
            domains,
        }))
    }

    /// Rewrite every qualifying link in `text`. Borrowed when nothing
    /// matched.
    pub fn rewrite<'t>(&self, text: &'t [u8]) -> Cow<'t, [u8]> {
        self.pattern
            .replace_all(text, |caps: &Captures<'_>| self.rewrite_match(caps))
    }

    fn rewrite_match(&self, caps: &Captures<'_>) -> Vec<u8> {
        let proxied = &caps[0];
        match std::str::from_utf8(&caps[1]) {
            Ok(link) => match self.handoff_link(link) {
                Some(rewritten) => {
                    tracing::debug!(
                        from = %link,
                        to = %rewritten,
                        "rewriting link to copy cookies to new origin"
                    );
                    rewritten.into_bytes()
                }
                None => proxied.to_vec(),
            },
            Err(_) => proxied.to_vec(),
        }
    }

    /// The hand-off form of `link`, or `None` if it stays as is.
    fn handoff_link(&self, link: &str) -> Option<String> {
        let next = match Url::parse(link) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(link = %link, error = %e, "leaving unparsable link");
                return None;
            }
        };

        let next_host = host_with_port(&next)?;
        if next.scheme() == self.page_scheme && next_host == self.page_host {
            return None;
        }
        // The pattern is textual, `site.com.evil.org` also matches it.
        let next_site = next.host_str().and_then(|h| self.domains.registrable_domain(h));
        if next_site.as_deref() != Some(self.page_site.as_str()) {
            return None;
        }

        Some(format!(
            "{}{}://{}{}?{}={}",
            self.prefix,
            self.page_scheme,
            self.page_host,
            next.path(),
            self.handoff_param,
            urlencoding::encode(link)
        ))
    }
}

impl ChunkTransform for LinkRewriter {
    fn transform(&mut self, chunk: Bytes) -> Bytes {
        let rewritten = match self.rewrite(&chunk) {
            Cow::Borrowed(_) => None,
            Cow::Owned(rewritten) => Some(rewritten),
        };
        match rewritten {
            Some(rewritten) => {
                tracing::trace!(before = chunk.len(), after = rewritten.len(), "rewrote links in chunk");
                Bytes::from(rewritten)
            }
            None => chunk,
        }
    }
}
