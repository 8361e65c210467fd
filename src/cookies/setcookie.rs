//! Maps upstream `Set-Cookie` headers into the proxy namespace.
//!
//! A cookie set by `https://remote.host` with `Path=/app` is re-scoped to
//! `Path=<prefix>https://remote.host/app` so the browser only sends it back
//! for that remote origin's directory on the proxy. Domain and Secure are
//! always removed: the proxy is a single origin and may be served over
//! plain HTTP.

use crate::cookies::canonicalcookie::CanonicalCookie;
use crate::cookies::codec::{response_set_cookies, serialize_cookie};
use crate::base::neterror::NetError;
use crate::http::exchange::ProxyExchange;
use crate::proxy::config::ProxyConfig;
use http::header::{HeaderMap, HeaderValue, SET_COOKIE};
use url::Url;

/// Re-scope cookies set by `origin` into the proxy namespace.
pub fn rewrite_cookies(
    cookies: Vec<CanonicalCookie>,
    origin: &Url,
    config: &ProxyConfig,
) -> Result<Vec<CanonicalCookie>, NetError> {
    let origin_path = config.origin_path(origin)?;

    Ok(cookies
        .into_iter()
        .map(|mut cookie| {
            // Relative or empty paths fall back to the origin root.
            let path = cookie
                .path
                .as_deref()
                .filter(|p| p.starts_with('/'))
                .unwrap_or("/");
            cookie.path = Some(format!("{}{}", origin_path, path));
            cookie.domain = None;
            cookie.secure = None;
            cookie
        })
        .collect())
}

/// Rewrite every `Set-Cookie` header of the exchange's response.
///
/// Cookies are scoped to the pending redirect target when upstream sent a
/// 3xx, otherwise to the request target. Returns the rewritten cookies;
/// the header list is left untouched when the response sets none.
pub fn rewrite_response_cookies(
    exchange: &mut ProxyExchange,
    config: &ProxyConfig,
) -> Result<Vec<CanonicalCookie>, NetError> {
    if !exchange.response_headers().contains_key(SET_COOKIE) {
        return Ok(Vec::new());
    }

    let parsed = response_set_cookies(exchange.response_headers());
    let origin = exchange
        .redirect_url()
        .unwrap_or_else(|| exchange.target_url())
        .clone();

    tracing::debug!(count = parsed.len(), origin = %origin, "remapping set-cookie headers");
    let rewritten = rewrite_cookies(parsed, &origin, config)?;

    let headers = exchange.response_headers_mut();
    headers.remove(SET_COOKIE);
    append_set_cookies(headers, &rewritten);

    Ok(rewritten)
}

/// Serialize and append cookies as `Set-Cookie` headers. Cookies whose
/// serialized form is not a legal header value are dropped.
pub fn append_set_cookies(headers: &mut HeaderMap, cookies: &[CanonicalCookie]) {
    for cookie in cookies {
        let line = serialize_cookie(cookie);
        match HeaderValue::from_str(&line) {
            Ok(value) => {
                headers.append(SET_COOKIE, value);
            }
            Err(_) => tracing::debug!(name = %cookie.name, "dropping cookie with illegal header bytes"),
        }
    }
}
