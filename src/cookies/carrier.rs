//! Cookie hand-off across protocol and subdomain changes.
//!
//! Cookies live under `<prefix><scheme>://<host>/` on the proxy, so a jump
//! from `http://a.example.com` to `https://b.example.com` would strand the
//! client's session. Two entry points move cookies to the new directory:
//!
//! - [`carry_forward`] runs on a response when upstream redirected to
//!   another origin of the same site. The client's cookies are re-minted
//!   under the new origin, minus any the response sets itself.
//! - [`complete_handoff`] runs on a request that carries the reserved
//!   query parameter (see `rewrite::linkscanner`). The request is answered
//!   with a redirect that mints the cookies instead of being proxied.
//!
//! Only name and value survive the hop. HttpOnly, Expires and Max-Age are
//! not known from a `Cookie` request header and are lost.

use crate::base::context::{host_with_port, parse_url};
use crate::base::neterror::NetError;
use crate::cookies::canonicalcookie::CanonicalCookie;
use crate::cookies::codec::request_cookies;
use crate::cookies::psl::RegistrableDomain;
use crate::cookies::setcookie::append_set_cookies;
use crate::http::exchange::ProxyExchange;
use crate::proxy::config::ProxyConfig;
use http::header::HeaderMap;
use http::StatusCode;
use std::collections::BTreeMap;
use url::Url;

/// Whether moving from `from` to `to` needs a cookie hand-off: the origin
/// changes but both hosts share a registrable domain.
pub fn needs_handoff(from: &Url, to: &Url, domains: &dyn RegistrableDomain) -> bool {
    let diff_scheme = from.scheme() != to.scheme();
    let diff_host = host_with_port(from) != host_with_port(to);
    if !diff_scheme && !diff_host {
        return false;
    }
    match (from.host_str(), to.host_str()) {
        (Some(a), Some(b)) => domains.same_site(a, b),
        _ => false,
    }
}

/// Mint cookies scoped to the root of `dest`'s proxy directory.
pub fn handoff_cookies(
    cookies: &BTreeMap<String, String>,
    dest: &Url,
    config: &ProxyConfig,
) -> Result<Vec<CanonicalCookie>, NetError> {
    let path = format!("{}/", config.origin_path(dest)?);
    Ok(cookies
        .iter()
        .map(|(name, value)| CanonicalCookie::new(name.as_str(), value.as_str()).with_path(&path))
        .collect())
}

/// Carry the client's cookies across an upstream cross-origin redirect.
///
/// `fresh` are the cookies the response itself sets (as returned by the
/// Set-Cookie rewriter); a carried cookie with the same name is dropped.
/// Returns the number of cookies appended.
pub fn carry_forward(
    exchange: &mut ProxyExchange,
    config: &ProxyConfig,
    domains: &dyn RegistrableDomain,
    fresh: &[CanonicalCookie],
) -> Result<usize, NetError> {
    let Some(redirect) = exchange.redirect_url().cloned() else {
        return Ok(0);
    };
    if !needs_handoff(exchange.target_url(), &redirect, domains) {
        return Ok(0);
    }

    tracing::debug!(
        from = %exchange.target_url(),
        to = %redirect,
        "copying cookies across redirect"
    );

    let mut old = request_cookies(exchange.request_headers());
    for cookie in fresh {
        old.remove(&cookie.name);
    }

    let carried = handoff_cookies(&old, &redirect, config)?;
    append_set_cookies(exchange.response_headers_mut(), &carried);
    Ok(carried.len())
}

/// The hand-off destination named by the reserved query parameter, if any.
pub fn handoff_target(url: &Url, config: &ProxyConfig) -> Option<String> {
    url.query_pairs()
        .find(|(key, value)| key == config.cookie_handoff_param.as_str() && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}

/// Answer a hand-off request with a redirect that mints the client's
/// cookies under the destination origin.
///
/// Returns `Ok(false)` when the request carries no hand-off parameter. A
/// destination that is not the same site as the request target is still
/// redirected to, but no cookies are minted for it.
pub fn complete_handoff(
    exchange: &mut ProxyExchange,
    config: &ProxyConfig,
    domains: &dyn RegistrableDomain,
) -> Result<bool, NetError> {
    let Some(raw_dest) = handoff_target(exchange.target_url(), config) else {
        return Ok(false);
    };
    let dest = parse_url(&raw_dest)?;

    let same_site = match (exchange.target_url().host_str(), dest.host_str()) {
        (Some(a), Some(b)) => domains.same_site(a, b),
        _ => false,
    };

    let mut headers = HeaderMap::new();
    if same_site {
        tracing::debug!(from = %exchange.target_url(), to = %dest, "copying cookies for hand-off");
        let cookies = request_cookies(exchange.request_headers());
        append_set_cookies(&mut headers, &handoff_cookies(&cookies, &dest, config)?);
    } else {
        tracing::debug!(
            from = %exchange.target_url(),
            to = %dest,
            "hand-off target is another site, redirecting without cookies"
        );
    }

    let status = StatusCode::from_u16(config.handoff_redirect_status)
        .map_err(|_| NetError::invalid_config("handoff_redirect_status"))?;
    exchange
        .redirect_to(config.proxied_url(dest.as_str()), headers)
        .set_status(status);
    Ok(true)
}
