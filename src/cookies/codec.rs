//! `Cookie` request-header parsing and `Set-Cookie` serialization.
//!
//! Both directions are plain text manipulation: parsing never fails and
//! serialization never validates the characters it is given.

use crate::cookies::canonicalcookie::CanonicalCookie;
use http::header::{HeaderMap, COOKIE, SET_COOKIE};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use time::format_description::{self, BorrowedFormatItem};
use time::{OffsetDateTime, UtcOffset};

/// IMF-fixdate from RFC 7231 section 7.1.1.1, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
const IMF_FIXDATE: &str =
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT";

static IMF_FIXDATE_FORMAT: OnceLock<Option<Vec<BorrowedFormatItem<'static>>>> = OnceLock::new();

/// Parse a raw `Cookie` header into a name -> value map.
///
/// Segments are split on `;` with leading whitespace removed. The name is
/// everything before the first `=`; a segment without `=` maps to an empty
/// value. Later duplicates replace earlier ones. Empty segments are skipped.
pub fn parse_cookie_header(raw: &str) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();

    for segment in raw.split(';') {
        let segment = segment.trim_start();
        if segment.is_empty() {
            continue;
        }
        match segment.split_once('=') {
            Some((name, value)) => cookies.insert(name.to_string(), value.to_string()),
            None => cookies.insert(segment.to_string(), String::new()),
        };
    }

    cookies
}

/// Collect every `Cookie` header in a request.
///
/// HTTP/2 clients may split cookies across several header fields; they are
/// parsed in order so the last occurrence of a name still wins. Values are
/// decoded as UTF-8; a header that is not valid UTF-8 is ignored.
pub fn request_cookies(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut cookies = BTreeMap::new();
    for value in headers.get_all(COOKIE) {
        match std::str::from_utf8(value.as_bytes()) {
            Ok(raw) => cookies.extend(parse_cookie_header(raw)),
            Err(_) => tracing::debug!("ignoring non-UTF-8 cookie header"),
        }
    }
    cookies
}

/// Serialize a cookie into a `Set-Cookie` value.
///
/// Attributes are emitted in a fixed order: Max-Age, Domain, Path,
/// Expires, HttpOnly, Secure. An expiry that cannot be formatted is left
/// out.
pub fn serialize_cookie(cookie: &CanonicalCookie) -> String {
    let mut out = format!("{}={}", cookie.name, cookie.value);

    if let Some(max_age) = cookie.max_age {
        out.push_str(&format!("; Max-Age={}", max_age));
    }
    if let Some(domain) = &cookie.domain {
        out.push_str("; Domain=");
        out.push_str(domain);
    }
    if let Some(path) = &cookie.path {
        out.push_str("; Path=");
        out.push_str(path);
    }
    if let Some(expires) = cookie.expires {
        match format_http_date(expires) {
            Some(date) => {
                out.push_str("; Expires=");
                out.push_str(&date);
            }
            None => tracing::debug!(name = %cookie.name, "dropping unformattable cookie expiry"),
        }
    }
    if cookie.http_only == Some(true) {
        out.push_str("; HttpOnly");
    }
    if cookie.secure == Some(true) {
        out.push_str("; Secure");
    }

    out
}

/// Format a timestamp as an HTTP date, or `None` if it is out of range.
pub fn format_http_date(at: OffsetDateTime) -> Option<String> {
    let format = IMF_FIXDATE_FORMAT
        .get_or_init(|| format_description::parse_borrowed::<1>(IMF_FIXDATE).ok())
        .as_deref()?;
    at.to_offset(UtcOffset::UTC).format(format).ok()
}

/// Parse every `Set-Cookie` header of a response.
///
/// Lines the `cookie` crate rejects (no `=`, empty name) are skipped, as
/// are values that are not valid UTF-8.
pub fn response_set_cookies(headers: &HeaderMap) -> Vec<CanonicalCookie> {
    let mut cookies = Vec::new();
    for value in headers.get_all(SET_COOKIE) {
        let Ok(line) = std::str::from_utf8(value.as_bytes()) else {
            tracing::debug!("ignoring non-UTF-8 set-cookie header");
            continue;
        };
        match cookie::Cookie::parse(line) {
            Ok(parsed) => cookies.push(CanonicalCookie::from_parsed(&parsed)),
            Err(e) => tracing::debug!(error = %e, line = %line, "skipping unparsable set-cookie"),
        }
    }
    cookies
}
