//! Cookie codec, Set-Cookie rewriting and hand-off integration tests.

use http::header::{HeaderMap, HeaderValue, COOKIE, SET_COOKIE};
use proxynet::cookies::canonicalcookie::CanonicalCookie;
use proxynet::cookies::carrier::{carry_forward, complete_handoff, needs_handoff};
use proxynet::cookies::codec::{parse_cookie_header, serialize_cookie};
use proxynet::cookies::psl::{registrable_domain, PublicSuffixList, RegistrableDomain};
use proxynet::cookies::setcookie::rewrite_response_cookies;
use proxynet::http::{BodyStream, ProxyExchange};
use proxynet::ProxyConfig;
use url::Url;

fn set_cookie_lines(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .map(|v| String::from_utf8(v.as_bytes().to_vec()).unwrap())
        .collect()
}

fn redirected_exchange(
    from: &str,
    to: &str,
    client_cookies: &'static str,
    set_cookies: &[&'static str],
) -> ProxyExchange {
    let mut request = HeaderMap::new();
    request.insert(COOKIE, HeaderValue::from_static(client_cookies));
    let mut exchange = ProxyExchange::new(Url::parse(from).unwrap(), request);

    let mut response = HeaderMap::new();
    for line in set_cookies {
        response.append(SET_COOKIE, HeaderValue::from_static(line));
    }
    exchange.set_response(response, BodyStream::empty());
    exchange.set_redirect_url(Url::parse(to).unwrap());
    exchange
}

#[test]
fn test_parse_cookie_header_examples() {
    let jar = parse_cookie_header("a=1; b=2");
    assert_eq!(jar.len(), 2);
    assert_eq!(jar["a"], "1");
    assert_eq!(jar["b"], "2");

    assert!(parse_cookie_header("").is_empty());
    assert_eq!(parse_cookie_header("flag")["flag"], "");
}

#[test]
fn test_serialize_cookie_example() {
    let cookie = CanonicalCookie::new("a", "1").with_path("/x");
    assert_eq!(serialize_cookie(&cookie), "a=1; Path=/x");
}

#[test]
fn test_rewrite_strips_leak_prone_attributes() {
    let config = ProxyConfig::default();
    let mut exchange = ProxyExchange::new(Url::parse("http://example.com/").unwrap(), HeaderMap::new());
    let mut response = HeaderMap::new();
    response.insert(
        SET_COOKIE,
        HeaderValue::from_static("s=v; Domain=example.com; Secure; Path=/"),
    );
    exchange.set_response(response, BodyStream::empty());

    rewrite_response_cookies(&mut exchange, &config).unwrap();

    let lines = set_cookie_lines(exchange.response_headers());
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("Path=/proxy/http://example.com/"));
    assert!(!lines[0].contains("Domain="));
    assert!(!lines[0].contains("; Secure"));
}

#[test]
fn test_carrier_same_site_redirect() {
    let config = ProxyConfig::default();
    let mut exchange = redirected_exchange(
        "http://a.example.com/x",
        "https://b.example.com/y",
        "sid=abc; theme=dark",
        &[],
    );

    let fresh = rewrite_response_cookies(&mut exchange, &config).unwrap();
    let added = carry_forward(&mut exchange, &config, &PublicSuffixList, &fresh).unwrap();

    assert_eq!(added, 2);
    assert_eq!(
        set_cookie_lines(exchange.response_headers()),
        vec![
            "sid=abc; Path=/proxy/https://b.example.com/",
            "theme=dark; Path=/proxy/https://b.example.com/",
        ]
    );
}

#[test]
fn test_carrier_other_site_redirect() {
    let config = ProxyConfig::default();
    let mut exchange = redirected_exchange(
        "http://a.example.com/x",
        "https://evil.org/y",
        "sid=abc",
        &[],
    );

    let added = carry_forward(&mut exchange, &config, &PublicSuffixList, &[]).unwrap();
    assert_eq!(added, 0);
    assert!(!exchange.response_headers().contains_key(SET_COOKIE));
}

#[test]
fn test_server_cookie_wins_over_carried() {
    let config = ProxyConfig::default();
    let mut exchange = redirected_exchange(
        "http://a.example.com/login",
        "https://b.example.com/home",
        "sid=old; keep=1",
        &["sid=new; HttpOnly"],
    );

    let fresh = rewrite_response_cookies(&mut exchange, &config).unwrap();
    carry_forward(&mut exchange, &config, &PublicSuffixList, &fresh).unwrap();

    assert_eq!(
        set_cookie_lines(exchange.response_headers()),
        vec![
            "sid=new; Path=/proxy/https://b.example.com/; HttpOnly",
            "keep=1; Path=/proxy/https://b.example.com/",
        ]
    );
}

#[test]
fn test_same_origin_redirect_carries_nothing() {
    let psl = PublicSuffixList;
    let from = Url::parse("https://site.com/a").unwrap();
    let to = Url::parse("https://site.com/b").unwrap();
    assert!(!needs_handoff(&from, &to, &psl));
}

#[test]
fn test_registrable_domain_lookup() {
    assert_eq!(
        registrable_domain("www.bbc.co.uk"),
        Some("bbc.co.uk".to_string())
    );
    assert!(PublicSuffixList.same_site("a.example.com", "example.com"));
    assert!(!PublicSuffixList.same_site("github.io", "github.io"));
}

#[test]
fn test_handoff_keeps_utf8_cookie_values() {
    let config = ProxyConfig::default();
    let target = Url::parse(
        "http://shop.site.com/x?__proxy_cookies_to=http%3A%2F%2Fshop.site.com%2Fx",
    )
    .unwrap();
    let mut request = HeaderMap::new();
    request.insert(COOKIE, HeaderValue::from_bytes("sid=abc; name=café".as_bytes()).unwrap());
    let mut exchange = ProxyExchange::new(target, request);

    assert!(complete_handoff(&mut exchange, &config, &PublicSuffixList).unwrap());

    let redirect = exchange.client_redirect().unwrap();
    assert_eq!(
        set_cookie_lines(redirect.headers()),
        vec![
            "name=café; Path=/proxy/http://shop.site.com/",
            "sid=abc; Path=/proxy/http://shop.site.com/",
        ]
    );
}

#[test]
fn test_rewrite_keeps_utf8_set_cookie() {
    let config = ProxyConfig::default();
    let mut exchange = ProxyExchange::new(Url::parse("http://site.com/").unwrap(), HeaderMap::new());
    let mut response = HeaderMap::new();
    response.append(
        SET_COOKIE,
        HeaderValue::from_bytes("name=café; Path=/".as_bytes()).unwrap(),
    );
    response.append(SET_COOKIE, HeaderValue::from_static("id=1"));
    exchange.set_response(response, BodyStream::empty());

    rewrite_response_cookies(&mut exchange, &config).unwrap();

    assert_eq!(
        set_cookie_lines(exchange.response_headers()),
        vec![
            "name=café; Path=/proxy/http://site.com/",
            "id=1; Path=/proxy/http://site.com/",
        ]
    );
}
