//! Registrable-domain (eTLD+1) lookup.
//!
//! Decides whether two hosts belong to the same site for cookie hand-off
//! and link rewriting. The default implementation uses Mozilla's Public
//! Suffix List via the `psl` crate; transports that already carry a PSL
//! can plug their own in through [`RegistrableDomain`].

use std::net::IpAddr;

/// Computes the registrable domain of a hostname.
pub trait RegistrableDomain: Send + Sync {
    /// For "sub.example.com", returns "example.com". Returns `None` for
    /// hosts that have no registrable domain: public suffixes and IP
    /// literals.
    fn registrable_domain(&self, host: &str) -> Option<String>;

    /// Whether both hosts have a registrable domain and it is the same.
    fn same_site(&self, a: &str, b: &str) -> bool {
        match (self.registrable_domain(a), self.registrable_domain(b)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }
}

/// [`RegistrableDomain`] backed by the compiled-in Public Suffix List.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublicSuffixList;

impl RegistrableDomain for PublicSuffixList {
    fn registrable_domain(&self, host: &str) -> Option<String> {
        registrable_domain(host)
    }
}

/// Get the registrable domain (eTLD+1) for a host.
/// For "example.com", returns "example.com".
/// For "com" (public suffix) or "127.0.0.1", returns None.
pub fn registrable_domain(host: &str) -> Option<String> {
    let host = host.trim_end_matches('.');
    if is_ip_literal(host) {
        return None;
    }
    let host_lower = host.to_lowercase();
    psl::domain(host_lower.as_bytes())
        .and_then(|d| std::str::from_utf8(d.as_bytes()).ok())
        .map(|s| s.to_string())
}

fn is_ip_literal(host: &str) -> bool {
    let unbracketed = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);
    unbracketed.parse::<IpAddr>().is_ok()
}
