//! Cookie handling for the proxy namespace.
//!
//! Remote origins are served from one proxy origin, each under its own
//! directory `<prefix><scheme>://<host>/`. This module keeps cookies scoped
//! to those directories:
//!
//! - **Codec**: `Cookie` header parsing, `Set-Cookie` serialization ([`codec`])
//! - **Rewriting**: re-scoping upstream `Set-Cookie` headers ([`setcookie`])
//! - **Hand-off**: carrying cookies across protocol and subdomain changes
//!   on the same site ([`carrier`])
//! - **Site lookup**: registrable-domain comparison ([`psl`])
//!
//! # Architecture
//!
//! | Stage | Function | Runs on |
//! |-------|----------|---------|
//! | Set-Cookie rewrite | [`setcookie::rewrite_response_cookies`] | every response |
//! | Outbound hand-off | [`carrier::carry_forward`] | responses with a pending redirect |
//! | Inbound hand-off | [`carrier::complete_handoff`] | every request |
//!
//! # Example
//!
//! ```rust
//! use proxynet::cookies::canonicalcookie::CanonicalCookie;
//! use proxynet::cookies::codec::{parse_cookie_header, serialize_cookie};
//!
//! let jar = parse_cookie_header("a=1; b=2");
//! assert_eq!(jar["a"], "1");
//!
//! let cookie = CanonicalCookie::new("a", "1").with_path("/x");
//! assert_eq!(serialize_cookie(&cookie), "a=1; Path=/x");
//! ```

pub mod canonicalcookie;
pub mod carrier;
pub mod codec;
pub mod psl;
pub mod setcookie;

pub use canonicalcookie::CanonicalCookie;
pub use psl::{PublicSuffixList, RegistrableDomain};
