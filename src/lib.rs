//! # proxynet
//!
//! Cookie and link rewriting for a path-prefixed web proxy.
//!
//! A proxy that serves many remote origins as
//! `https://proxy.host/<prefix><scheme>://<remote.host>/path` collapses them
//! onto a single browser origin. `proxynet` keeps cookies and sessions
//! working under that scheme:
//!
//! - `Set-Cookie` paths are mapped into the remote origin's proxy
//!   directory, with Domain and Secure stripped
//! - cookies are handed off when a site moves between protocols or
//!   subdomains of the same registrable domain
//! - embedded cross-origin links are routed through that hand-off
//! - HTML gets a `NOINDEX, NOFOLLOW` robots tag
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use proxynet::http::{BodyStream, ProxyExchange};
//! use proxynet::proxy::{ProxyConfig, RequestOutcome, RewritePipeline};
//! use std::sync::Arc;
//!
//! let pipeline = RewritePipeline::new(Arc::new(ProxyConfig::default()))?;
//!
//! let mut exchange = ProxyExchange::from_request_uri(pipeline.config(), uri, headers)?;
//! if pipeline.handle_request(&mut exchange)? == RequestOutcome::Redirected {
//!     if let Some(redirect) = exchange.take_client_redirect() {
//!         return redirect.into_response();
//!     }
//! }
//! // ... dispatch upstream, then:
//! exchange.set_response(upstream_headers, BodyStream::from_body(upstream_body));
//! pipeline.handle_response(&mut exchange)?;
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions and URL helpers
//! - [`cookies`] - Cookie codec, Set-Cookie rewriting, cross-origin hand-off
//! - [`http`] - The per-request exchange and body stream
//! - [`proxy`] - Configuration and the request/response pipeline
//! - [`rewrite`] - Streaming body transforms

pub mod base;
pub mod cookies;
pub mod http;
pub mod proxy;
pub mod rewrite;

pub use crate::base::NetError;
pub use crate::http::{BodyStream, ProxyExchange};
pub use crate::proxy::{ProxyConfig, RequestOutcome, RewritePipeline};
