//! Request/response hooks of the rewriting layer.
//!
//! The transport calls [`RewritePipeline::handle_request`] before
//! dispatching upstream and [`RewritePipeline::handle_response`] once
//! upstream headers are in. Header rewriting completes inside
//! `handle_response`; body stages are attached to the exchange's stream
//! and run as the transport polls it.

use crate::base::neterror::NetError;
use crate::cookies::carrier;
use crate::cookies::psl::{PublicSuffixList, RegistrableDomain};
use crate::cookies::setcookie;
use crate::http::contenttypes::{ContentClassifier, ContentTypes};
use crate::http::exchange::ProxyExchange;
use crate::proxy::config::ProxyConfig;
use crate::rewrite::linkscanner::LinkRewriter;
use crate::rewrite::metarobots::MetaRobotsInjector;
use std::sync::Arc;
use url::Url;

/// What the transport should do after [`RewritePipeline::handle_request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Proxy the request upstream.
    Continue,
    /// A client redirect was recorded on the exchange; do not proxy.
    Redirected,
}

/// The cookie and link rewriting layer, shared by all exchanges.
#[derive(Clone)]
pub struct RewritePipeline {
    config: Arc<ProxyConfig>,
    domains: Arc<dyn RegistrableDomain>,
    classifier: Arc<dyn ContentClassifier>,
}

impl RewritePipeline {
    /// Pipeline with the PSL-backed domain lookup and the config's
    /// content-type lists. Fails if the config does not validate.
    pub fn new(config: Arc<ProxyConfig>) -> Result<Self, NetError> {
        config.validate()?;
        let classifier = Arc::new(ContentTypes::from_config(&config));
        Ok(Self {
            config,
            domains: Arc::new(PublicSuffixList),
            classifier,
        })
    }

    pub fn with_registrable_domain(mut self, domains: Arc<dyn RegistrableDomain>) -> Self {
        self.domains = domains;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ContentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn config(&self) -> &ProxyConfig {
        &self.config
    }

    /// Inbound hook. Completes a cookie hand-off when the target carries
    /// the reserved parameter.
    pub fn handle_request(&self, exchange: &mut ProxyExchange) -> Result<RequestOutcome, NetError> {
        let redirected = carrier::complete_handoff(exchange, &self.config, self.domains.as_ref())
            .inspect_err(|e| log_failure("request", exchange.target_url(), e))?;
        if redirected {
            return Ok(RequestOutcome::Redirected);
        }
        Ok(RequestOutcome::Continue)
    }

    /// Outbound hook. Rewrites `Set-Cookie`, carries cookies across a
    /// same-site redirect, then attaches the body stages.
    pub fn handle_response(&self, exchange: &mut ProxyExchange) -> Result<(), NetError> {
        self.rewrite_response(exchange)
            .inspect_err(|e| log_failure("response", exchange.target_url(), e))
    }

    fn rewrite_response(&self, exchange: &mut ProxyExchange) -> Result<(), NetError> {
        if exchange.is_short_circuited() {
            return Ok(());
        }

        let fresh = setcookie::rewrite_response_cookies(exchange, &self.config)?;
        if exchange.redirect_url().is_some() {
            carrier::carry_forward(exchange, &self.config, self.domains.as_ref(), &fresh)?;
        }

        let content_type = exchange.content_type().to_string();
        if self.classifier.should_process(&content_type) {
            if let Some(links) =
                LinkRewriter::for_page(&self.config, exchange.target_url(), self.domains.clone())?
            {
                exchange.pipe_body(links);
            }
        }
        if self.config.meta_robots && self.classifier.is_html(&content_type) {
            exchange.pipe_body(MetaRobotsInjector::new());
        }

        Ok(())
    }
}

fn log_failure(hook: &'static str, url: &Url, err: &NetError) {
    if err.is_exchange_error() {
        tracing::debug!(hook, url = %url, code = err.as_i32(), error = %err, "rewrite failed");
    } else {
        tracing::warn!(hook, url = %url, code = err.as_i32(), error = %err, "proxy misconfigured");
    }
}

impl std::fmt::Debug for RewritePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RewritePipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
