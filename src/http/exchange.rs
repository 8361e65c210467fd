//! The per-request context threaded through the rewriting pipeline.
//!
//! One [`ProxyExchange`] exists per request/response cycle. Header stages
//! read and write the header maps; body stages replace the body stream.

use crate::base::context::parse_url;
use crate::base::neterror::NetError;
use crate::http::bodystream::BodyStream;
use crate::http::contenttypes::mime_essence;
use crate::proxy::config::ProxyConfig;
use bytes::Bytes;
use http::header::{HeaderMap, HeaderValue, CONTENT_TYPE, LOCATION};
use http::{Response, StatusCode};
use http_body_util::Full;
use url::Url;

/// A redirect issued to the client instead of proxying the request.
#[derive(Debug, Clone)]
pub struct ClientRedirect {
    status: StatusCode,
    location: String,
    headers: HeaderMap,
}

impl ClientRedirect {
    /// `location` is the value sent to the client, already mapped into
    /// the proxy namespace.
    pub fn new(location: impl Into<String>, headers: HeaderMap) -> Self {
        Self {
            status: StatusCode::TEMPORARY_REDIRECT,
            location: location.into(),
            headers,
        }
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Build the response the transport sends back to the client.
    pub fn into_response(self) -> Result<Response<Full<Bytes>>, NetError> {
        let location =
            HeaderValue::from_str(&self.location).map_err(|_| NetError::InvalidHeaderValue {
                name: LOCATION.to_string(),
            })?;

        let mut response = Response::new(Full::new(Bytes::new()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers;
        response.headers_mut().insert(LOCATION, location);
        Ok(response)
    }
}

/// Mutable state of one proxied request/response cycle.
#[derive(Debug)]
pub struct ProxyExchange {
    target_url: Url,
    redirect_url: Option<Url>,
    request_headers: HeaderMap,
    response_headers: HeaderMap,
    content_type: String,
    body: BodyStream,
    client_redirect: Option<ClientRedirect>,
}

impl ProxyExchange {
    pub fn new(target_url: Url, request_headers: HeaderMap) -> Self {
        Self {
            target_url,
            redirect_url: None,
            request_headers,
            response_headers: HeaderMap::new(),
            content_type: String::new(),
            body: BodyStream::empty(),
            client_redirect: None,
        }
    }

    /// Build an exchange from the inbound request target, e.g.
    /// `/proxy/https://remote.host/path?q=1`.
    pub fn from_request_uri(
        config: &ProxyConfig,
        request_uri: &str,
        request_headers: HeaderMap,
    ) -> Result<Self, NetError> {
        let remote = request_uri
            .strip_prefix(config.prefix.as_str())
            .unwrap_or(request_uri);
        Ok(Self::new(parse_url(remote)?, request_headers))
    }

    pub fn target_url(&self) -> &Url {
        &self.target_url
    }

    pub fn redirect_url(&self) -> Option<&Url> {
        self.redirect_url.as_ref()
    }

    /// Record that upstream answered with a 3xx to `url`.
    pub fn set_redirect_url(&mut self, url: Url) {
        self.redirect_url = Some(url);
    }

    pub fn request_headers(&self) -> &HeaderMap {
        &self.request_headers
    }

    pub fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }

    pub fn response_headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.response_headers
    }

    /// Mime essence of the upstream response, empty if none was sent.
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Install the upstream response headers and body.
    pub fn set_response(&mut self, headers: HeaderMap, body: BodyStream) {
        self.content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(mime_essence)
            .unwrap_or_default();
        self.response_headers = headers;
        self.body = body;
    }

    pub fn take_body(&mut self) -> BodyStream {
        std::mem::take(&mut self.body)
    }

    /// Attach a transform stage to the end of the body pipeline.
    pub fn pipe_body<T>(&mut self, transform: T)
    where
        T: crate::http::bodystream::ChunkTransform + 'static,
    {
        let body = self.take_body();
        self.body = body.pipe(transform);
    }

    /// Short-circuit the exchange with a redirect to the client.
    pub fn redirect_to(
        &mut self,
        location: impl Into<String>,
        extra_headers: HeaderMap,
    ) -> &mut ClientRedirect {
        self.client_redirect
            .insert(ClientRedirect::new(location, extra_headers))
    }

    pub fn is_short_circuited(&self) -> bool {
        self.client_redirect.is_some()
    }

    pub fn client_redirect(&self) -> Option<&ClientRedirect> {
        self.client_redirect.as_ref()
    }

    pub fn take_client_redirect(&mut self) -> Option<ClientRedirect> {
        self.client_redirect.take()
    }
}
