use time::OffsetDateTime;

/// A cookie as it crosses the proxy.
///
/// Every attribute is optional and tri-state: `None` means the attribute
/// was absent, which is distinct from a present zero `max_age` or a
/// present `false` flag.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CanonicalCookie {
    pub name: String,
    pub value: String,
    pub domain: Option<String>,
    pub path: Option<String>,
    /// Max-Age in seconds. May be zero or negative (immediate expiry).
    pub max_age: Option<i64>,
    pub expires: Option<OffsetDateTime>,
    pub http_only: Option<bool>,
    pub secure: Option<bool>,
}

impl CanonicalCookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn with_max_age(mut self, seconds: i64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    pub fn with_expires(mut self, expires: OffsetDateTime) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Build from a `Set-Cookie` line parsed by the `cookie` crate.
    ///
    /// Attributes the proxy never re-emits (SameSite, Partitioned) are
    /// not carried.
    pub fn from_parsed(parsed: &cookie::Cookie<'_>) -> Self {
        Self {
            name: parsed.name().to_string(),
            value: parsed.value().to_string(),
            domain: parsed.domain().map(str::to_string),
            path: parsed.path().map(str::to_string),
            max_age: parsed.max_age().map(|d| d.whole_seconds()),
            expires: parsed.expires().and_then(|e| e.datetime()),
            http_only: parsed.http_only(),
            secure: parsed.secure(),
        }
    }
}
