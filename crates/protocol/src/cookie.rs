//! Cookie wire type.
//!
//! PhantomJS represents cookie expiry twice on the wire: as the standard
//! HTTP cookie-expiry date string (`expires`) and as unix seconds
//! (`expiry`). A cookie set from a timestamp alone must come back carrying
//! the derived string form, so the conversion lives here rather than in
//! callers.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// The HTTP cookie-expiry date format, e.g. `Thu, 02 Jan 2020 03:04:05 GMT`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A browser cookie.
///
/// `expires` is `None` for session cookies. `raw_expires` holds the
/// string-formatted expiry as it appeared (or will appear) on the wire;
/// when empty it is derived from `expires` during encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireCookie", into = "WireCookie")]
pub struct Cookie {
    pub domain: String,
    pub name: String,
    pub value: String,
    pub path: String,
    pub expires: Option<DateTime<Utc>>,
    pub raw_expires: String,
    pub secure: bool,
    pub http_only: bool,
}

impl Cookie {
    /// Creates a session cookie with the required fields.
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            value: value.into(),
            ..Self::default()
        }
    }

    /// Sets the path for the cookie.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the expiration timestamp. Wire precision is whole seconds.
    pub fn expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    /// Sets whether the cookie requires HTTPS.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets whether the cookie is HTTP-only.
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// The string-formatted expiry: `raw_expires` if present, otherwise
    /// derived from the timestamp. `None` for session cookies.
    pub fn formatted_expiry(&self) -> Option<String> {
        if !self.raw_expires.is_empty() {
            return Some(self.raw_expires.clone());
        }
        self.expires
            .map(|t| t.format(HTTP_DATE_FORMAT).to_string())
    }
}

/// On-the-wire shape of a cookie, as the engine's cookie jar produces it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct WireCookie {
    name: String,
    value: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    domain: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expires: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry: Option<i64>,
    #[serde(default)]
    secure: bool,
    #[serde(default)]
    httponly: bool,
}

impl From<Cookie> for WireCookie {
    fn from(cookie: Cookie) -> Self {
        let expiry = cookie.expires.map(|t| t.timestamp());
        let expires = cookie.formatted_expiry();
        Self {
            name: cookie.name,
            value: cookie.value,
            domain: cookie.domain,
            path: cookie.path,
            expires,
            expiry,
            secure: cookie.secure,
            httponly: cookie.http_only,
        }
    }
}

impl From<WireCookie> for Cookie {
    fn from(wire: WireCookie) -> Self {
        let raw_expires = wire.expires.unwrap_or_default();
        // The numeric field is authoritative; the string is a fallback for
        // jars that only report the formatted form.
        let expires = wire
            .expiry
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
            .or_else(|| parse_http_date(&raw_expires));
        Self {
            domain: wire.domain,
            name: wire.name,
            value: wire.value,
            path: wire.path,
            expires,
            raw_expires,
            secure: wire.secure,
            http_only: wire.httponly,
        }
    }
}

fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    if s.is_empty() {
        return None;
    }
    NaiveDateTime::parse_from_str(s, HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}
