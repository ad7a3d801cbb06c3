//! Request and response values exchanged between the page, the worker, the
//! cache store and the network.
//!
//! Only what the caching engine inspects is modelled: method, URL and
//! request mode on the way in; status, headers and body on the way out.
//! Bodies are [`Bytes`] so a response can be cloned into the cache without
//! copying.

use bytes::Bytes;
use chrono::{DateTime, NaiveDateTime, Utc};
use url::Url;

/// RFC 850 (`Sunday, 06-Nov-94 08:49:37 GMT`) and asctime
/// (`Sun Nov  6 08:49:37 1994`).
const OBSOLETE_DATE_FORMATS: [&str; 2] = ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];

/// How the page issued the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Top-level page navigation.
    Navigate,
    #[default]
    SameOrigin,
    NoCors,
    Cors,
}

/// An intercepted request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: String,
    pub url: Url,
    pub mode: RequestMode,
}

impl Request {
    /// A subresource `GET`.
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            mode: RequestMode::SameOrigin,
        }
    }

    /// A page navigation.
    pub fn navigate(url: Url) -> Self {
        Self {
            mode: RequestMode::Navigate,
            ..Self::get(url)
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_ascii_uppercase();
        self
    }

    pub fn is_navigation(&self) -> bool {
        self.mode == RequestMode::Navigate
    }

    /// Key under which the response is cached: path plus query, no fragment.
    ///
    /// Only same-origin requests reach the cache, so the origin is implied.
    pub fn cache_key(&self) -> String {
        match self.url.query() {
            Some(q) => format!("{}?{}", self.url.path(), q),
            None => self.url.path().to_string(),
        }
    }
}

/// A response from the network, the cache, or synthesized by the worker.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Append a header. Names are stored lowercased.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_ascii_lowercase(), value.into()));
        self
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `true` for 2xx statuses; only these are written to the cache.
    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The `Date` header, if present and a valid HTTP date.
    ///
    /// IMF-fixdate is the norm; the obsolete RFC 850 and asctime forms are
    /// still accepted and read as UTC.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        let raw = self.header("date")?.trim();
        if let Ok(d) = DateTime::parse_from_rfc2822(raw) {
            return Some(d.with_timezone(&Utc));
        }
        OBSOLETE_DATE_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|d| d.and_utc())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
