//! Cookie parsing and `Set-Cookie` emission per RFC 6265.

use chrono::{DateTime, Utc};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub path: Option<String>,
    pub domain: Option<String>,
    pub expires: Option<DateTime<Utc>>,
    /// Negative value is a deletion directive and is emitted verbatim.
    pub max_age: Option<i64>,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: Option<SameSite>,
}

impl Cookie {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Cookie {
            name: name.into(),
            value: value.into(),
            ..Default::default()
        }
    }

    /// Marks this cookie for deletion on the client (`Max-Age=-1`).
    pub fn delete(name: impl Into<String>) -> Self {
        Cookie {
            name: name.into(),
            max_age: Some(-1),
            ..Default::default()
        }
    }

    /// Renders a single `Set-Cookie` header value, attributes in the fixed
    /// canonical order: Path, Domain, Expires, Max-Age, HttpOnly, Secure,
    /// SameSite.
    pub fn to_set_cookie_string(&self) -> String {
        let mut out = format!("{}={}", self.name, self.value);

        if let Some(ref path) = self.path {
            out.push_str(&format!("; Path={}", path));
        }
        if let Some(ref domain) = self.domain {
            out.push_str(&format!("; Domain={}", domain));
        }
        if let Some(expires) = self.expires {
            out.push_str(&format!(
                "; Expires={}",
                expires.format("%a, %d %b %Y %H:%M:%S GMT")
            ));
        }
        if let Some(max_age) = self.max_age {
            out.push_str(&format!("; Max-Age={}", max_age));
        }
        if self.http_only {
            out.push_str("; HttpOnly");
        }
        if self.secure {
            out.push_str("; Secure");
        }
        if let Some(same_site) = self.same_site {
            out.push_str(&format!("; SameSite={}", same_site));
        }

        out
    }
}

/// Parses a `Cookie` request-header value into ordered `(name, value)`
/// pairs. Splits on `;`, trims whitespace, splits each pair on the first
/// `=`. Malformed pairs (no `=`) are ignored silently.
pub fn parse_cookie_header(raw: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for part in raw.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some(eq_idx) = part.find('=') {
            let name = part[..eq_idx].trim();
            let value = part[eq_idx + 1..].trim();
            if !name.is_empty() {
                pairs.push((name.to_owned(), value.to_owned()));
            }
        }
        // no '=' present: malformed, ignored per spec
    }

    pairs
}
