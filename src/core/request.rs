//! The immutable (from the handler's perspective) request object.

use crate::core::method::Method;
use crate::http::{parse_cookie_header, HeaderMap};
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    /// Raw path as received, percent-decoding not performed.
    pub path: String,
    pub minor_version: u8,
    pub headers: HeaderMap,
    /// Path parameters captured by the router, in the order they appear in
    /// the matched pattern.
    pub params: Vec<(String, String)>,
    pub cookies: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub peer_addr: Option<SocketAddr>,
}

impl Request {
    pub(crate) fn new() -> Self {
        Request {
            method: Method::Get,
            path: String::new(),
            minor_version: 1,
            headers: HeaderMap::new(),
            params: Vec::new(),
            cookies: Vec::new(),
            body: Vec::new(),
            peer_addr: None,
        }
    }

    pub(crate) fn finalize_derived_fields(&mut self) {
        if let Some(raw) = self.headers.get_first("Cookie") {
            self.cookies = parse_cookie_header(raw);
        }
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get_first("Content-Type")
    }

    pub fn accept(&self) -> Option<&str> {
        self.headers.get_first("Accept")
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.headers.get_first("User-Agent")
    }

    pub fn content_length(&self) -> Option<usize> {
        self.headers.get_first("Content-Length")?.parse().ok()
    }

    /// Returns the first captured value for a path parameter, if any.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod request_test {
    use super::*;

    #[test]
    fn param_lookup_finds_first_match() {
        let mut req = Request::new();
        req.params.push(("id".to_owned(), "42".to_owned()));
        assert_eq!(req.param("id"), Some("42"));
        assert_eq!(req.param("missing"), None);
    }

    #[test]
    fn cookies_populated_from_header() {
        let mut req = Request::new();
        req.headers.insert("Cookie", "a=1; b=2").unwrap();
        req.finalize_derived_fields();
        assert_eq!(
            req.cookies,
            vec![("a".to_owned(), "1".to_owned()), ("b".to_owned(), "2".to_owned())]
        );
    }
}
