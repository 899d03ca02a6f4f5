//! The mutable response accumulator built up by middleware and handlers.

use crate::http::{Cookie, HeaderMap};

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
    /// Set by a middleware to short-circuit the remainder of the chain.
    pub done: bool,
}

impl Default for Response {
    fn default() -> Self {
        Response {
            status: 200,
            headers: HeaderMap::new(),
            body: None,
            done: false,
        }
    }
}

impl Response {
    pub fn new() -> Self {
        Response::default()
    }

    pub fn status(&mut self, code: u16) -> &mut Self {
        self.status = code;
        self
    }

    /// Sets a header, overwriting any prior value(s) — the common case for
    /// a handler building a response, as opposed to the parser's stricter
    /// singleton-enforcing inserts on the request side.
    pub fn header(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
        self.headers.set(key, value);
        self
    }

    pub fn body(&mut self, body: impl Into<Vec<u8>>) -> &mut Self {
        self.body = Some(body.into());
        self
    }

    pub fn set_cookie(&mut self, cookie: &Cookie) -> &mut Self {
        self.headers
            .insert("Set-Cookie", cookie.to_set_cookie_string())
            .ok();
        self
    }

    /// Short-circuits the middleware chain: no subsequent middleware or the
    /// route handler will run, and the response is serialized as-is.
    pub fn abort(&mut self, status: u16) -> &mut Self {
        self.status = status;
        self.done = true;
        self
    }
}

pub fn reason_phrase(status: u16) -> &'static str {
    match status {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod response_test {
    use super::*;

    #[test]
    fn default_status_is_200() {
        assert_eq!(Response::new().status, 200);
    }

    #[test]
    fn abort_sets_done_and_status() {
        let mut resp = Response::new();
        resp.header("X-Authorized-By", "test").abort(401);
        assert_eq!(resp.status, 401);
        assert!(resp.done);
        assert_eq!(resp.headers.get_first("X-Authorized-By"), Some("test"));
    }
}
