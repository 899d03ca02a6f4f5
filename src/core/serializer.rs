//! Response wire-format serialization.

use crate::core::method::Method;
use crate::core::response::{reason_phrase, Response};
use std::io::{self, Write};

fn is_informational(status: u16) -> bool {
    status >= 100 && status < 200
}

fn is_2xx_connect(method: &Method, status: u16) -> bool {
    *method == Method::Connect && status >= 200 && status < 300
}

fn should_emit_content_length(method: &Method, status: u16) -> bool {
    !is_informational(status) && status != 204 && !is_2xx_connect(method, status)
}

/// Emits the status line, headers (comma-joined multi-values, insertion
/// order), a conditional `Content-Length`, the blank separator line, and
/// the body, in that order.
pub fn serialize_into<W: Write>(
    method: &Method,
    response: &Response,
    out: &mut W,
) -> io::Result<()> {
    write!(
        out,
        "HTTP/1.1 {} {}\r\n",
        response.status,
        reason_phrase(response.status)
    )?;

    for (key, values) in response.headers.iter() {
        write!(out, "{}: {}\r\n", key, values.join(","))?;
    }

    let body_len = response.body.as_ref().map(|b| b.len()).unwrap_or(0);
    if should_emit_content_length(method, response.status) {
        write!(out, "Content-Length: {}\r\n", body_len)?;
    }

    out.write_all(b"\r\n")?;

    if let Some(ref body) = response.body {
        out.write_all(body)?;
    }

    Ok(())
}

#[cfg(test)]
mod serializer_test {
    use super::*;

    fn render(method: Method, response: &Response) -> String {
        let mut buf = Vec::new();
        serialize_into(&method, response, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn ordinary_response_gets_content_length() {
        let mut resp = Response::new();
        resp.body("hi");
        let out = render(Method::Get, &resp);
        assert!(out.contains("Content-Length: 2\r\n"));
        assert!(out.ends_with("\r\n\r\nhi"));
    }

    #[test]
    fn no_content_length_for_204() {
        let mut resp = Response::new();
        resp.status(204);
        let out = render(Method::Get, &resp);
        assert!(!out.contains("Content-Length"));
    }

    #[test]
    fn no_content_length_for_1xx() {
        let mut resp = Response::new();
        resp.status(101);
        let out = render(Method::Get, &resp);
        assert!(!out.contains("Content-Length"));
    }

    #[test]
    fn no_content_length_for_connect_2xx() {
        let resp = Response::new();
        let out = render(Method::Connect, &resp);
        assert!(!out.contains("Content-Length"));
    }

    #[test]
    fn content_length_present_for_connect_non_2xx() {
        let mut resp = Response::new();
        resp.status(400);
        let out = render(Method::Connect, &resp);
        assert!(out.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn headers_joined_by_comma_in_insertion_order() {
        let mut resp = Response::new();
        resp.headers.insert("X-Multi", "a").unwrap();
        resp.headers.insert("x-multi", "b").unwrap();
        let out = render(Method::Get, &resp);
        assert!(out.contains("X-Multi: a,b\r\n"));
    }
}
