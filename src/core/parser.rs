//! Reads bytes off a connection and drives `httparse` to a complete
//! request, populating a `Request`.

use crate::core::error::ConnError;
use crate::core::method::Method;
use crate::core::request::Request;
use crate::core::stream::ConnStream;
use std::io::{ErrorKind, Read};

const READ_BUFFER_SIZE: usize = 4096;
const MAX_HEADERS: usize = 64;

/// Reads from `stream` until a complete HTTP/1 request has been parsed, or
/// a terminal error occurs. On success, populates every field of `request`.
pub fn read_request(stream: &mut dyn ConnStream, request: &mut Request) -> Result<(), ConnError> {
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let mut filled = 0usize;

    let header_len = loop {
        let n = read_retrying_eintr(stream, &mut buf[filled..])?;
        if n == 0 {
            return Err(ConnError::IoError);
        }
        filled += n;

        let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
        let mut parsed = httparse::Request::new(&mut headers);

        match parsed.parse(&buf[..filled]) {
            Ok(httparse::Status::Complete(header_len)) => {
                populate_from_parsed(request, &parsed, header_len)?;
                break header_len;
            }
            Ok(httparse::Status::Partial) => {
                if filled == buf.len() {
                    return Err(ConnError::RequestTooLong);
                }
                continue;
            }
            Err(_) => return Err(ConnError::ParseError),
        }
    };

    request.peer_addr = stream.peer_addr().ok();

    let content_length = request.content_length().unwrap_or(0);
    let mut body = buf[header_len..filled].to_vec();

    while body.len() < content_length {
        let mut chunk = [0u8; READ_BUFFER_SIZE];
        let want = (content_length - body.len()).min(chunk.len());
        let n = read_retrying_eintr(stream, &mut chunk[..want])?;
        if n == 0 {
            break; // peer closed early; truncate to what we have
        }
        body.extend_from_slice(&chunk[..n]);
    }

    body.truncate(content_length);
    request.body = body;
    request.finalize_derived_fields();

    Ok(())
}

fn read_retrying_eintr(stream: &mut dyn ConnStream, buf: &mut [u8]) -> Result<usize, ConnError> {
    loop {
        match stream.read(buf) {
            Ok(n) => return Ok(n),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(_) => return Err(ConnError::IoError),
        }
    }
}

fn populate_from_parsed(
    request: &mut Request,
    parsed: &httparse::Request,
    _header_len: usize,
) -> Result<(), ConnError> {
    request.method = Method::parse(parsed.method.unwrap_or("GET"));
    request.path = parsed.path.unwrap_or("/").to_owned();
    request.minor_version = parsed.version.unwrap_or(1);

    for header in parsed.headers.iter() {
        let value = String::from_utf8_lossy(header.value);
        request
            .headers
            .insert(header.name, value.into_owned())
            .map_err(|_| ConnError::DuplicateHeader)?;
    }

    Ok(())
}

#[cfg(test)]
mod parser_test {
    use super::*;
    use std::io::{self, Write};
    use std::net::SocketAddr;

    struct MockStream {
        data: Vec<u8>,
        pos: usize,
    }

    impl MockStream {
        fn new(data: &[u8]) -> Self {
            MockStream {
                data: data.to_vec(),
                pos: 0,
            }
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let remaining = &self.data[self.pos..];
            let n = remaining.len().min(buf.len());
            buf[..n].copy_from_slice(&remaining[..n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl ConnStream for MockStream {
        fn peer_addr(&self) -> io::Result<SocketAddr> {
            Ok("127.0.0.1:0".parse().unwrap())
        }
        fn shutdown(&self) {}
    }

    #[test]
    fn parses_simple_get() {
        let raw = b"GET /hello HTTP/1.1\r\nHost: example.com\r\n\r\n";
        let mut stream = MockStream::new(raw);
        let mut req = Request::new();

        read_request(&mut stream, &mut req).unwrap();

        assert_eq!(req.method, Method::Get);
        assert_eq!(req.path, "/hello");
        assert_eq!(req.headers.get_first("Host"), Some("example.com"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn reads_declared_body() {
        let raw = b"POST /x HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let mut stream = MockStream::new(raw);
        let mut req = Request::new();

        read_request(&mut stream, &mut req).unwrap();

        assert_eq!(req.body, b"hello");
    }

    #[test]
    fn duplicate_content_type_is_rejected() {
        let raw = b"GET / HTTP/1.1\r\nContent-Type: a\r\nContent-Type: b\r\n\r\n";
        let mut stream = MockStream::new(raw);
        let mut req = Request::new();

        let err = read_request(&mut stream, &mut req).unwrap_err();
        assert_eq!(err, ConnError::DuplicateHeader);
        assert_eq!(err.preempt_status(), 400);
    }

    #[test]
    fn empty_stream_is_io_error() {
        let mut stream = MockStream::new(b"");
        let mut req = Request::new();

        let err = read_request(&mut stream, &mut req).unwrap_err();
        assert_eq!(err, ConnError::IoError);
    }

    #[test]
    fn oversized_headers_are_too_long() {
        let mut raw = b"GET / HTTP/1.1\r\n".to_vec();
        for i in 0..200 {
            raw.extend_from_slice(format!("X-Pad-{}: {}\r\n", i, "a".repeat(40)).as_bytes());
        }
        // deliberately no terminating blank line, so the parse never completes
        let mut stream = MockStream::new(&raw);
        let mut req = Request::new();

        let err = read_request(&mut stream, &mut req).unwrap_err();
        assert_eq!(err, ConnError::RequestTooLong);
    }
}
