//! The accept loop and per-connection read/dispatch/write cycle. No
//! keep-alive: one request, one response, then the socket closes.

use crate::core::method::Method;
use crate::core::parser::read_request;
use crate::core::request::Request;
use crate::core::response::Response;
use crate::core::serializer::serialize_into;
use crate::core::stream::ConnStream;
use crate::router::Router;
use crate::support::logger;
use crate::support::thread_pool::ThreadPool;
use std::io::{self, ErrorKind, Write};
use std::net::TcpListener;
use std::sync::Arc;

/// Accepts plain TCP connections and hands each one to the worker pool.
/// Runs until the listener itself errors out (e.g. the socket is closed).
pub fn accept_loop(listener: TcpListener, router: Arc<Router>, pool: &ThreadPool) {
    for incoming in listener.incoming() {
        let stream = match incoming {
            Ok(stream) => stream,
            Err(e) => {
                logger::warn(&format!("accept failed: {}", e));
                continue;
            }
        };

        let router = Arc::clone(&router);
        pool.execute(move || {
            handle_connection(Box::new(stream), &router);
        });
    }
}

/// As `accept_loop`, but performs a synchronous TLS handshake on each
/// accepted socket before dispatch. A failed handshake closes the raw
/// socket without ever reaching the worker pool.
#[cfg(feature = "tls")]
pub fn accept_loop_tls(
    listener: TcpListener,
    router: Arc<Router>,
    pool: &ThreadPool,
    acceptor: Arc<native_tls::TlsAcceptor>,
) {
    for incoming in listener.incoming() {
        let stream = match incoming {
            Ok(stream) => stream,
            Err(e) => {
                logger::warn(&format!("accept failed: {}", e));
                continue;
            }
        };

        let router = Arc::clone(&router);
        let acceptor = Arc::clone(&acceptor);
        pool.execute(move || match acceptor.accept(stream) {
            Ok(tls_stream) => handle_connection(Box::new(tls_stream), &router),
            Err(e) => logger::warn(&format!("tls handshake failed: {}", e)),
        });
    }
}

/// Reads one request, dispatches it (or builds a preemptive error response
/// if reading/parsing failed), serializes the response, and closes the
/// connection.
pub fn handle_connection(mut stream: Box<dyn ConnStream>, router: &Router) {
    let mut request = Request::new();

    let response = match read_request(stream.as_mut(), &mut request) {
        Ok(()) => {
            logger::debug(&format!(
                "request body ({} bytes): {}",
                request.body.len(),
                String::from_utf8_lossy(&request.body)
            ));
            router.dispatch(&mut request)
        }
        Err(err) => {
            logger::info(&format!("preempting dispatch: {}", err));
            let mut response = Response::new();
            response.status(err.preempt_status());
            response
        }
    };

    if let Err(e) = write_response(stream.as_mut(), &request.method, &response) {
        logger::warn(&format!("failed writing response: {}", e));
    }

    stream.shutdown();
}

fn write_response(stream: &mut dyn ConnStream, method: &Method, response: &Response) -> io::Result<()> {
    let mut buf = Vec::new();
    serialize_into(method, response, &mut buf)?;
    write_all_retrying(stream, &buf)
}

fn write_all_retrying(stream: &mut dyn ConnStream, mut buf: &[u8]) -> io::Result<()> {
    while !buf.is_empty() {
        match stream.write(buf) {
            Ok(0) => {
                return Err(io::Error::new(
                    ErrorKind::WriteZero,
                    "connection closed mid-write",
                ))
            }
            Ok(n) => buf = &buf[n..],
            Err(e) if e.kind() == ErrorKind::Interrupted || e.kind() == ErrorKind::WouldBlock => {
                continue
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
