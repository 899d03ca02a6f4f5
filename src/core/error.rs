//! The error taxonomy a worker can encounter while reading and parsing a
//! single request, and the preemptive status each maps to.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnError {
    /// Read failed or the peer closed before a complete request arrived.
    IoError,
    /// The byte parser rejected the request as malformed.
    ParseError,
    /// The read buffer filled before the parser reached a complete request.
    RequestTooLong,
    /// A singleton header (Content-Type, Content-Length, Host) repeated.
    DuplicateHeader,
}

impl ConnError {
    /// The status a worker sends directly, bypassing the router, when this
    /// error preempts dispatch.
    pub fn preempt_status(&self) -> u16 {
        match self {
            ConnError::IoError => 500,
            ConnError::ParseError => 500,
            ConnError::RequestTooLong => 413,
            ConnError::DuplicateHeader => 400,
        }
    }
}

impl fmt::Display for ConnError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match self {
            ConnError::IoError => "i/o error reading request",
            ConnError::ParseError => "malformed HTTP/1 request",
            ConnError::RequestTooLong => "request exceeded the read buffer",
            ConnError::DuplicateHeader => "duplicate singleton header",
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for ConnError {}

/// Route registration is a startup-time, programmer-error surface: callers
/// are expected to treat these as fatal — a malformed pattern or a
/// colliding registration should panic, not be routed around at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    InvalidPattern(String),
    InvalidRegex { pattern: String, source: String },
    DuplicateRoute { pattern: String, method: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RouteError::InvalidPattern(p) => write!(f, "invalid route pattern: {}", p),
            RouteError::InvalidRegex { pattern, source } => {
                write!(f, "invalid regex in pattern {}: {}", pattern, source)
            }
            RouteError::DuplicateRoute { pattern, method } => {
                write!(f, "route {} already registered for {}", pattern, method)
            }
        }
    }
}

impl std::error::Error for RouteError {}
