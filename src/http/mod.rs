//! The HTTP message model: header canonicalization, cookies, and the
//! on-wire response format.

pub mod cookie;
pub mod header;

pub use cookie::{parse_cookie_header, Cookie, SameSite};
pub use header::{canonicalize, DuplicateSingleton, HeaderMap};
