//! Canonicalizing, multi-value header store.

use hashbrown::HashMap;
use std::fmt;

lazy_static! {
    /// RFC 7230 §3.2.6 token characters. Index by byte value; bytes >= 128
    /// are never valid token bytes and fall through the bounds check in
    /// `is_token_byte`.
    static ref TOKEN_TABLE: [bool; 128] = build_token_table();

    static ref SINGLETON_HEADERS: [&'static str; 3] =
        ["Content-Type", "Content-Length", "Host"];
}

fn build_token_table() -> [bool; 128] {
    let mut table = [false; 128];
    for b in b'0'..=b'9' {
        table[b as usize] = true;
    }
    for b in b'a'..=b'z' {
        table[b as usize] = true;
    }
    for b in b'A'..=b'Z' {
        table[b as usize] = true;
    }
    for &b in b"!#$%&'*+-.^_`|~".iter() {
        table[b as usize] = true;
    }
    table
}

#[inline]
fn is_token_byte(b: u8) -> bool {
    (b as usize) < 128 && TOKEN_TABLE[b as usize]
}

fn is_singleton(key: &str) -> bool {
    SINGLETON_HEADERS.iter().any(|s| s.eq_ignore_ascii_case(key))
}

/// Converts a header key to canonical MIME form: the first letter and the
/// letter following each `-` are upper-cased, all other ASCII letters are
/// lower-cased. A key containing a non-token byte is returned unchanged.
pub fn canonicalize(key: &str) -> String {
    if !key.bytes().all(is_token_byte) {
        return key.to_owned();
    }

    let mut out = String::with_capacity(key.len());
    let mut upper = true;
    for c in key.chars() {
        if upper && c.is_ascii_lowercase() {
            out.push(c.to_ascii_uppercase());
        } else if !upper && c.is_ascii_uppercase() {
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
        upper = c == '-';
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateSingleton;

impl fmt::Display for DuplicateSingleton {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "duplicate insertion of a singleton header")
    }
}

impl std::error::Error for DuplicateSingleton {}

/// A canonicalizing, insertion-ordered, multi-value header map.
///
/// Keys crossing the boundary (insert or lookup) are always canonicalized
/// first. Values for a key are kept in insertion order; singleton headers
/// (`Content-Type`, `Content-Length`, `Host`) reject a second insertion.
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    // Order of first-seen keys, so `iter()` can emit in insertion order even
    // though `hashbrown::HashMap` itself does not guarantee one.
    order: Vec<String>,
    values: HashMap<String, Vec<String>>,
}

impl HeaderMap {
    pub fn new() -> Self {
        HeaderMap {
            order: Vec::new(),
            values: HashMap::new(),
        }
    }

    /// Inserts a value under `key`. Returns `Err(DuplicateSingleton)` if
    /// `key` is a singleton header and already has a value.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) -> Result<(), DuplicateSingleton> {
        let canon = canonicalize(key);

        match self.values.get_mut(&canon) {
            Some(existing) => {
                if is_singleton(&canon) {
                    return Err(DuplicateSingleton);
                }
                existing.push(value.into());
            }
            None => {
                self.order.push(canon.clone());
                self.values.insert(canon, vec![value.into()]);
            }
        }

        Ok(())
    }

    /// Unconditionally sets `key` to a single value, discarding prior values.
    /// Used by handlers/middleware building a response, where overwriting a
    /// header is the common case rather than an error.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        let canon = canonicalize(key);
        if !self.values.contains_key(&canon) {
            self.order.push(canon.clone());
        }
        self.values.insert(canon, vec![value.into()]);
    }

    pub fn get_first(&self, key: &str) -> Option<&str> {
        let canon = canonicalize(key);
        self.values.get(&canon)?.first().map(|s| s.as_str())
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        let canon = canonicalize(key);
        self.values
            .get(&canon)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(&canonicalize(key))
    }

    /// Iterates headers in insertion order, one `(key, values)` pair per key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.order
            .iter()
            .map(move |k| (k.as_str(), self.values[k].as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
