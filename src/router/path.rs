//! Turns a route pattern into a sequence of literal/parameter segments.

use crate::core::error::RouteError;
use crate::router::regex_cache::RegexCache;
use regex::Regex;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub enum Segment {
    Literal(String),
    Param {
        name: String,
        regex: Option<Arc<Regex>>,
        /// `:name[]` — brackets present but empty. The route compiles
        /// successfully but this segment never matches a value.
        never_matches: bool,
    },
    /// The literal pattern `*`: matches any remaining path. Must be the
    /// last segment of a pattern.
    Wildcard,
}

/// Splits a raw path or pattern into the segments the trie walks one level
/// per segment. A leading `/` is stripped; all other `/`-delimited pieces
/// are kept verbatim, including a trailing empty piece, so that a trailing
/// slash produces one more (empty) segment than its slash-less sibling —
/// this is what makes `/a` and `/a/` distinct routes. An empty path is
/// treated the same as `/`.
pub fn split_path_segments(path: &str) -> Vec<&str> {
    let path = if path.is_empty() { "/" } else { path };
    let stripped = path.strip_prefix('/').unwrap_or(path);
    stripped.split('/').collect()
}

/// Compiles a route pattern (e.g. `/users/:id[^\d+$]/posts/:slug`) into its
/// segments, resolving each parameter's regex through `cache`.
pub fn compile_pattern(pattern: &str, cache: &RegexCache) -> Result<Vec<Segment>, RouteError> {
    let mut segments = Vec::new();
    let raws = split_path_segments(pattern);
    let last = raws.len().saturating_sub(1);

    for (i, raw) in raws.into_iter().enumerate() {
        if raw == "*" {
            if i != last {
                return Err(RouteError::InvalidPattern(pattern.to_owned()));
            }
            segments.push(Segment::Wildcard);
        } else {
            segments.push(compile_segment(raw, cache)?);
        }
    }

    Ok(segments)
}

fn compile_segment(raw: &str, cache: &RegexCache) -> Result<Segment, RouteError> {
    if !raw.starts_with(':') {
        return Ok(Segment::Literal(raw.to_owned()));
    }

    let body = &raw[1..];
    let (name, bracket) = match body.find('[') {
        Some(open) => {
            if !body.ends_with(']') {
                return Err(RouteError::InvalidPattern(raw.to_owned()));
            }
            (&body[..open], Some(&body[open + 1..body.len() - 1]))
        }
        None => (body, None),
    };

    if name.is_empty() {
        return Err(RouteError::InvalidPattern(raw.to_owned()));
    }

    match bracket {
        None => {
            let regex = cache
                .get_or_compile("(.+)")
                .map_err(|e| RouteError::InvalidRegex {
                    pattern: "(.+)".to_owned(),
                    source: e,
                })?;
            Ok(Segment::Param {
                name: name.to_owned(),
                regex: Some(regex),
                never_matches: false,
            })
        }
        Some("") => Ok(Segment::Param {
            name: name.to_owned(),
            regex: None,
            never_matches: true,
        }),
        Some(pat) => {
            let regex = cache
                .get_or_compile(pat)
                .map_err(|e| RouteError::InvalidRegex {
                    pattern: pat.to_owned(),
                    source: e,
                })?;
            Ok(Segment::Param {
                name: name.to_owned(),
                regex: Some(regex),
                never_matches: false,
            })
        }
    }
}

/// Splits `s` on `/` and discards empties, returning the literal
/// substrings in order. Used by tests and by route-pattern rendering.
pub fn expand_path(s: &str) -> Vec<&str> {
    s.split('/').filter(|p| !p.is_empty()).collect()
}

/// Returns a 0- or 2-element sequence: empty if `s` has no segment content
/// or only one segment, else `[first, rest]` where `rest` retains its
/// leading `/`.
pub fn path_split_first_slash(s: &str) -> Vec<&str> {
    if s.len() < 2 {
        return Vec::new();
    }

    match s[1..].find('/') {
        None => Vec::new(),
        Some(rel_idx) => {
            let idx = rel_idx + 1;
            if idx + 1 >= s.len() {
                // trailing slash with nothing after it: only one segment
                Vec::new()
            } else {
                vec![&s[..idx], &s[idx..]]
            }
        }
    }
}

#[cfg(test)]
mod path_test {
    use super::*;

    #[test]
    fn expand_path_splits_on_slash() {
        assert_eq!(expand_path("/path/to/route"), vec!["path", "to", "route"]);
    }

    #[test]
    fn expand_path_root_is_empty() {
        assert_eq!(expand_path("/"), Vec::<&str>::new());
        assert_eq!(expand_path(""), Vec::<&str>::new());
    }

    #[test]
    fn path_split_first_slash_cases() {
        assert_eq!(path_split_first_slash("/api"), Vec::<&str>::new());
        assert_eq!(path_split_first_slash("/api/demo"), vec!["/api", "/demo"]);
        assert_eq!(
            path_split_first_slash("/api/demo/cookie"),
            vec!["/api", "/demo/cookie"]
        );
        assert_eq!(path_split_first_slash("/"), Vec::<&str>::new());
        assert_eq!(path_split_first_slash(""), Vec::<&str>::new());
        assert_eq!(path_split_first_slash("api"), Vec::<&str>::new());
        assert_eq!(path_split_first_slash("api/"), Vec::<&str>::new());
        assert_eq!(path_split_first_slash("api/demo"), vec!["api", "/demo"]);
    }

    #[test]
    fn compile_pattern_literal_and_param() {
        let cache = RegexCache::new();
        let segments = compile_pattern("/users/:id[^\\d+$]/posts/:slug", &cache).unwrap();
        assert_eq!(segments.len(), 4);
        match &segments[0] {
            Segment::Literal(s) => assert_eq!(s, "users"),
            _ => panic!("expected literal"),
        }
        match &segments[1] {
            Segment::Param { name, regex, never_matches } => {
                assert_eq!(name, "id");
                assert!(!*never_matches);
                assert!(regex.as_ref().unwrap().is_match("42"));
                assert!(!regex.as_ref().unwrap().is_match("abc"));
            }
            _ => panic!("expected param"),
        }
        match &segments[3] {
            Segment::Param { name, regex, never_matches } => {
                assert_eq!(name, "slug");
                assert!(!*never_matches);
                assert!(regex.as_ref().unwrap().is_match("anything"));
            }
            _ => panic!("expected param"),
        }
    }

    #[test]
    fn empty_brackets_never_match() {
        let cache = RegexCache::new();
        let segments = compile_pattern("/x/:id[]", &cache).unwrap();
        match &segments[1] {
            Segment::Param { never_matches, .. } => assert!(*never_matches),
            _ => panic!("expected param"),
        }
    }

    #[test]
    fn split_path_segments_distinguishes_trailing_slash() {
        assert_eq!(split_path_segments("/a"), vec!["a"]);
        assert_eq!(split_path_segments("/a/"), vec!["a", ""]);
        assert_eq!(split_path_segments("/"), vec![""]);
        assert_eq!(split_path_segments(""), vec![""]);
    }

    #[test]
    fn compile_pattern_wildcard_must_be_last() {
        let cache = RegexCache::new();
        assert!(compile_pattern("/static/*/nope", &cache).is_err());
        let segments = compile_pattern("/static/*", &cache).unwrap();
        assert!(matches!(segments.last(), Some(Segment::Wildcard)));
    }

    #[test]
    fn missing_regex_defaults_to_capture_anything() {
        let cache = RegexCache::new();
        let segments = compile_pattern("/x/:id", &cache).unwrap();
        match &segments[1] {
            Segment::Param { regex, .. } => {
                assert!(regex.as_ref().unwrap().is_match("anything-at-all"));
            }
            _ => panic!("expected param"),
        }
    }
}
