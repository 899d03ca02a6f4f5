//! Ordered trie of path segments holding per-method handler records.

use crate::core::error::RouteError;
use crate::core::method::Method;
use crate::router::middleware::{CorsDescriptor, Middleware};
use crate::router::path::{split_path_segments, Segment};
use crate::core::request::Request;
use crate::core::response::Response;
use hashbrown::HashMap;
use regex::Regex;
use std::sync::Arc;

pub type Handler = Arc<dyn Fn(&Request, &mut Response) + Send + Sync>;

pub struct HandlerRecord {
    pub handler: Handler,
    pub middlewares: Vec<Middleware>,
    pub cors: Option<CorsDescriptor>,
}

struct ParamChild {
    name: String,
    regex: Option<Arc<Regex>>,
    never_matches: bool,
    node: Node,
}

#[derive(Default)]
struct Node {
    literal_children: HashMap<String, Node>,
    param_children: Vec<ParamChild>,
    wildcard_child: Option<Box<Node>>,
    handlers: HashMap<Method, Arc<HandlerRecord>>,
}

impl Node {
    fn insert(
        &mut self,
        segments: &[Segment],
        method: Method,
        record: Arc<HandlerRecord>,
        pattern: &str,
    ) -> Result<(), RouteError> {
        let (head, rest) = match segments.split_first() {
            None => {
                if self.handlers.contains_key(&method) {
                    return Err(RouteError::DuplicateRoute {
                        pattern: pattern.to_owned(),
                        method: method.to_string(),
                    });
                }
                self.handlers.insert(method, record);
                return Ok(());
            }
            Some(pair) => pair,
        };

        match head {
            Segment::Literal(lit) => self
                .literal_children
                .entry(lit.clone())
                .or_insert_with(Node::default)
                .insert(rest, method, record, pattern),
            Segment::Param {
                name,
                regex,
                never_matches,
            } => {
                let idx = self.param_children.iter().position(|pc| {
                    pc.name == *name
                        && pc.never_matches == *never_matches
                        && regex_source(&pc.regex) == regex_source(regex)
                });
                let idx = idx.unwrap_or_else(|| {
                    self.param_children.push(ParamChild {
                        name: name.clone(),
                        regex: regex.clone(),
                        never_matches: *never_matches,
                        node: Node::default(),
                    });
                    self.param_children.len() - 1
                });
                self.param_children[idx]
                    .node
                    .insert(rest, method, record, pattern)
            }
            Segment::Wildcard => {
                if !rest.is_empty() {
                    return Err(RouteError::InvalidPattern(pattern.to_owned()));
                }
                self.wildcard_child
                    .get_or_insert_with(|| Box::new(Node::default()))
                    .insert(&[], method, record, pattern)
            }
        }
    }

    fn find<'a>(
        &'a self,
        segments: &[&str],
    ) -> Option<(&'a Node, Vec<(String, String)>)> {
        if segments.is_empty() {
            return Some((self, Vec::new()));
        }

        let head = segments[0];
        let rest = &segments[1..];

        if let Some(child) = self.literal_children.get(head) {
            if let Some(found) = child.find(rest) {
                return Some(found);
            }
        }

        for pc in &self.param_children {
            if pc.never_matches {
                continue;
            }
            if let Some(ref re) = pc.regex {
                if !re.is_match(head) {
                    continue;
                }
            }
            if let Some((leaf, mut params)) = pc.node.find(rest) {
                params.insert(0, (pc.name.clone(), head.to_owned()));
                return Some((leaf, params));
            }
        }

        if let Some(ref wc) = self.wildcard_child {
            return Some((wc, Vec::new()));
        }

        None
    }
}

fn regex_source(regex: &Option<Arc<Regex>>) -> Option<&str> {
    regex.as_ref().map(|r| r.as_str())
}

pub enum LookupResult {
    Matched {
        record: Arc<HandlerRecord>,
        params: Vec<(String, String)>,
    },
    MethodNotAllowed,
    NotFound,
}

#[derive(Default)]
pub struct RouteTrie {
    root: Node,
}

impl RouteTrie {
    pub fn new() -> Self {
        RouteTrie::default()
    }

    pub fn register(
        &mut self,
        pattern: &str,
        segments: &[Segment],
        methods: &[Method],
        record: HandlerRecord,
    ) -> Result<(), RouteError> {
        let record = Arc::new(record);
        for method in methods {
            self.root
                .insert(segments, method.clone(), Arc::clone(&record), pattern)?;
        }
        Ok(())
    }

    pub fn lookup(&self, method: &Method, path: &str) -> LookupResult {
        let segments = split_path_segments(path);

        match self.root.find(&segments) {
            None => LookupResult::NotFound,
            Some((leaf, params)) => match leaf.handlers.get(method) {
                Some(record) => LookupResult::Matched {
                    record: Arc::clone(record),
                    params,
                },
                None if leaf.handlers.is_empty() => LookupResult::NotFound,
                None => LookupResult::MethodNotAllowed,
            },
        }
    }
}

#[cfg(test)]
mod trie_test {
    use super::*;
    use crate::router::regex_cache::RegexCache;
    use crate::router::path::compile_pattern;

    fn record() -> HandlerRecord {
        HandlerRecord {
            handler: Arc::new(|_req, resp| {
                resp.body("ok");
            }),
            middlewares: Vec::new(),
            cors: None,
        }
    }

    #[test]
    fn trailing_slash_is_a_distinct_route() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();

        let a = compile_pattern("/a", &cache).unwrap();
        trie.register("/a", &a, &[Method::Get], record()).unwrap();

        assert!(matches!(trie.lookup(&Method::Get, "/a"), LookupResult::Matched { .. }));
        assert!(matches!(trie.lookup(&Method::Get, "/a/"), LookupResult::NotFound));
    }

    #[test]
    fn root_matches_empty_and_slash() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();
        let root = compile_pattern("/", &cache).unwrap();
        trie.register("/", &root, &[Method::Get], record()).unwrap();

        assert!(matches!(trie.lookup(&Method::Get, "/"), LookupResult::Matched { .. }));
        assert!(matches!(trie.lookup(&Method::Get, ""), LookupResult::Matched { .. }));
    }

    #[test]
    fn method_mismatch_is_method_not_allowed() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();
        let x = compile_pattern("/x", &cache).unwrap();
        trie.register("/x", &x, &[Method::Post], record()).unwrap();

        assert!(matches!(trie.lookup(&Method::Get, "/x"), LookupResult::MethodNotAllowed));
    }

    #[test]
    fn unknown_path_is_not_found() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();
        let root = compile_pattern("/", &cache).unwrap();
        trie.register("/", &root, &[Method::Get], record()).unwrap();

        assert!(matches!(trie.lookup(&Method::Get, "/nope"), LookupResult::NotFound));
    }

    #[test]
    fn captures_parameters_in_order() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();
        let pattern = compile_pattern("/u/:id[^\\d+$]", &cache).unwrap();
        trie.register("/u/:id[^\\d+$]", &pattern, &[Method::Get], record())
            .unwrap();

        match trie.lookup(&Method::Get, "/u/42") {
            LookupResult::Matched { params, .. } => {
                assert_eq!(params, vec![("id".to_owned(), "42".to_owned())]);
            }
            _ => panic!("expected a match"),
        }

        assert!(matches!(trie.lookup(&Method::Get, "/u/abc"), LookupResult::NotFound));
    }

    #[test]
    fn literal_takes_priority_over_param_on_equal_length_prefix() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();

        let lit = compile_pattern("/u/me", &cache).unwrap();
        trie.register("/u/me", &lit, &[Method::Get], record()).unwrap();

        let param = compile_pattern("/u/:id", &cache).unwrap();
        trie.register("/u/:id", &param, &[Method::Get], record())
            .unwrap();

        match trie.lookup(&Method::Get, "/u/me") {
            LookupResult::Matched { params, .. } => assert!(params.is_empty()),
            _ => panic!("expected the literal route to win"),
        }
    }

    #[test]
    fn duplicate_registration_is_an_error() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();
        let a = compile_pattern("/a", &cache).unwrap();
        trie.register("/a", &a, &[Method::Get], record()).unwrap();

        let err = trie.register("/a", &a, &[Method::Get], record());
        assert!(err.is_err());
    }

    #[test]
    fn empty_bracket_param_never_matches() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();
        let pattern = compile_pattern("/x/:id[]", &cache).unwrap();
        trie.register("/x/:id[]", &pattern, &[Method::Get], record())
            .unwrap();

        assert!(matches!(trie.lookup(&Method::Get, "/x/anything"), LookupResult::NotFound));
    }

    #[test]
    fn wildcard_matches_remaining_path_with_lowest_priority() {
        let cache = RegexCache::new();
        let mut trie = RouteTrie::new();

        let wc = compile_pattern("/static/*", &cache).unwrap();
        trie.register("/static/*", &wc, &[Method::Get], record())
            .unwrap();

        let exact = compile_pattern("/static/logo.png", &cache).unwrap();
        trie.register("/static/logo.png", &exact, &[Method::Get], record())
            .unwrap();

        match trie.lookup(&Method::Get, "/static/logo.png") {
            LookupResult::Matched { params, .. } => assert!(params.is_empty()),
            _ => panic!("expected the exact literal route to win"),
        }

        assert!(matches!(
            trie.lookup(&Method::Get, "/static/css/app.css"),
            LookupResult::Matched { .. }
        ));
    }
}
