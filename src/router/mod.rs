//! Route registration and request dispatch.

pub mod middleware;
pub mod path;
pub mod regex_cache;
pub mod trie;

pub use middleware::{cors_middleware, CorsDescriptor, Middleware};
pub use trie::Handler;

use crate::core::error::RouteError;
use crate::core::method::Method;
use crate::core::request::Request;
use crate::core::response::Response;
use path::compile_pattern;
use regex_cache::RegexCache;
use trie::{HandlerRecord, LookupResult, RouteTrie};

/// A router: a set of registered routes plus the global middleware chain
/// that wraps every request, matched or not (so e.g. CORS headers land on
/// 404s too).
pub struct Router {
    global_middlewares: Vec<Middleware>,
    trie: RouteTrie,
    regex_cache: RegexCache,
}

impl Default for Router {
    fn default() -> Self {
        Router {
            global_middlewares: Vec::new(),
            trie: RouteTrie::new(),
            regex_cache: RegexCache::new(),
        }
    }
}

impl Router {
    pub fn new() -> Self {
        Router::default()
    }

    /// Registers a middleware that runs, in registration order, ahead of
    /// every route's own middleware and handler.
    pub fn use_middleware(&mut self, middleware: Middleware) -> &mut Self {
        self.global_middlewares.push(middleware);
        self
    }

    /// Starts registering a route for `pattern` and `methods`. The returned
    /// builder collects any route-local middleware or a CORS descriptor
    /// before `handler(...)` compiles the pattern and inserts it into the
    /// trie.
    pub fn route<'a>(&'a mut self, pattern: &str, methods: &[Method]) -> RouteBuilder<'a> {
        RouteBuilder {
            router: self,
            pattern: pattern.to_owned(),
            methods: methods.to_vec(),
            middlewares: Vec::new(),
            cors: None,
        }
    }

    /// Matches `request` against the trie, runs the global middleware chain
    /// unconditionally, then (on a match) the route's own middleware and
    /// handler, short-circuiting wherever `response.done` is set.
    pub fn dispatch(&self, request: &mut Request) -> Response {
        let mut response = Response::new();

        for mw in &self.global_middlewares {
            mw(request, &mut response);
            if response.done {
                return response;
            }
        }

        match self.trie.lookup(&request.method, &request.path) {
            LookupResult::NotFound => {
                response.status(404);
                response
            }
            LookupResult::MethodNotAllowed => {
                response.status(405);
                response
            }
            LookupResult::Matched { record, params } => {
                request.params = params;

                for mw in &record.middlewares {
                    mw(request, &mut response);
                    if response.done {
                        return response;
                    }
                }

                (record.handler)(request, &mut response);
                response
            }
        }
    }
}

pub struct RouteBuilder<'a> {
    router: &'a mut Router,
    pattern: String,
    methods: Vec<Method>,
    middlewares: Vec<Middleware>,
    cors: Option<CorsDescriptor>,
}

impl<'a> RouteBuilder<'a> {
    /// Adds a middleware that only runs for this route, after the global
    /// chain and in registration order.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Attaches CORS handling to this route: every response (including an
    /// `OPTIONS` preflight, which is answered directly) gets the
    /// appropriate `Access-Control-Allow-*` headers.
    pub fn cors(mut self, descriptor: CorsDescriptor) -> Self {
        let mw = cors_middleware(descriptor.clone());
        self.cors = Some(descriptor);
        self.middlewares.push(mw);
        self
    }

    /// Compiles the pattern and inserts `handler` for every registered
    /// method. Returns a `RouteError` if the pattern is malformed or a
    /// method on this pattern was already registered.
    pub fn handler(self, handler: Handler) -> Result<(), RouteError> {
        let segments = compile_pattern(&self.pattern, &self.router.regex_cache)?;
        let record = HandlerRecord {
            handler,
            middlewares: self.middlewares,
            cors: self.cors,
        };
        self.router
            .trie
            .register(&self.pattern, &segments, &self.methods, record)
    }
}
