//! Middleware chain and the built-in CORS middleware.

use crate::core::request::Request;
use crate::core::response::Response;
use std::sync::Arc;

/// A middleware observes the request and mutates the response in place.
/// Setting `response.done` short-circuits the remainder of the chain,
/// including the route handler itself.
pub type Middleware = Arc<dyn Fn(&Request, &mut Response) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct CorsDescriptor {
    pub allow_all_origins: bool,
    pub origins: Vec<String>,
    pub methods: Vec<String>,
    pub headers: Vec<String>,
}

impl CorsDescriptor {
    pub fn allow_all() -> Self {
        CorsDescriptor {
            allow_all_origins: true,
            origins: Vec::new(),
            methods: vec!["GET".to_owned(), "POST".to_owned(), "PUT".to_owned(), "PATCH".to_owned(), "DELETE".to_owned(), "OPTIONS".to_owned()],
            headers: vec!["Content-Type".to_owned()],
        }
    }

    fn allow_origin_value(&self, request: &Request) -> Option<String> {
        if self.allow_all_origins {
            return Some("*".to_owned());
        }
        let origin = request.headers.get_first("Origin")?;
        if self.origins.iter().any(|o| o == origin) {
            Some(origin.to_owned())
        } else {
            None
        }
    }
}

/// Builds a middleware that stamps `Access-Control-Allow-*` headers onto
/// every response, and answers an `OPTIONS` preflight directly with a
/// `204 No Content`, aborting the rest of the chain.
pub fn cors_middleware(descriptor: CorsDescriptor) -> Middleware {
    Arc::new(move |request, response| {
        let allow_origin = match descriptor.allow_origin_value(request) {
            Some(v) => v,
            None => return,
        };

        response.header("Access-Control-Allow-Origin", allow_origin);
        response.header("Access-Control-Allow-Methods", descriptor.methods.join(", "));
        response.header("Access-Control-Allow-Headers", descriptor.headers.join(", "));

        if request.method.as_str() == "OPTIONS" {
            response.abort(204);
        }
    })
}
