//! The smallest possible CORS setup: one route, open to any origin, that
//! also answers its own `OPTIONS` preflight.
//!
//! Run with `cargo run --example cors`, then e.g.:
//!   curl -i -X OPTIONS -H 'Origin: https://example.com' localhost:9000/
//!   curl -i localhost:9000/

use emberhttp::{Config, CorsDescriptor, Method, Request, Response, Router, Server};
use std::sync::Arc;

fn handler(_req: &Request, res: &mut Response) {
    res.header("Content-Type", "text/plain")
        .header("X-Powered-By", "demo")
        .body("Hello World!");
}

fn main() {
    let mut router = Router::new();

    router
        .route("/", &[Method::Get, Method::Options])
        .cors(CorsDescriptor::allow_all())
        .handler(Arc::new(handler))
        .unwrap();

    let mut config = Config::default();
    config.server_port = 9000;
    Server::with_config(router, config).listen();
}
