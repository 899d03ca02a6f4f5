//! emberhttp: an embeddable HTTP/1.1 server library. Register routes and
//! middleware on a `Router`, hand it to a `Server`, and call `listen` — it
//! blocks, accepting connections onto a fixed worker pool, parsing and
//! dispatching each one, with no keep-alive between requests.

#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod core;
pub mod http;
pub mod router;
pub mod support;

pub use config::Config;
pub use core::{ConnError, Method, Request, Response, RouteError};
pub use http::{Cookie, SameSite};
pub use router::{cors_middleware, CorsDescriptor, Handler, Middleware, Router};

use crate::support::logger;
use crate::support::thread_pool::ThreadPool;
use std::net::TcpListener;
use std::sync::Arc;

#[cfg(feature = "tls")]
use native_tls::{Identity, TlsAcceptor};

/// Owns a `Router` and a `Config`, and drives the accept loop when asked to
/// `listen`. Constructing a `Server` does not bind a socket; nothing
/// happens until `listen` is called.
pub struct Server {
    router: Arc<Router>,
    config: Config,
    #[cfg(feature = "tls")]
    tls_identity: Option<(Vec<u8>, String)>,
}

impl Server {
    pub fn new(router: Router) -> Self {
        Server::with_config(router, Config::default())
    }

    pub fn with_config(router: Router, config: Config) -> Self {
        if let Some(path) = &config.log_file {
            logger::set_log_file(path);
        }

        Server {
            router: Arc::new(router),
            config,
            #[cfg(feature = "tls")]
            tls_identity: None,
        }
    }

    /// Supplies a PKCS#12 identity (bytes + password) to terminate TLS on
    /// `listen`. Only available with the `tls` feature.
    #[cfg(feature = "tls")]
    pub fn with_tls_identity(mut self, pkcs12: Vec<u8>, password: impl Into<String>) -> Self {
        self.tls_identity = Some((pkcs12, password.into()));
        self
    }

    /// Binds the configured port and blocks, dispatching every accepted
    /// connection onto the worker pool. Returns `false` only if the port
    /// could not be bound or (with `tls`) the identity was rejected; on a
    /// clean run this never returns.
    pub fn listen(&self) -> bool {
        let addr = format!("0.0.0.0:{}", self.config.server_port);
        let listener = match TcpListener::bind(&addr) {
            Ok(listener) => listener,
            Err(e) => {
                logger::error(&format!("failed to bind {}: {}", addr, e));
                return false;
            }
        };

        logger::info(&format!(
            "listening on {} with {} worker threads",
            addr, self.config.num_threads
        ));
        let pool = ThreadPool::new(self.config.num_threads);

        #[cfg(feature = "tls")]
        {
            if let Some((pkcs12, password)) = &self.tls_identity {
                let identity = match Identity::from_pkcs12(pkcs12, password) {
                    Ok(identity) => identity,
                    Err(e) => {
                        logger::error(&format!("invalid TLS identity: {}", e));
                        return false;
                    }
                };
                let acceptor = match TlsAcceptor::new(identity) {
                    Ok(acceptor) => Arc::new(acceptor),
                    Err(e) => {
                        logger::error(&format!("failed to build TLS acceptor: {}", e));
                        return false;
                    }
                };
                crate::core::connection::accept_loop_tls(
                    listener,
                    Arc::clone(&self.router),
                    &pool,
                    acceptor,
                );
                return true;
            }
        }

        crate::core::connection::accept_loop(listener, Arc::clone(&self.router), &pool);
        true
    }
}

#[cfg(test)]
mod lib_test {
    use super::*;

    #[test]
    fn server_construction_configures_the_logger_without_panicking() {
        let mut config = Config::default();
        config.log_file = None;
        let _server = Server::with_config(Router::new(), config);
    }
}
