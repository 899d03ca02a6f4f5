//! Cookie-session auth: register, log in, fetch a protected resource, log
//! out. An `auth_middleware` gates every route except the public ones
//! behind a valid session cookie.
//!
//! Run with `cargo run --example auth`, then e.g.:
//!   curl -c jar.txt -d '{"username":"a","password":"b"}' localhost:9000/register
//!   curl -b jar.txt localhost:9000/data

use emberhttp::{Config, Cookie, Method, Request, Response, Router, Server};
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

const COOKIE_ID: &str = "DemoCookie";
const SESSION_TIMEOUT_MINUTES: i64 = 10;

#[derive(Clone)]
struct AppState {
    users: Arc<RwLock<HashMap<String, String>>>, // username -> "salt_hex:hash_hex"
    sessions: Arc<RwLock<HashMap<String, String>>>, // session id -> username
}

impl AppState {
    fn new() -> Self {
        AppState {
            users: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

/// A real (if minimal) replacement for the original demo's reversible XOR
/// "hash": a random salt plus SHA-256 over salt ++ password, stored as
/// `salt_hex:digest_hex`.
fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = digest_with_salt(&salt, password);
    format!("{}:{}", hex::encode(salt), hex::encode(digest))
}

fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(2, ':');
    let (salt_hex, digest_hex) = match (parts.next(), parts.next()) {
        (Some(s), Some(d)) => (s, d),
        _ => return false,
    };
    let salt = match hex::decode(salt_hex) {
        Ok(s) => s,
        Err(_) => return false,
    };
    hex::encode(digest_with_salt(&salt, password)) == digest_hex
}

fn digest_with_salt(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

fn new_session_id() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Pulls a top-level string field out of a flat `{"k":"v", ...}` body.
/// Deliberately not a general JSON parser — just enough for this demo's
/// register/login payloads.
fn json_field<'a>(body: &'a str, field: &str) -> Option<&'a str> {
    let needle = format!("\"{}\"", field);
    let after_key = body.split_once(&needle)?.1;
    let after_colon = after_key.split_once(':')?.1.trim_start();
    let after_quote = after_colon.strip_prefix('"')?;
    let end = after_quote.find('"')?;
    Some(&after_quote[..end])
}

fn session_cookie(session_id: &str) -> Cookie {
    let mut cookie = Cookie::new(COOKIE_ID, session_id);
    cookie.path = Some("/".to_owned());
    cookie.max_age = Some(SESSION_TIMEOUT_MINUTES * 60);
    cookie
}

fn require_fields<'a>(req: &'a Request, res: &mut Response) -> Option<(&'a str, &'a str)> {
    let body = std::str::from_utf8(&req.body).ok()?;
    let username = match json_field(body, "username") {
        Some(u) => u,
        None => {
            res.status(400).body("Must provide a username");
            return None;
        }
    };
    let password = match json_field(body, "password") {
        Some(p) => p,
        None => {
            res.status(400).body("Must provide a password");
            return None;
        }
    };
    Some((username, password))
}

fn register_handler(state: AppState) -> impl Fn(&Request, &mut Response) + Send + Sync {
    move |req, res| {
        let (username, password) = match require_fields(req, res) {
            Some(pair) => pair,
            None => return,
        };

        let mut users = state.users.write().unwrap();
        if users.contains_key(username) {
            res.status(400).body(format!("Username {} exists", username));
            return;
        }
        users.insert(username.to_owned(), hash_password(password));
        drop(users);

        let sid = new_session_id();
        state.sessions.write().unwrap().insert(sid.clone(), username.to_owned());

        res.set_cookie(&session_cookie(&sid)).status(201);
    }
}

fn login_handler(state: AppState) -> impl Fn(&Request, &mut Response) + Send + Sync {
    move |req, res| {
        let (username, password) = match require_fields(req, res) {
            Some(pair) => pair,
            None => return,
        };

        let users = state.users.read().unwrap();
        let stored = match users.get(username) {
            Some(stored) => stored,
            None => {
                res.status(400).body("invalid credentials");
                return;
            }
        };

        if !verify_password(password, stored) {
            res.status(400).body("invalid credentials");
            return;
        }
        drop(users);

        let sid = new_session_id();
        state.sessions.write().unwrap().insert(sid.clone(), username.to_owned());

        res.set_cookie(&session_cookie(&sid)).status(200);
    }
}

fn logout_handler(state: AppState) -> impl Fn(&Request, &mut Response) + Send + Sync {
    move |req, res| {
        let sid = match req.cookies.iter().find(|(k, _)| k == COOKIE_ID) {
            Some((_, v)) => v.clone(),
            None => {
                res.abort(401);
                return;
            }
        };

        state.sessions.write().unwrap().remove(&sid);
        res.set_cookie(&Cookie::delete(COOKIE_ID));
    }
}

fn data_handler(state: AppState) -> impl Fn(&Request, &mut Response) + Send + Sync {
    move |req, res| {
        let sid = req.cookies.iter().find(|(k, _)| k == COOKIE_ID).map(|(_, v)| v.clone());
        let username = sid.and_then(|sid| state.sessions.read().unwrap().get(&sid).cloned());

        res.header("Content-Type", "application/json").body(format!(
            "{{ \"data\": \"Hello, {}!\" }}",
            username.as_deref().unwrap_or("stranger")
        ));
    }
}

fn index_handler(_req: &Request, res: &mut Response) {
    res.header("Content-Type", "text/html")
        .body("<html><body><h1>emberhttp auth demo</h1></body></html>");
}

/// Reads `style.css` off disk into the response body. No templating, no
/// range requests — just the file's bytes, the one static-file case the
/// library still supports.
fn css_handler(_req: &Request, res: &mut Response) {
    match std::fs::read("style.css") {
        Ok(bytes) => {
            res.header("Content-Type", "text/css").body(bytes);
        }
        Err(_) => {
            res.status(404);
        }
    }
}

fn auth_middleware(state: AppState) -> impl Fn(&Request, &mut Response) + Send + Sync {
    const PUBLIC_PATHS: [&str; 4] = ["/", "/login", "/register", "/style.css"];

    move |req, res| {
        res.header("X-Authorized-By", "emberhttp-auth-demo");

        if PUBLIC_PATHS.contains(&req.path.as_str()) {
            return;
        }

        let sid = match req.cookies.iter().find(|(k, _)| k == COOKIE_ID) {
            Some((_, v)) => v.clone(),
            None => {
                res.abort(401);
                return;
            }
        };

        let sessions = state.sessions.read().unwrap();
        let username = match sessions.get(&sid) {
            Some(u) => u.clone(),
            None => {
                drop(sessions);
                res.abort(401);
                return;
            }
        };
        drop(sessions);

        if !state.users.read().unwrap().contains_key(&username) {
            res.abort(401);
        }
    }
}

fn main() {
    let state = AppState::new();
    let mut router = Router::new();

    router.use_middleware(Arc::new(auth_middleware(state.clone())));

    router
        .route("/", &[Method::Get])
        .handler(Arc::new(index_handler))
        .unwrap();
    router
        .route("/style.css", &[Method::Get])
        .handler(Arc::new(css_handler))
        .unwrap();
    router
        .route("/register", &[Method::Post])
        .handler(Arc::new(register_handler(state.clone())))
        .unwrap();
    router
        .route("/login", &[Method::Post])
        .handler(Arc::new(login_handler(state.clone())))
        .unwrap();
    router
        .route("/logout", &[Method::Post])
        .handler(Arc::new(logout_handler(state.clone())))
        .unwrap();
    router
        .route("/data", &[Method::Get])
        .handler(Arc::new(data_handler(state)))
        .unwrap();

    let mut config = Config::default();
    config.server_port = 9000;
    Server::with_config(router, config).listen();
}
