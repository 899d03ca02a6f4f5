//! A process-wide, channel-backed logger. Call sites never touch a file
//! handle directly: they push a line onto an unbounded channel and a single
//! background thread does the actual write, so a slow disk or stderr never
//! stalls a worker.

use chrono::Utc;
use crossbeam_channel::{unbounded, Sender};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::thread;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

enum Message {
    Line(String),
    SetFile(String),
}

lazy_static! {
    static ref CHANNEL: Sender<Message> = spawn_writer();
}

fn spawn_writer() -> Sender<Message> {
    let (tx, rx) = unbounded::<Message>();

    thread::spawn(move || {
        let mut sink: Box<dyn Write + Send> = Box::new(io::stderr());

        for msg in rx {
            match msg {
                Message::SetFile(path) => match OpenOptions::new().create(true).append(true).open(&path) {
                    Ok(file) => sink = Box::new(file),
                    Err(e) => eprintln!("logger: failed to open log file {}: {}", path, e),
                },
                Message::Line(line) => {
                    let _ = writeln!(sink, "{}", line);
                }
            }
        }
    });

    tx
}

/// Redirects subsequent log lines to `path`, opened in append mode. Until
/// this is called (or if it's never called), lines go to stderr.
pub fn set_log_file(path: &str) {
    let _ = CHANNEL.send(Message::SetFile(path.to_owned()));
}

fn log(level: Level, message: &str) {
    let line = format!("[{}] @ {}: {}", level.as_str(), Utc::now().to_rfc3339(), message);
    let _ = CHANNEL.send(Message::Line(line));
}

pub fn debug(message: &str) {
    log(Level::Debug, message);
}

pub fn info(message: &str) {
    log(Level::Info, message);
}

pub fn warn(message: &str) {
    log(Level::Warn, message);
}

pub fn error(message: &str) {
    log(Level::Error, message);
}
