//! Plain `key=value` server configuration.

use crate::support::logger;
use std::fs;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub num_threads: usize,
    pub log_level: String,
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server_port: 8000,
            num_threads: num_cpus::get(),
            log_level: "info".to_owned(),
            log_file: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Config::default()
    }

    /// Reads `#`-comment and blank-line tolerant `key=value` pairs from
    /// `path`, overlaying them onto the defaults. An unreadable file or an
    /// unrecognized key is logged and otherwise ignored — a malformed
    /// config shouldn't be fatal for an embeddable server.
    pub fn from_file(path: &str) -> Config {
        let mut config = Config::default();

        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) => {
                logger::warn(&format!("could not read config file {}: {}", path, e));
                return config;
            }
        };

        for line in contents.lines() {
            config.apply_line(line);
        }

        config
    }

    fn apply_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        let (key, value) = match line.split_once('=') {
            Some(pair) => pair,
            None => {
                logger::warn(&format!("ignoring malformed config line: {}", line));
                return;
            }
        };

        let (key, value) = (key.trim(), value.trim());

        match key {
            "server_port" => match value.parse() {
                Ok(port) => self.server_port = port,
                Err(_) => logger::warn(&format!("invalid server_port value: {}", value)),
            },
            "num_threads" => match value.parse() {
                Ok(n) => self.num_threads = n,
                Err(_) => logger::warn(&format!("invalid num_threads value: {}", value)),
            },
            "log_level" => self.log_level = value.to_owned(),
            "log_file" => self.log_file = Some(value.to_owned()),
            other => logger::warn(&format!("ignoring unknown config key: {}", other)),
        }
    }
}

#[cfg(test)]
mod config_test {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = Config::default();
        assert_eq!(config.server_port, 8000);
        assert!(config.num_threads >= 1);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn applies_known_keys_and_skips_comments_and_blanks() {
        let mut config = Config::default();
        config.apply_line("# a comment");
        config.apply_line("");
        config.apply_line("server_port = 9090");
        config.apply_line("num_threads=3");
        config.apply_line("log_file=/tmp/emberhttp.log");

        assert_eq!(config.server_port, 9090);
        assert_eq!(config.num_threads, 3);
        assert_eq!(config.log_file.as_deref(), Some("/tmp/emberhttp.log"));
    }

    #[test]
    fn unknown_keys_and_malformed_lines_are_ignored_not_fatal() {
        let mut config = Config::default();
        let before = config.server_port;
        config.apply_line("not a valid line");
        config.apply_line("totally_unknown=123");
        assert_eq!(config.server_port, before);
    }
}
