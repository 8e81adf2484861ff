//! Server configuration read from the environment.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Context;

const DEFAULT_ADDR: &str = "0.0.0.0:50501";
const DEFAULT_FETCH_TIMEOUT: u64 = 30;
const DEFAULT_REQUEST_TIMEOUT: u64 = 60;

/// Settings for the HTTP service
///
/// | Variable                   | Default         |
/// |----------------------------|-----------------|
/// | `READABLE_ADDR`            | `0.0.0.0:50501` |
/// | `READABLE_FETCH_TIMEOUT`   | `30` (seconds)  |
/// | `READABLE_REQUEST_TIMEOUT` | `60` (seconds)  |
///
/// Log filtering follows `RUST_LOG`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Timeout for fetching a source page
    pub fetch_timeout: u64,
    /// Upper bound for a whole request, fetch and extraction included
    pub request_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 50501)),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr = lookup("READABLE_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .with_context(|| format!("READABLE_ADDR is not a socket address: {}", addr))?;

        let fetch_timeout = seconds(&lookup, "READABLE_FETCH_TIMEOUT", DEFAULT_FETCH_TIMEOUT)?;
        let request_timeout = seconds(&lookup, "READABLE_REQUEST_TIMEOUT", DEFAULT_REQUEST_TIMEOUT)?;

        Ok(Self { addr, fetch_timeout, request_timeout: Duration::from_secs(request_timeout) })
    }
}

fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> anyhow::Result<u64> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} must be a number of seconds, got {:?}", key, value)),
        None => Ok(default),
    }
}
