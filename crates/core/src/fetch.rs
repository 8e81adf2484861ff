//! Page retrieval from URLs, files, and stdin.
//!
//! Fetching sits outside the extraction pipeline: it validates the URL,
//! enforces the timeout and rejects non-success responses, then hands the
//! body to [`crate::extract_from_html`].

use std::fs;
use std::io::Read;
use std::path::PathBuf;
#[cfg(feature = "fetch")]
use std::time::Duration;

#[cfg(feature = "fetch")]
use reqwest::Client;
#[cfg(feature = "fetch")]
use url::Url;

use crate::{ReadableError, Result};

/// HTTP client configuration for fetching web pages.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Request timeout in seconds.
    pub timeout: u64,
    /// User-Agent header sent with every request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self { timeout: 30, user_agent: format!("Mozilla/5.0 (compatible; Readable/{})", env!("CARGO_PKG_VERSION")) }
    }
}

/// Parse a URL and require an http(s) scheme
#[cfg(feature = "fetch")]
pub(crate) fn parse_http_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| ReadableError::InvalidUrl(format!("{}: {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(ReadableError::InvalidUrl(format!("unsupported scheme '{}' in {}", scheme, url))),
    }
}

/// Fetches the HTML of a page.
///
/// Follows redirects and applies the configured timeout.
///
/// # Errors
///
/// - [`ReadableError::InvalidUrl`] when the URL does not parse or is not http(s)
/// - [`ReadableError::Timeout`] when the request exceeds `config.timeout`
/// - [`ReadableError::HttpStatus`] on a non-success status code
/// - [`ReadableError::HttpError`] on any other transport failure
#[cfg(feature = "fetch")]
pub async fn fetch_url(url: &str, config: &FetchConfig) -> Result<String> {
    let parsed_url = parse_http_url(url)?;

    let client = Client::builder()
        .timeout(Duration::from_secs(config.timeout))
        .user_agent(config.user_agent.as_str())
        .build()?;

    let map_err = |e: reqwest::Error| {
        if e.is_timeout() { ReadableError::Timeout { timeout: config.timeout } } else { ReadableError::HttpError(e) }
    };

    tracing::debug!(url = %parsed_url, "fetching page");

    let response = client
        .get(parsed_url)
        .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(map_err)?;

    let status = response.status();
    if !status.is_success() {
        return Err(ReadableError::HttpStatus { status: status.as_u16(), url: url.to_string() });
    }

    response.text().await.map_err(map_err)
}

/// Reads HTML content from a local file.
pub fn fetch_file(path: &str) -> Result<String> {
    let path_buf = PathBuf::from(path);

    if !path_buf.exists() {
        return Err(ReadableError::FileNotFound(path_buf));
    }

    Ok(fs::read_to_string(&path_buf)?)
}

/// Reads HTML content from standard input until EOF.
pub fn fetch_stdin() -> Result<String> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}
