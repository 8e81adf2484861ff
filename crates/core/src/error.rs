//! Error types for readable operations.
//!
//! This module defines the main error type [`ReadableError`] which represents
//! every failure the extraction pipeline, the Document Model and the fetcher
//! can report. Errors are always returned as values so a serving layer can map
//! them to a user-visible status deterministically.
//!
//! # Example
//!
//! ```rust
//! use readable_core::{ReadableError, extract_from_html};
//!
//! match extract_from_html("<html><body><nav>Home</nav></body></html>", None) {
//!     Ok(result) => println!("Title: {}", result.title),
//!     Err(ReadableError::EmptyCandidateSet) => println!("nothing to read here"),
//!     Err(e) => println!("Error: {}", e),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for article extraction.
#[derive(Error, Debug)]
pub enum ReadableError {
    /// HTTP request errors from reqwest.
    ///
    /// Wraps network errors, DNS failures and connection issues raised while
    /// fetching the source page.
    #[cfg(feature = "fetch")]
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The source page answered with a non-success status code.
    #[error("Failed to get url {url}: HTTP status {status}")]
    HttpStatus { status: u16, url: String },

    /// Request timeout.
    #[error("Request timed out after {timeout} seconds")]
    Timeout { timeout: u64 },

    /// Invalid URL provided.
    ///
    /// Returned when a source URL cannot be parsed or has no scheme.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The Document Model could not build a tree from the input.
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A CSS selector handed to the Document Model did not parse.
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// No paragraph produced a scored candidate.
    ///
    /// This happens on pages without any `<p>` element left after the
    /// unlikely-candidate filter and structural normalization, such as
    /// navigation hubs or image galleries.
    #[error("No content could be extracted: the document has no paragraph candidates")]
    EmptyCandidateSet,

    /// The document has no `<title>` element.
    ///
    /// The orchestrator never aborts on this; it falls back to an empty title.
    #[error("The document has no title element")]
    MissingTitle,

    /// File not found.
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// I/O errors while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Result serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for ReadableError {
    fn from(err: serde_json::Error) -> Self {
        ReadableError::Serialization(err.to_string())
    }
}

/// Result type alias for ReadableError.
pub type Result<T> = std::result::Result<T, ReadableError>;
