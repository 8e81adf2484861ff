//! Main extraction API.
//!
//! The entry point is the [`Readability`] struct, along with the convenience
//! functions [`extract_from_html`] and [`extract_from_url`]. One call runs the
//! whole pipeline on a freshly parsed document: title lookup, preprocessing,
//! paragraph scoring, top-candidate selection, article assembly and cleaning.
//!
//! # Example
//!
//! ```rust
//! use readable_core::extract_from_html;
//!
//! let html = r#"<html><head><title>Hello</title></head><body>
//!     <div><p>Lorem ipsum, dolor sit amet, consectetur adipiscing elit.</p></div>
//! </body></html>"#;
//!
//! let result = extract_from_html(html, Some("https://example.com/post"))?;
//! assert_eq!(result.title, "Hello");
//! assert!(result.text_content.contains("Lorem ipsum"));
//! # Ok::<(), readable_core::ReadableError>(())
//! ```

use url::Url;

use crate::article::ExtractionResult;
use crate::extract::{ExtractConfig, extract_content};
#[cfg(feature = "fetch")]
use crate::fetch::{FetchConfig, fetch_url};
use crate::parse::Document;
use crate::postprocess::{PostProcessConfig, postprocess_article};
use crate::preprocess::{PreprocessConfig, preprocess_document};
use crate::{ReadableError, Result};

/// Configuration for the extraction pipeline.
///
/// # Example
///
/// ```rust
/// use readable_core::ReadabilityConfig;
///
/// let config = ReadabilityConfig::builder()
///     .sibling_score_floor(15.0)
///     .clean_headers(true)
///     .build();
/// assert!(config.remove_unlikely);
/// ```
#[derive(Debug, Clone)]
pub struct ReadabilityConfig {
    /// Whether to remove unlikely candidates (default: true).
    pub remove_unlikely: bool,

    /// Lowest score a sibling needs to join the article (default: 10.0).
    pub sibling_score_floor: f64,

    /// Sibling threshold as a multiplier of the top score (default: 0.2).
    pub sibling_score_ratio: f64,

    /// Whether to run conditional cleaning (default: true).
    pub clean_conditionally: bool,

    /// Whether to remove chrome-like headings (default: false).
    pub clean_headers: bool,

    /// Whether to collapse `<br>` runs (default: false).
    pub collapse_breaks: bool,

    /// Whether to make links absolute against the source URL (default: true).
    pub resolve_links: bool,
}

impl Default for ReadabilityConfig {
    fn default() -> Self {
        Self {
            remove_unlikely: true,
            sibling_score_floor: 10.0,
            sibling_score_ratio: 0.2,
            clean_conditionally: true,
            clean_headers: false,
            collapse_breaks: false,
            resolve_links: true,
        }
    }
}

impl ReadabilityConfig {
    /// Creates a new builder for ReadabilityConfig.
    pub fn builder() -> ReadabilityConfigBuilder {
        ReadabilityConfigBuilder::new()
    }

    fn preprocess_config(&self) -> PreprocessConfig {
        PreprocessConfig { remove_unlikely: self.remove_unlikely, ..Default::default() }
    }

    fn extract_config(&self) -> ExtractConfig {
        ExtractConfig { sibling_score_floor: self.sibling_score_floor, sibling_score_ratio: self.sibling_score_ratio }
    }

    fn postprocess_config(&self, base_url: Option<Url>) -> PostProcessConfig {
        PostProcessConfig {
            clean_conditionally: self.clean_conditionally,
            clean_headers: self.clean_headers,
            collapse_breaks: self.collapse_breaks,
            resolve_links: self.resolve_links,
            base_url,
        }
    }
}

/// Builder for ReadabilityConfig.
pub struct ReadabilityConfigBuilder {
    config: ReadabilityConfig,
}

impl ReadabilityConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: ReadabilityConfig::default() }
    }

    /// Sets whether to remove unlikely candidates.
    pub fn remove_unlikely(mut self, value: bool) -> Self {
        self.config.remove_unlikely = value;
        self
    }

    /// Sets the sibling score floor.
    pub fn sibling_score_floor(mut self, value: f64) -> Self {
        self.config.sibling_score_floor = value;
        self
    }

    /// Sets the sibling score ratio.
    pub fn sibling_score_ratio(mut self, value: f64) -> Self {
        self.config.sibling_score_ratio = value;
        self
    }

    /// Sets whether to run conditional cleaning.
    pub fn clean_conditionally(mut self, value: bool) -> Self {
        self.config.clean_conditionally = value;
        self
    }

    /// Sets whether to remove chrome-like headings.
    pub fn clean_headers(mut self, value: bool) -> Self {
        self.config.clean_headers = value;
        self
    }

    /// Sets whether to collapse `<br>` runs.
    pub fn collapse_breaks(mut self, value: bool) -> Self {
        self.config.collapse_breaks = value;
        self
    }

    /// Sets whether to resolve relative links.
    pub fn resolve_links(mut self, value: bool) -> Self {
        self.config.resolve_links = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> ReadabilityConfig {
        self.config
    }
}

impl Default for ReadabilityConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Main entry point for article extraction.
///
/// A `Readability` holds only configuration; every call parses its own
/// document, so one instance can serve concurrent extractions.
///
/// # Example
///
/// ```rust
/// use readable_core::Readability;
///
/// let reader = Readability::new();
/// let html = "<html><body><div><p>Content here, with a comma.</p></div></body></html>";
/// let result = reader.extract_from_html(html, None).unwrap();
/// println!("Extracted: {}", result.text_content);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Readability {
    config: ReadabilityConfig,
}

impl Readability {
    /// Creates a new Readability instance with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new Readability instance with a custom configuration.
    pub fn with_config(config: ReadabilityConfig) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &ReadabilityConfig {
        &self.config
    }

    /// Extracts the article and title from already-fetched markup.
    ///
    /// `source_url` is only used to resolve relative links.
    ///
    /// # Errors
    ///
    /// - [`ReadableError::InvalidUrl`] if `source_url` does not parse
    /// - [`ReadableError::MalformedDocument`] if the input is empty
    /// - [`ReadableError::EmptyCandidateSet`] if no paragraph was found
    pub fn extract_from_html(&self, html: &str, source_url: Option<&str>) -> Result<ExtractionResult> {
        let base_url = parse_source_url(source_url)?;
        let mut doc = Document::parse_with_url(html, base_url)?;
        let title = read_title(&doc)?;

        preprocess_document(&mut doc, &self.config.preprocess_config())?;
        let extracted = extract_content(&mut doc, &self.config.extract_config())?;
        let postprocess = self.config.postprocess_config(doc.base_url().cloned());
        postprocess_article(&mut doc, extracted.container, &postprocess);

        let content = doc.outer_html(extracted.container);

        tracing::info!(
            title = %title,
            elements = extracted.element_count,
            bytes = content.len(),
            "extracted article"
        );

        Ok(ExtractionResult::new(title, content, source_url.map(str::to_string)))
    }

    /// Returns the whole page instead of the article.
    ///
    /// `content` is the serialized `<body>` and `text_content` its text; no
    /// scoring or cleaning runs. Suited to pages that are not articles, such as
    /// listings and landing pages.
    ///
    /// # Errors
    ///
    /// - [`ReadableError::InvalidUrl`] if `source_url` does not parse
    /// - [`ReadableError::MalformedDocument`] if the input is empty
    pub fn extract_page(&self, html: &str, source_url: Option<&str>) -> Result<ExtractionResult> {
        let base_url = parse_source_url(source_url)?;
        let doc = Document::parse_with_url(html, base_url)?;
        let title = read_title(&doc)?;

        let content = match doc.body() {
            Some(body) => doc.outer_html(body),
            None => doc.as_string(),
        };

        Ok(ExtractionResult::new(title, content, source_url.map(str::to_string)))
    }

    /// Fetches a page with the default fetch configuration and extracts it.
    #[cfg(feature = "fetch")]
    pub async fn extract_from_url(&self, url: &str) -> Result<ExtractionResult> {
        self.extract_from_url_with_config(url, &FetchConfig::default()).await
    }

    /// Fetches a page with a custom fetch configuration and extracts it.
    #[cfg(feature = "fetch")]
    pub async fn extract_from_url_with_config(&self, url: &str, fetch_config: &FetchConfig) -> Result<ExtractionResult> {
        let html = fetch_url(url, fetch_config).await?;
        self.extract_from_html(&html, Some(url))
    }
}

fn parse_source_url(source_url: Option<&str>) -> Result<Option<Url>> {
    source_url
        .map(|url| Url::parse(url).map_err(|e| ReadableError::InvalidUrl(format!("{}: {}", url, e))))
        .transpose()
}

/// Title of an unmodified document; a missing title becomes an empty one
fn read_title(doc: &Document) -> Result<String> {
    match doc.title() {
        Ok(title) => Ok(title),
        Err(ReadableError::MissingTitle) => {
            tracing::debug!("document has no title, using an empty one");
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}

/// Extracts with default settings.
///
/// # Example
///
/// ```rust
/// use readable_core::extract_from_html;
///
/// let html = "<html><head><title>T</title></head><body><div><p>Body, text.</p></div></body></html>";
/// let result = extract_from_html(html, None).unwrap();
/// assert_eq!(result.title, "T");
/// ```
pub fn extract_from_html(html: &str, source_url: Option<&str>) -> Result<ExtractionResult> {
    Readability::new().extract_from_html(html, source_url)
}

/// Fetches a page and extracts it with default settings.
#[cfg(feature = "fetch")]
pub async fn extract_from_url(url: &str) -> Result<ExtractionResult> {
    Readability::new().extract_from_url(url).await
}
