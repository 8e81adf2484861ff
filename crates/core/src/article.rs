//! Extraction output type and format conversion.
//!
//! [`ExtractionResult`] carries the document title and the cleaned article
//! markup, together with the plain text derived from it and a few metrics.

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;
use serde::Serialize;

use crate::Result;
use crate::formatters::text::{TextConfig, convert_to_text, html_to_text};

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\w'-]+").expect("word pattern is valid"));

/// Output format options for an extraction result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// The cleaned article markup.
    Html,
    /// Plain text with block structure kept.
    Text,
    /// Structured JSON with every field.
    Json,
}

/// The result of extracting an article from one document.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionResult {
    /// Text of the document's `<title>`, empty when there is none.
    pub title: String,

    /// Serialized article container (`<div id="readability-content">...</div>`).
    pub content: String,

    /// Article text with tags stripped.
    pub text_content: String,

    /// Length of `text_content` in characters.
    pub length: usize,

    /// Word count of `text_content`.
    pub word_count: usize,

    /// URL the document came from, when known.
    pub source_url: Option<String>,
}

impl ExtractionResult {
    /// Creates a result from a title and the article markup, deriving the text
    /// and metrics.
    pub fn new(title: String, content: String, source_url: Option<String>) -> Self {
        let text_content = html_to_text(&content);
        let length = text_content.chars().count();
        let word_count = count_words(&text_content);

        Self { title, content, text_content, length, word_count, source_url }
    }

    /// Re-materializes the article markup as an HTML fragment.
    pub fn article_fragment(&self) -> Html {
        Html::parse_fragment(&self.content)
    }

    /// Converts the result to the specified format.
    pub fn to_format(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Html => Ok(self.content.clone()),
            OutputFormat::Text => Ok(self.to_text()),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(self)?),
        }
    }

    /// Gets the result as structured JSON.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Gets the article as plain text.
    pub fn to_text(&self) -> String {
        self.text_content.clone()
    }

    /// Gets the article as plain text with custom configuration.
    pub fn to_text_with_config(&self, config: &TextConfig) -> String {
        convert_to_text(&self.content, Some(&self.title), config)
    }
}

/// Count words: runs of word characters, apostrophes and hyphens
pub fn count_words(text: &str) -> usize {
    WORD.find_iter(text).count()
}
