//! Article and title extraction from HTML documents.
//!
//! The pipeline parses a page, drops elements whose class/id look like page
//! chrome, rewrites text-only `div`s into paragraphs, scores paragraph
//! containers, picks the best one, pulls in related siblings and cleans the
//! result.
//!
//! ```rust
//! use readable_core::extract_from_html;
//!
//! let html = r#"<html><head><title>T</title></head><body>
//!     <div><p>Lorem ipsum, dolor sit amet, consectetur adipiscing elit, sed do
//!     eiusmod tempor incididunt ut labore et dolore magna aliqua.</p></div>
//!     <div class="sidebar"><p>Subscribe now!</p></div>
//! </body></html>"#;
//!
//! let result = extract_from_html(html, None)?;
//! assert_eq!(result.title, "T");
//! assert!(result.text_content.contains("Lorem ipsum"));
//! assert!(!result.text_content.contains("Subscribe now!"));
//! # Ok::<(), readable_core::ReadableError>(())
//! ```

pub mod article;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod formatters;
pub mod parse;
pub mod patterns;
pub mod postprocess;
pub mod preprocess;
pub mod readability;
pub mod scoring;

pub use article::{ExtractionResult, OutputFormat, count_words};
pub use error::{ReadableError, Result};
#[doc(hidden)]
pub use extract::{ExtractConfig, ExtractedContent, TopCandidate};
pub use extract::{assemble_article, extract_content, select_top_candidate};
pub use fetch::FetchConfig;
#[cfg(feature = "fetch")]
pub use fetch::fetch_url;
pub use fetch::{fetch_file, fetch_stdin};
pub use formatters::{TextConfig, convert_to_text, html_to_text};
pub use parse::{Document, Element};
pub use patterns::{PATTERNS, Patterns};
#[doc(hidden)]
pub use postprocess::PostProcessConfig;
pub use postprocess::postprocess_article;
#[doc(hidden)]
pub use preprocess::PreprocessConfig;
pub use preprocess::preprocess_document;
#[cfg(feature = "fetch")]
pub use readability::extract_from_url;
pub use readability::{Readability, ReadabilityConfig, ReadabilityConfigBuilder, extract_from_html};
#[doc(hidden)]
pub use scoring::{ScoreEntry, ScoreTable, class_weight, link_density, score_paragraphs};
