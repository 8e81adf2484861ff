//! Keyword patterns shared by every extraction stage.
//!
//! The table is compiled once on first use and is read-only afterwards, so
//! concurrent extractions share it without synchronization.

use regex::Regex;
use std::sync::LazyLock;

/// Class/id keywords that mark page chrome (navigation, footers, ads, comments)
const UNLIKELY_CANDIDATES: &str = r"(?i)combx|modal|comment|disqus|foot|header|menu|meta|nav|rss|shoutbox|sidebar|sponsor|social|teaserlist|time|tweet|twitter";

/// Class/id keywords that keep a node even when it also matches an unlikely keyword
const MAYBE_CANDIDATE: &str = r"(?i)and|article|body|column|main|story|entry|^post";

/// Class/id keywords that suggest article content
const POSITIVE: &str = r"(?i)article|body|content|entry|hentry|page|pagination|post|section|chapter|description|main|blog|text";

/// Class/id keywords that suggest boilerplate
const NEGATIVE: &str = r"(?i)combx|comment|contact|foot|footer|footnote|link|media|meta|promo|related|scroll|shoutbox|sponsor|utility|tags|widget";

/// Video hosts whose embeds survive cleaning
const VIDEO: &str = r"(?i)https?://(www\.)?(youtube|vimeo|youku|tudou|56|yinyuetai)\.com";

/// Runs of two or more whitespace characters
const NORMALIZE: &str = r"\s{2,}";

/// Tags whose presence below a `div` keeps it from being rewritten into a paragraph
pub const DIV_TO_P_BLOCK_TAGS: &[&str] = &["a", "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul"];

/// Class token that exempts a node from style stripping
pub const STYLED_CLASS: &str = "readability-styled";

/// Compiled keyword patterns.
#[derive(Debug)]
pub struct Patterns {
    pub unlikely_candidates: Regex,
    pub maybe_candidate: Regex,
    pub positive: Regex,
    pub negative: Regex,
    pub video: Regex,
    pub normalize: Regex,
}

impl Patterns {
    fn compile() -> Self {
        Self {
            unlikely_candidates: compile(UNLIKELY_CANDIDATES),
            maybe_candidate: compile(MAYBE_CANDIDATE),
            positive: compile(POSITIVE),
            negative: compile(NEGATIVE),
            video: compile(VIDEO),
            normalize: compile(NORMALIZE),
        }
    }
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("built-in pattern is valid")
}

/// The process-wide pattern table.
pub static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::compile);

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_spaces(text: &str) -> String {
    PATTERNS.normalize.replace_all(text.trim(), " ").into_owned()
}
