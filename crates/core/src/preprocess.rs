//! Document preparation ahead of scoring.
//!
//! Two passes run over the freshly parsed tree: the unlikely-candidate
//! filter drops page chrome by class/id, and structural normalization turns
//! text-only `div`s and bare text runs into paragraph-like nodes so the
//! scorer can treat them uniformly.

use ego_tree::NodeId;

use crate::parse::Document;
use crate::patterns::{DIV_TO_P_BLOCK_TAGS, PATTERNS, STYLED_CLASS, normalize_spaces};
use crate::Result;

/// Configuration for document preparation
#[derive(Debug, Clone)]
pub struct PreprocessConfig {
    /// Whether to remove unlikely candidates
    pub remove_unlikely: bool,
    /// Whether to rewrite divs and bare text runs into paragraphs
    pub normalize_structure: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self { remove_unlikely: true, normalize_structure: true }
    }
}

/// Prepare a document for scoring
pub fn preprocess_document(doc: &mut Document, config: &PreprocessConfig) -> Result<()> {
    if config.remove_unlikely {
        remove_unlikely_candidates(doc);
    }

    if config.normalize_structure {
        normalize_structure(doc)?;
    }

    Ok(())
}

/// String matched against the unlikely/ok patterns: class tokens, then the id
fn match_string(doc: &Document, id: NodeId) -> String {
    let classes = doc.classes(id).join(" ");
    let element_id = doc.attr(id, "id").unwrap_or_default();
    format!("{}\n{}", classes, element_id)
}

/// Detach elements whose class/id look like page chrome.
///
/// The element list is collected once up front. `html` and `body` are never
/// removed, and an "ok anyway" keyword (article, main, story...) keeps a node
/// that also matches an unlikely keyword. Returns the number of removed nodes.
pub fn remove_unlikely_candidates(doc: &mut Document) -> usize {
    let mut removed = 0;

    for id in doc.elements() {
        if matches!(doc.tag_name(id), Some("html" | "body")) || !doc.is_attached(id) {
            continue;
        }

        let candidate = match_string(doc, id);
        if PATTERNS.unlikely_candidates.is_match(&candidate) && !PATTERNS.maybe_candidate.is_match(&candidate) {
            tracing::debug!(tag = doc.tag_name(id), signature = %candidate.replace('\n', "#"), "removing unlikely candidate");
            doc.detach(id);
            removed += 1;
        }
    }

    removed
}

/// Whether any descendant of `id` is a block-level tag
fn has_block_descendant(doc: &Document, id: NodeId) -> bool {
    DIV_TO_P_BLOCK_TAGS
        .iter()
        .any(|tag| !doc.descendants_by_tag(id, tag).is_empty())
}

/// Whether a div has neither text nor embedded media
fn is_blank(doc: &Document, id: NodeId) -> bool {
    normalize_spaces(&doc.text(id)).is_empty()
        && ["embed", "object"]
            .iter()
            .all(|tag| doc.descendants_by_tag(id, tag).is_empty())
}

/// Rewrite divs so every remaining non-blank div holds block-level content.
///
/// A div without block-level descendants becomes a `p` that takes over its
/// children, unless it is blank (spacers, clearfix divs), in which case it is
/// left alone and never becomes a scored paragraph. In a div that does hold
/// blocks, each direct non-blank text run becomes a `p` when a `<br>` follows
/// it (the `<br>` is dropped) and a `span` otherwise.
pub fn normalize_structure(doc: &mut Document) -> Result<()> {
    for div in doc.elements_by_tag("div") {
        if !doc.is_attached(div) {
            continue;
        }

        if !has_block_descendant(doc, div) && is_blank(doc, div) {
            continue;
        }

        if has_block_descendant(doc, div) {
            wrap_text_runs(doc, div)?;
        } else {
            rewrite_div_as_paragraph(doc, div)?;
        }
    }

    Ok(())
}

fn rewrite_div_as_paragraph(doc: &mut Document, div: NodeId) -> Result<()> {
    tracing::debug!("altering div to p");
    let paragraph = doc.create_element("p", &[])?;
    for child in doc.children(div) {
        doc.append_child(paragraph, child);
    }
    doc.replace_with(div, paragraph);
    Ok(())
}

fn wrap_text_runs(doc: &mut Document, div: NodeId) -> Result<()> {
    for child in doc.children(div) {
        let Some(text) = doc.text_node(child).map(str::to_string) else {
            continue;
        };
        if text.trim().is_empty() {
            continue;
        }

        let next_is_break = doc.next_sibling(child).filter(|&next| doc.is_tag(next, "br"));
        let wrapper = match next_is_break {
            Some(br) => {
                tracing::debug!("altering text run followed by br to p");
                doc.detach(br);
                doc.create_element("p", &[])?
            }
            None => {
                tracing::debug!("wrapping text run in span");
                doc.create_element("span", &[("class", STYLED_CLASS)])?
            }
        };

        doc.replace_with(child, wrapper);
        doc.append_child(wrapper, child);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_html(doc: &Document) -> String {
        doc.inner_html(doc.elements_by_tag("body")[0])
    }

    #[test]
    fn test_remove_unlikely_candidates() {
        let html = r#"<html><body>
            <div class="sidebar-widget"><p>Hidden text</p></div>
            <div class="content"><p>Visible text</p></div>
        </body></html>"#;
        let mut doc = Document::parse(html).unwrap();

        assert_eq!(remove_unlikely_candidates(&mut doc), 1);
        let text = doc.body_text();
        assert!(!text.contains("Hidden text"));
        assert!(text.contains("Visible text"));
    }

    #[test]
    fn test_ok_anyway_keeps_candidate() {
        let html = r#"<html><body><div class="comment-article"><p>Kept</p></div></body></html>"#;
        let mut doc = Document::parse(html).unwrap();

        assert_eq!(remove_unlikely_candidates(&mut doc), 0);
        assert!(doc.body_text().contains("Kept"));
    }

    #[test]
    fn test_unlikely_id_is_removed() {
        let html = r#"<html><body><div id="comments"><p>Nice post!</p></div><p>Body</p></body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        remove_unlikely_candidates(&mut doc);

        assert!(!doc.body_text().contains("Nice post!"));
    }

    #[test]
    fn test_body_and_html_are_never_removed() {
        let html = r#"<html class="menu"><body class="sidebar"><p>Text</p></body></html>"#;
        let mut doc = Document::parse(html).unwrap();

        assert_eq!(remove_unlikely_candidates(&mut doc), 0);
        assert!(doc.body_text().contains("Text"));
    }

    #[test]
    fn test_nested_unlikely_inside_removed_subtree() {
        let html = r#"<html><body><div class="footer"><div class="menu">x</div></div><p>y</p></body></html>"#;
        let mut doc = Document::parse(html).unwrap();

        assert_eq!(remove_unlikely_candidates(&mut doc), 1);
    }

    #[test]
    fn test_div_without_blocks_becomes_paragraph() {
        let html = r#"<html><body><div class="x">Plain <b>bold</b> text</div></body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        normalize_structure(&mut doc).unwrap();

        assert!(doc.elements_by_tag("div").is_empty());
        assert_eq!(body_html(&doc), "<p>Plain <b>bold</b> text</p>");
    }

    #[test]
    fn test_no_div_without_blocks_remains() {
        let html = r#"<html><body>
            <div><div>one</div><div><span>two</span></div><div></div></div>
        </body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        normalize_structure(&mut doc).unwrap();

        for div in doc.elements_by_tag("div") {
            assert!(has_block_descendant(&doc, div) || is_blank(&doc, div));
        }
        assert_eq!(doc.elements_by_tag("p").len(), 2);
    }

    #[test]
    fn test_blank_divs_are_not_rewritten() {
        let html = r#"<html><body><div><div class="clear"></div><div>  </div></div></body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        normalize_structure(&mut doc).unwrap();

        assert!(doc.elements_by_tag("p").is_empty());
        assert_eq!(doc.elements_by_tag("div").len(), 3);
    }

    #[test]
    fn test_div_with_only_an_embed_becomes_paragraph() {
        let html = r#"<html><body><div><embed src="https://www.youtube.com/v/abc"></div></body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        normalize_structure(&mut doc).unwrap();

        assert_eq!(doc.elements_by_tag("p").len(), 1);
    }

    #[test]
    fn test_div_with_paragraph_keeps_paragraph() {
        let html = r#"<html><body><div><p>Lorem ipsum.</p></div></body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        normalize_structure(&mut doc).unwrap();

        assert_eq!(body_html(&doc), "<div><p>Lorem ipsum.</p></div>");
    }

    #[test]
    fn test_text_run_followed_by_br_becomes_paragraph() {
        let html = r#"<html><body><div>Intro line<br><p>Para</p></div></body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        normalize_structure(&mut doc).unwrap();

        assert_eq!(body_html(&doc), "<div><p>Intro line</p><p>Para</p></div>");
        assert!(doc.elements_by_tag("br").is_empty());
    }

    #[test]
    fn test_bare_text_run_wrapped_in_span() {
        let html = r#"<html><body><div>Loose text<p>Para</p></div></body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        normalize_structure(&mut doc).unwrap();

        assert_eq!(
            body_html(&doc),
            r#"<div><span class="readability-styled">Loose text</span><p>Para</p></div>"#
        );
    }

    #[test]
    fn test_preprocess_respects_config() {
        let html = r#"<html><body><div class="sidebar">Side</div></body></html>"#;
        let mut doc = Document::parse(html).unwrap();
        let config = PreprocessConfig { remove_unlikely: false, normalize_structure: false };
        preprocess_document(&mut doc, &config).unwrap();

        assert_eq!(doc.elements_by_tag("div").len(), 1);
    }
}
