//! Content scoring.
//!
//! Scores live in a [`ScoreTable`] keyed by node id instead of on the nodes
//! themselves; the table exists for one extraction run only. The candidate
//! set is the table's insertion order: parents and grandparents of
//! paragraphs, in the order their paragraphs appear in the document.

use std::collections::HashMap;

use ego_tree::NodeId;

use crate::parse::Document;
use crate::patterns::{PATTERNS, normalize_spaces};

/// Weight added or subtracted by class/id keyword matches
pub const CLASS_WEIGHT: f64 = 25.0;

/// Score attached to a candidate node.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreEntry {
    /// Accumulated paragraph score
    pub content_score: f64,
    /// Content score scaled by link density, set by top-candidate selection
    pub final_score: Option<f64>,
}

impl ScoreEntry {
    /// The link-scaled score when available, the raw content score otherwise
    pub fn score(&self) -> f64 {
        self.final_score.unwrap_or(self.content_score)
    }
}

/// Side table of score entries plus the candidate order.
#[derive(Debug, Default)]
pub struct ScoreTable {
    entries: HashMap<NodeId, ScoreEntry>,
    candidates: Vec<NodeId>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `id`, created (and recorded as a candidate) on first sight
    pub fn entry(&mut self, id: NodeId) -> &mut ScoreEntry {
        if !self.entries.contains_key(&id) {
            self.candidates.push(id);
        }
        self.entries.entry(id).or_default()
    }

    pub fn get(&self, id: NodeId) -> Option<&ScoreEntry> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut ScoreEntry> {
        self.entries.get_mut(&id)
    }

    /// Candidates in the order they were first scored
    pub fn candidates(&self) -> &[NodeId] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Score contributed by one paragraph's text.
///
/// One point for the paragraph, one per comma, and one per 100 characters up
/// to three.
pub fn paragraph_score(text: &str) -> f64 {
    let commas = text.matches(',').count();
    let length_points = (text.chars().count() / 100).min(3);

    (1 + commas + length_points) as f64
}

/// Assign content scores to the parents and grandparents of every paragraph.
///
/// The parent receives the paragraph score, the grandparent half of it. A
/// missing grandparent, or an ancestor that is the document node itself,
/// receives nothing.
pub fn score_paragraphs(doc: &Document) -> ScoreTable {
    let mut table = ScoreTable::new();

    for paragraph in doc.elements_by_tag("p") {
        let Some(parent) = doc.parent(paragraph).filter(|&id| doc.is_element(id)) else {
            continue;
        };
        let grandparent = doc.parent(parent).filter(|&id| doc.is_element(id));

        let score = paragraph_score(&doc.text(paragraph));

        table.entry(parent).content_score += score;
        if let Some(grandparent) = grandparent {
            table.entry(grandparent).content_score += score / 2.0;
        }
    }

    tracing::debug!(candidates = table.len(), "scored paragraphs");
    table
}

/// Fraction of a node's text that sits inside links.
///
/// Anchors without an `href`, with an empty one, or pointing at a fragment
/// (`#...`) are not counted. Returns 0.0 for a node without text.
pub fn link_density(doc: &Document, id: NodeId) -> f64 {
    let text_length = doc.text(id).chars().count();
    if text_length == 0 {
        return 0.0;
    }

    let link_length: usize = doc
        .descendants_by_tag(id, "a")
        .into_iter()
        .filter(|&link| {
            doc.attr(link, "href")
                .is_some_and(|href| !href.is_empty() && !href.starts_with('#'))
        })
        .map(|link| doc.text(link).chars().count())
        .sum();

    link_length as f64 / text_length as f64
}

/// Class/id weight of an element.
///
/// The class string and the id are checked independently; each can add
/// `+CLASS_WEIGHT` for a positive keyword and `-CLASS_WEIGHT` for a negative
/// one, and the adjustments add up.
pub fn class_weight(doc: &Document, id: NodeId) -> f64 {
    let mut weight = 0.0;

    for value in [doc.attr(id, "class"), doc.attr(id, "id")].into_iter().flatten() {
        if value.is_empty() {
            continue;
        }
        if PATTERNS.negative.is_match(value) {
            weight -= CLASS_WEIGHT;
        }
        if PATTERNS.positive.is_match(value) {
            weight += CLASS_WEIGHT;
        }
    }

    weight
}

/// Normalized inner text of a node: trimmed, whitespace runs collapsed.
pub fn inner_text(doc: &Document, id: NodeId) -> String {
    normalize_spaces(&doc.text(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.elements_by_tag(tag)[0]
    }

    #[test]
    fn test_paragraph_score_base() {
        assert_eq!(paragraph_score("Short text."), 1.0);
    }

    #[test]
    fn test_paragraph_score_commas() {
        assert_eq!(paragraph_score("one, two, three, four"), 4.0);
    }

    #[test]
    fn test_paragraph_score_length_is_capped() {
        assert_eq!(paragraph_score(&"a".repeat(150)), 2.0);
        assert_eq!(paragraph_score(&"a".repeat(1000)), 4.0);
    }

    #[test]
    fn test_paragraph_score_counts_chars_not_bytes() {
        assert_eq!(paragraph_score(&"é".repeat(99)), 1.0);
    }

    #[test]
    fn test_score_paragraphs_parent_and_grandparent() {
        let html = r#"<html><body><div id="outer"><div id="inner">
            <p>First, with a comma.</p>
            <p>Second one.</p>
        </div></div></body></html>"#;
        let doc = Document::parse(html).unwrap();
        let table = score_paragraphs(&doc);

        let divs = doc.elements_by_tag("div");
        let (outer, inner) = (divs[0], divs[1]);

        assert_eq!(table.candidates(), &[inner, outer]);
        assert_eq!(table.get(inner).unwrap().content_score, 3.0);
        assert_eq!(table.get(outer).unwrap().content_score, 1.5);
    }

    #[test]
    fn test_score_paragraphs_empty_document() {
        let doc = Document::parse("<html><body><div>no paragraphs</div></body></html>").unwrap();
        assert!(score_paragraphs(&doc).is_empty());
    }

    #[test]
    fn test_candidates_recorded_once() {
        let doc = Document::parse("<html><body><div><p>a</p><p>b</p><p>c</p></div></body></html>").unwrap();
        let table = score_paragraphs(&doc);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_link_density_no_links() {
        let doc = Document::parse("<div>Text content without any links.</div>").unwrap();
        assert_eq!(link_density(&doc, first(&doc, "div")), 0.0);
    }

    #[test]
    fn test_link_density_all_links() {
        let doc = Document::parse(r#"<div><a href="/page">Link text</a></div>"#).unwrap();
        assert_eq!(link_density(&doc, first(&doc, "div")), 1.0);
    }

    #[test]
    fn test_link_density_ignores_fragment_and_empty_links() {
        let html = r##"<div><a href="#top">Top</a><a href="">Empty</a><a>None</a></div>"##;
        let doc = Document::parse(html).unwrap();
        assert_eq!(link_density(&doc, first(&doc, "div")), 0.0);
    }

    #[test]
    fn test_link_density_mixed() {
        let doc = Document::parse(r#"<div>abcd <a href="/x">efgh</a></div>"#).unwrap();
        let density = link_density(&doc, first(&doc, "div"));
        assert!((density - 4.0 / 9.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_link_density_empty_node() {
        let doc = Document::parse("<div></div>").unwrap();
        assert_eq!(link_density(&doc, first(&doc, "div")), 0.0);
    }

    #[test]
    fn test_class_weight_positive() {
        let doc = Document::parse(r#"<div class="article-content">x</div>"#).unwrap();
        assert_eq!(class_weight(&doc, first(&doc, "div")), 25.0);
    }

    #[test]
    fn test_class_weight_negative_id() {
        let doc = Document::parse(r#"<div id="comments">x</div>"#).unwrap();
        assert_eq!(class_weight(&doc, first(&doc, "div")), -25.0);
    }

    #[test]
    fn test_class_weight_adds_up() {
        let doc = Document::parse(r#"<div class="post-footer" id="main">x</div>"#).unwrap();
        // class: negative (footer) + positive (post); id: positive (main)
        assert_eq!(class_weight(&doc, first(&doc, "div")), 25.0);
    }

    #[test]
    fn test_class_weight_no_match() {
        let doc = Document::parse(r#"<div class="wrapper" id="box">x</div>"#).unwrap();
        assert_eq!(class_weight(&doc, first(&doc, "div")), 0.0);
    }

    #[test]
    fn test_inner_text_normalized() {
        let doc = Document::parse("<div>  Hello \n\n   world  </div>").unwrap();
        assert_eq!(inner_text(&doc, first(&doc, "div")), "Hello world");
    }
}
