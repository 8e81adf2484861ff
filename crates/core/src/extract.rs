use ego_tree::NodeId;

use crate::parse::Document;
use crate::scoring::{ScoreTable, link_density, score_paragraphs};
use crate::{ReadableError, Result};

/// Id given to the container that holds the assembled article
pub const ARTICLE_CONTAINER_ID: &str = "readability-content";

/// Configuration for candidate selection and article assembly
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    /// Lowest sibling score threshold
    pub sibling_score_floor: f64,
    /// Sibling score threshold as a multiplier of the top score
    pub sibling_score_ratio: f64,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { sibling_score_floor: 10.0, sibling_score_ratio: 0.2 }
    }
}

/// The node chosen as the heart of the article
#[derive(Debug, Clone, Copy)]
pub struct TopCandidate {
    /// The candidate node
    pub id: NodeId,
    /// Its link-scaled score
    pub score: f64,
}

/// The result of content extraction before cleaning
#[derive(Debug)]
pub struct ExtractedContent {
    /// The assembled container (detached from the document tree)
    pub container: NodeId,
    /// The top candidate
    pub top_candidate: TopCandidate,
    /// Number of nodes moved into the container
    pub element_count: usize,
}

/// Scale every candidate by link density and pick the best one.
///
/// Each entry's `final_score` becomes `content_score * (1 - link_density)`.
/// Only a strictly greater score replaces the current best, so on ties the
/// candidate scored first wins.
///
/// # Errors
///
/// Returns [`ReadableError::EmptyCandidateSet`] if no node was scored.
pub fn select_top_candidate(doc: &Document, table: &mut ScoreTable) -> Result<TopCandidate> {
    let mut top: Option<TopCandidate> = None;

    for id in table.candidates().to_vec() {
        let density = link_density(doc, id);
        let Some(entry) = table.get_mut(id) else {
            continue;
        };
        let score = entry.content_score * (1.0 - density);
        entry.final_score = Some(score);

        tracing::debug!(tag = doc.tag_name(id), score, "candidate");

        if top.is_none_or(|best| score > best.score) {
            top = Some(TopCandidate { id, score });
        }
    }

    top.ok_or(ReadableError::EmptyCandidateSet)
}

/// Whether a paragraph sibling reads like prose on its own
fn is_prose_paragraph(doc: &Document, id: NodeId) -> bool {
    if !doc.is_tag(id, "p") {
        return false;
    }

    let text = doc.text(id);
    let length = text.chars().count();
    let density = link_density(doc, id);

    (length > 80 && density < 0.25) || (length < 80 && density == 0.0 && text.contains(','))
}

/// Build the article container from the top candidate and its siblings.
///
/// A sibling joins when it is the top candidate, when its score reaches
/// `max(floor, top * ratio)`, or when it is a prose-like paragraph. Joining
/// siblings are moved, in document order, into a fresh
/// `<div id="readability-content">`. When the top candidate's parent is not an
/// element, the container holds the top candidate alone.
pub fn assemble_article(
    doc: &mut Document, top: TopCandidate, table: &ScoreTable, config: &ExtractConfig,
) -> Result<(NodeId, usize)> {
    let container = doc.create_element("div", &[("id", ARTICLE_CONTAINER_ID)])?;
    let threshold = config.sibling_score_floor.max(top.score * config.sibling_score_ratio);

    let siblings = match doc.parent(top.id).filter(|&parent| doc.is_element(parent)) {
        Some(parent) => doc.element_children(parent),
        None => vec![top.id],
    };

    let mut appended = 0;
    for sibling in siblings {
        let include = sibling == top.id
            || table.get(sibling).is_some_and(|entry| entry.score() >= threshold)
            || is_prose_paragraph(doc, sibling);

        if include {
            tracing::debug!(tag = doc.tag_name(sibling), "appending node");
            doc.append_child(container, sibling);
            appended += 1;
        }
    }

    Ok((container, appended))
}

/// Score paragraphs, choose the top candidate and assemble the article.
///
/// The document must already be preprocessed. The returned container is
/// detached from the document tree and still has to be cleaned.
pub fn extract_content(doc: &mut Document, config: &ExtractConfig) -> Result<ExtractedContent> {
    let mut table = score_paragraphs(doc);
    let top_candidate = select_top_candidate(doc, &mut table)?;

    tracing::info!(
        tag = doc.tag_name(top_candidate.id),
        score = top_candidate.score,
        "selected top candidate"
    );

    let (container, element_count) = assemble_article(doc, top_candidate, &table, config)?;

    Ok(ExtractedContent { container, top_candidate, element_count })
}
