use ego_tree::NodeId;
use url::Url;

use crate::parse::Document;
use crate::patterns::{PATTERNS, STYLED_CLASS};
use crate::scoring::{CLASS_WEIGHT, class_weight, inner_text, link_density};

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Configuration for cleaning the assembled article
#[derive(Debug, Clone)]
pub struct PostProcessConfig {
    /// Whether to run conditional cleaning on tables, lists and divs
    pub clean_conditionally: bool,
    /// Whether to remove headings that look like chrome
    pub clean_headers: bool,
    /// Whether to collapse runs of `<br>` into one
    pub collapse_breaks: bool,
    /// Whether to make `img@src` and `a@href` absolute
    pub resolve_links: bool,
    /// Base URL for link resolution
    pub base_url: Option<Url>,
}

impl Default for PostProcessConfig {
    fn default() -> Self {
        Self {
            clean_conditionally: true,
            clean_headers: false,
            collapse_breaks: false,
            resolve_links: true,
            base_url: None,
        }
    }
}

/// Clean the assembled article container in place.
///
/// Passes run in a fixed order: style stripping, removal of forms, objects
/// and iframes, singleton `h1`/`h2` removal, header cleaning (optional),
/// conditional cleaning of `table`, `ul` and `div`, empty paragraph removal,
/// orphan header removal, break collapsing (optional) and link resolution.
pub fn postprocess_article(doc: &mut Document, container: NodeId, config: &PostProcessConfig) {
    strip_styles(doc, container);

    for tag in ["form", "object", "iframe"] {
        remove_tag(doc, container, tag);
    }

    for tag in ["h1", "h2"] {
        let headings = doc.descendants_by_tag(container, tag);
        if headings.len() == 1 {
            tracing::debug!(tag, "removing singleton heading");
            doc.detach(headings[0]);
        }
    }

    if config.clean_headers {
        clean_headers(doc, container);
    }

    if config.clean_conditionally {
        for tag in ["table", "ul", "div"] {
            clean_conditionally(doc, container, tag);
        }
    }

    remove_empty_paragraphs(doc, container);
    remove_orphan_headers(doc, container);

    if config.collapse_breaks {
        collapse_breaks(doc, container);
    }

    if config.resolve_links
        && let Some(base_url) = &config.base_url
    {
        resolve_links(doc, container, base_url);
    }
}

/// Whether the element's class list is exactly the styled sentinel
fn is_styled(doc: &Document, id: NodeId) -> bool {
    doc.classes(id) == [STYLED_CLASS]
}

/// Remove `style` from the container and its descendants, sparing styled spans
pub fn strip_styles(doc: &mut Document, container: NodeId) {
    let mut targets = vec![container];
    targets.extend(doc.descendant_elements(container));

    for id in targets {
        if !is_styled(doc, id) {
            doc.remove_attr(id, "style");
        }
    }
}

/// Remove every descendant with the given tag.
///
/// `object` elements whose markup points at a known video host are kept.
pub fn remove_tag(doc: &mut Document, container: NodeId, tag: &str) {
    for id in doc.descendants_by_tag(container, tag) {
        if tag == "object" && PATTERNS.video.is_match(&doc.outer_html(id)) {
            continue;
        }
        doc.detach(id);
    }
}

/// Remove headings with a negative class weight or heavy linking
pub fn clean_headers(doc: &mut Document, container: NodeId) {
    for tag in HEADINGS {
        for id in doc.descendants_by_tag(container, tag) {
            if !doc.is_within(id, container) {
                continue;
            }
            if class_weight(doc, id) < 0.0 || link_density(doc, id) > 0.33 {
                tracing::debug!(tag, "removing header");
                doc.detach(id);
            }
        }
    }
}

/// Counts gathered from one conditional-cleaning target
struct ContentCounts {
    paragraphs: usize,
    images: usize,
    list_items: usize,
    inputs: usize,
    embeds: usize,
    text_length: usize,
    link_density: f64,
}

impl ContentCounts {
    fn gather(doc: &Document, id: NodeId) -> Self {
        let embeds = doc
            .descendants_by_tag(id, "embed")
            .into_iter()
            .filter(|&embed| {
                doc.attr(embed, "src")
                    .is_some_and(|src| !src.is_empty() && !PATTERNS.video.is_match(src))
            })
            .count();

        Self {
            paragraphs: doc.descendants_by_tag(id, "p").len(),
            images: doc.descendants_by_tag(id, "img").len(),
            list_items: doc.descendants_by_tag(id, "li").len(),
            inputs: doc.descendants_by_tag(id, "input").len(),
            embeds,
            text_length: inner_text(doc, id).chars().count(),
            link_density: link_density(doc, id),
        }
    }

    /// The compound "looks like boilerplate" test
    fn is_suspicious(&self, tag: &str, weight: f64) -> bool {
        let is_list = matches!(tag, "ul" | "ol");

        (self.images > self.paragraphs && self.images > 1)
            || (!is_list && self.list_items > self.paragraphs + 100)
            || self.inputs > self.paragraphs / 3
            || (self.text_length < 25 && (self.images == 0 || self.images > 2))
            || (weight < CLASS_WEIGHT && self.link_density > 0.2)
            || (weight >= CLASS_WEIGHT && self.link_density > 0.5)
            || (self.embeds == 1 && self.text_length < 75)
            || self.embeds > 1
    }
}

/// Number of comma-separated segments in the normalized text
fn comma_segments(doc: &Document, id: NodeId) -> usize {
    inner_text(doc, id).split(',').count()
}

/// Remove `tag` descendants that look like boilerplate.
///
/// The match list is snapshotted first and visited back to front, so nested
/// matches are judged before the nodes that contain them.
pub fn clean_conditionally(doc: &mut Document, container: NodeId, tag: &str) {
    let targets = doc.descendants_by_tag(container, tag);

    for id in targets.into_iter().rev() {
        if !doc.is_within(id, container) {
            continue;
        }

        let weight = class_weight(doc, id);
        let remove = if weight < 0.0 {
            true
        } else if comma_segments(doc, id) < 10 {
            ContentCounts::gather(doc, id).is_suspicious(tag, weight)
        } else {
            false
        };

        if remove {
            tracing::debug!(
                tag,
                class = doc.attr(id, "class").unwrap_or_default(),
                id = doc.attr(id, "id").unwrap_or_default(),
                weight,
                "cleaning conditionally"
            );
            doc.detach(id);
        }
    }
}

/// Remove paragraphs with no text and no media
pub fn remove_empty_paragraphs(doc: &mut Document, container: NodeId) {
    for id in doc.descendants_by_tag(container, "p") {
        let has_media = ["img", "embed", "object"]
            .iter()
            .any(|tag| !doc.descendants_by_tag(id, tag).is_empty());

        if !has_media && inner_text(doc, id).is_empty() {
            doc.detach(id);
        }
    }
}

/// Remove headings that have no following sibling node
pub fn remove_orphan_headers(doc: &mut Document, container: NodeId) {
    for tag in HEADINGS {
        for id in doc.descendants_by_tag(container, tag) {
            if doc.next_sibling(id).is_none() {
                tracing::debug!(tag, "removing orphan header");
                doc.detach(id);
            }
        }
    }
}

/// Collapse `<br>` runs separated only by whitespace into a single `<br>`
pub fn collapse_breaks(doc: &mut Document, container: NodeId) {
    for br in doc.descendants_by_tag(container, "br") {
        if !doc.is_within(br, container) {
            continue;
        }

        let mut next = doc.next_sibling(br);
        while let Some(sibling) = next {
            next = doc.next_sibling(sibling);
            if doc.text_node(sibling).is_some_and(|text| text.trim().is_empty()) {
                continue;
            }
            if !doc.is_tag(sibling, "br") {
                break;
            }
            doc.detach(sibling);
        }
    }
}

/// Rewrite `img@src` and `a@href` against `base_url`.
///
/// Empty values are skipped and values that fail to join stay untouched.
pub fn resolve_links(doc: &mut Document, container: NodeId, base_url: &Url) {
    for (tag, attr) in [("img", "src"), ("a", "href")] {
        for id in doc.descendants_by_tag(container, tag) {
            let Some(value) = doc.attr(id, attr).filter(|v| !v.is_empty()).map(str::to_string) else {
                continue;
            };

            match base_url.join(&value) {
                Ok(resolved) => doc.set_attr(id, attr, resolved.as_str()),
                Err(e) => tracing::debug!(value = %value, error = %e, "leaving unresolvable link"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn container(html: &str) -> (Document, NodeId) {
        let doc = Document::parse(html).unwrap();
        let id = doc
            .elements()
            .into_iter()
            .find(|&n| doc.attr(n, "id") == Some("readability-content"))
            .unwrap();
        (doc, id)
    }

    fn wrap(inner: &str) -> String {
        format!(r#"<html><body><div id="readability-content">{inner}</div></body></html>"#)
    }

    #[test]
    fn test_strip_styles_spares_styled_spans() {
        let (mut doc, root) = container(&wrap(
            r#"<p style="color:red">a</p><span class="readability-styled" style="x">b</span><span class="readability-styled other" style="y">c</span>"#,
        ));
        strip_styles(&mut doc, root);

        let html = doc.inner_html(root);
        assert!(!html.contains("color:red"));
        assert!(html.contains(r#"style="x""#));
        assert!(!html.contains(r#"style="y""#));
    }

    #[test]
    fn test_remove_tag_keeps_video_objects() {
        let (mut doc, root) = container(&wrap(
            r#"<form><input></form><object data="https://www.youtube.com/v/abc"></object><object data="https://ads.example.com/x.swf"></object><iframe src="/x"></iframe>"#,
        ));
        for tag in ["form", "object", "iframe"] {
            remove_tag(&mut doc, root, tag);
        }

        let html = doc.inner_html(root);
        assert!(!html.contains("<form"));
        assert!(!html.contains("<iframe"));
        assert!(html.contains("youtube"));
        assert!(!html.contains("ads.example.com"));
    }

    #[test]
    fn test_singleton_headings_removed() {
        let (mut doc, root) = container(&wrap("<h1>Title</h1><p>Body text</p><h2>A</h2><p>x</p><h2>B</h2><p>y</p>"));
        postprocess_article(&mut doc, root, &PostProcessConfig::default());

        let html = doc.inner_html(root);
        assert!(!html.contains("<h1>"));
        assert!(html.contains("<h2>A</h2>"));
        assert!(html.contains("<h2>B</h2>"));
    }

    #[test]
    fn test_clean_conditionally_negative_weight() {
        let (mut doc, root) = container(&wrap(
            r#"<div class="comment"><p>one, two, three, four, five, six, seven, eight, nine, ten, eleven</p></div>"#,
        ));
        clean_conditionally(&mut doc, root, "div");

        assert!(doc.descendants_by_tag(root, "div").is_empty());
    }

    #[test]
    fn test_clean_conditionally_short_text() {
        let (mut doc, root) = container(&wrap("<table><tr><td>tiny</td></tr></table>"));
        clean_conditionally(&mut doc, root, "table");

        assert!(doc.descendants_by_tag(root, "table").is_empty());
    }

    #[test]
    fn test_clean_conditionally_keeps_comma_rich_content() {
        let text = "a, ".repeat(12);
        let (mut doc, root) = container(&wrap(&format!(r#"<div><a href="/x">{text}</a></div>"#)));
        clean_conditionally(&mut doc, root, "div");

        assert_eq!(doc.descendants_by_tag(root, "div").len(), 1);
    }

    #[test]
    fn test_clean_conditionally_link_heavy() {
        let (mut doc, root) = container(&wrap(
            r#"<div><p>Some words here to pass the length test <a href="/a">and a long enough link text</a></p></div>"#,
        ));
        clean_conditionally(&mut doc, root, "div");

        assert!(doc.descendants_by_tag(root, "div").is_empty());
    }

    #[test]
    fn test_clean_conditionally_inputs() {
        let (mut doc, root) = container(&wrap(
            r#"<div><p>Enough text in this paragraph to pass the length test.</p><input><input></div>"#,
        ));
        clean_conditionally(&mut doc, root, "div");

        assert!(doc.descendants_by_tag(root, "div").is_empty());
    }

    #[test]
    fn test_clean_conditionally_visits_nested_matches() {
        let (mut doc, root) = container(&wrap(
            r#"<div id="outer"><p>A plain paragraph with enough text to be kept as content.</p><div class="sponsor">Ad</div><div class="widget">Ad</div></div>"#,
        ));
        clean_conditionally(&mut doc, root, "div");

        let divs = doc.descendants_by_tag(root, "div");
        assert_eq!(divs.len(), 1);
        assert_eq!(doc.attr(divs[0], "id"), Some("outer"));
    }

    const PROSE: &str = "This paragraph carries enough plain words to clear every length rule.";

    fn list_items(count: usize) -> String {
        "<li>x</li>".repeat(count)
    }

    #[rstest]
    #[case::two_images("div", format!(r#"<div><p>{PROSE}</p><img src="a.jpg"><img src="b.jpg"></div>"#), true)]
    #[case::one_image("div", format!(r#"<div><p>{PROSE}</p><img src="a.jpg"></div>"#), false)]
    #[case::list_heavy_div("div", format!("<div><p>{PROSE}</p><ul>{}</ul></div>", list_items(102)), true)]
    #[case::list_at_limit("div", format!("<div><p>{PROSE}</p><ul>{}</ul></div>", list_items(101)), false)]
    #[case::long_list_itself("ul", format!("<ul>{}</ul>", list_items(102)), false)]
    #[case::positive_link_heavy(
        "div",
        r#"<div class="content"><p><a href="/a">A long linked sentence that dominates this block</a> tail</p></div>"#.to_string(),
        true
    )]
    #[case::positive_moderate_links(
        "div",
        r#"<div class="content"><p>Ordinary words before the link <a href="/a">a link of moderate length</a> end.</p></div>"#.to_string(),
        false
    )]
    #[case::single_embed_short_text(
        "div",
        r#"<div><p>A caption long enough to pass the short text rule.</p><embed src="https://ads.example.com/banner.swf"></div>"#.to_string(),
        true
    )]
    #[case::video_embed_short_text(
        "div",
        r#"<div><p>A caption long enough to pass the short text rule.</p><embed src="https://www.youtube.com/v/abc"></div>"#.to_string(),
        false
    )]
    #[case::two_embeds(
        "div",
        r#"<div><p>This caption runs long enough that the single embed rule could never apply to it.</p><embed src="https://ads.example.com/a.swf"><embed src="https://ads.example.com/b.swf"></div>"#.to_string(),
        true
    )]
    fn test_clean_conditionally_rules(#[case] tag: &str, #[case] inner: String, #[case] removed: bool) {
        let (mut doc, root) = container(&wrap(&inner));
        let before = doc.descendants_by_tag(root, tag).len();
        clean_conditionally(&mut doc, root, tag);

        let after = doc.descendants_by_tag(root, tag).len();
        assert_eq!(after < before, removed, "{inner}");
    }

    #[test]
    fn test_remove_empty_paragraphs() {
        let (mut doc, root) = container(&wrap(r#"<p>  </p><p><img src="a.png"></p><p>text</p>"#));
        remove_empty_paragraphs(&mut doc, root);

        assert_eq!(doc.descendants_by_tag(root, "p").len(), 2);
    }

    #[test]
    fn test_remove_orphan_headers() {
        let (mut doc, root) = container(&wrap("<p>text</p><h3>Trailing</h3>"));
        remove_orphan_headers(&mut doc, root);

        assert!(doc.descendants_by_tag(root, "h3").is_empty());
        assert_eq!(doc.descendants_by_tag(root, "p").len(), 1);
    }

    #[test]
    fn test_header_with_sibling_kept() {
        let (mut doc, root) = container(&wrap("<h3>Section</h3><p>text</p>"));
        remove_orphan_headers(&mut doc, root);

        assert_eq!(doc.descendants_by_tag(root, "h3").len(), 1);
    }

    #[test]
    fn test_clean_headers() {
        let (mut doc, root) = container(&wrap(
            r#"<h3 class="related">Related</h3><p>a</p><h3><a href="/x">All links</a></h3><p>b</p><h3>Plain</h3><p>c</p>"#,
        ));
        clean_headers(&mut doc, root);

        let headers = doc.descendants_by_tag(root, "h3");
        assert_eq!(headers.len(), 1);
        assert_eq!(doc.text(headers[0]), "Plain");
    }

    #[test]
    fn test_collapse_breaks() {
        let (mut doc, root) = container(&wrap("<p>a<br> <br><br>b<br>c</p>"));
        collapse_breaks(&mut doc, root);

        assert_eq!(doc.descendants_by_tag(root, "br").len(), 2);
    }

    #[test]
    fn test_resolve_links() {
        let (mut doc, root) = container(&wrap(
            r##"<img src="c.png"><a href="/x">x</a><a href="">empty</a><a href="#top">top</a>"##,
        ));
        let base = Url::parse("https://example.com/a/b").unwrap();
        resolve_links(&mut doc, root, &base);

        let html = doc.inner_html(root);
        assert!(html.contains(r#"src="https://example.com/a/c.png""#));
        assert!(html.contains(r#"href="https://example.com/x""#));
        assert!(html.contains(r#"href="""#));
        assert!(html.contains(r#"href="https://example.com/a/b#top""#));
    }

    #[test]
    fn test_links_untouched_without_base_url() {
        let (mut doc, root) = container(&wrap(r#"<p><img src="c.png"> text</p>"#));
        postprocess_article(&mut doc, root, &PostProcessConfig::default());

        assert!(doc.inner_html(root).contains(r#"src="c.png""#));
    }
}
