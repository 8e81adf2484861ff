//! HTML parsing and DOM manipulation.
//!
//! This module provides the [`Document`] and [`Element`] types. A Document
//! owns the parsed `scraper` tree; every extraction stage addresses nodes by
//! their [`NodeId`] and mutates the tree in place (detach, insert, attribute
//! edits). A detached node stays in the arena but is no longer reachable from
//! the document root, so queries only ever see attached nodes.
//!
//! # Example
//!
//! ```rust
//! use readable_core::parse::Document;
//!
//! let html = r#"
//!     <html>
//!         <head><title>Title</title></head>
//!         <body>
//!             <p class="content">Paragraph</p>
//!         </body>
//!     </html>
//! "#;
//!
//! let doc = Document::parse(html).unwrap();
//! assert_eq!(doc.title().unwrap(), "Title");
//! let paragraphs = doc.select("p.content").unwrap();
//! assert_eq!(paragraphs.len(), 1);
//! ```

use ego_tree::NodeId;
use scraper::node::Text;
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::{ReadableError, Result};

/// Represents a parsed HTML document.
///
/// # Example
///
/// ```rust
/// use readable_core::parse::Document;
///
/// let html = "<html><head><title>Test</title></head><body><p>Hello</p></body></html>";
/// let doc = Document::parse(html).unwrap();
/// assert_eq!(doc.title().unwrap(), "Test");
/// ```
pub struct Document {
    html: Html,
    base_url: Option<Url>,
}

impl Document {
    /// Parses HTML from a string.
    ///
    /// html5ever recovers from any markup error, so the only input rejected is
    /// one that carries no markup at all.
    ///
    /// # Errors
    ///
    /// Returns [`ReadableError::MalformedDocument`] for empty or whitespace-only input.
    pub fn parse(html: &str) -> Result<Self> {
        Self::parse_with_url(html, None)
    }

    /// Parses HTML and remembers the URL it was served from.
    ///
    /// The base URL is only used to resolve relative links in the article.
    pub fn parse_with_url(html: &str, base_url: Option<Url>) -> Result<Self> {
        if html.trim().is_empty() {
            return Err(ReadableError::MalformedDocument("document is empty".to_string()));
        }

        let html = Html::parse_document(html);
        if !html.tree.root().children().any(|node| node.value().is_element()) {
            return Err(ReadableError::MalformedDocument("document has no root element".to_string()));
        }

        Ok(Self { html, base_url })
    }

    /// Gets the base URL the document was parsed with.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Serializes the whole document.
    pub fn as_string(&self) -> String {
        self.html.html()
    }

    /// Selects attached elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ReadableError::InvalidSelector`] if the selector is invalid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use readable_core::parse::Document;
    ///
    /// let html = r#"<p class="content">First</p><p class="content">Second</p>"#;
    /// let doc = Document::parse(html).unwrap();
    /// let elements = doc.select("p.content").unwrap();
    /// assert_eq!(elements.len(), 2);
    /// ```
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;

        Ok(self
            .html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .filter(|el| sel.matches(el))
            .map(|element| Element { element })
            .collect())
    }

    /// Gets the trimmed text of the first `<title>` element.
    ///
    /// # Errors
    ///
    /// Returns [`ReadableError::MissingTitle`] if the document has no title element.
    pub fn title(&self) -> Result<String> {
        self.html
            .tree
            .root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "title")
            .map(|el| el.text().collect::<String>().trim().to_string())
            .ok_or(ReadableError::MissingTitle)
    }

    /// Gets all text content of the document.
    pub fn text_content(&self) -> String {
        self.text(self.html.tree.root().id())
    }

    /// The `<body>` element, if the document has one.
    pub fn body(&self) -> Option<NodeId> {
        self.first_element_by_tag("body")
    }

    /// Gets the text of `<body>`, or of the whole document when there is none.
    pub fn body_text(&self) -> String {
        self.body()
            .map(|body| self.text(body))
            .unwrap_or_else(|| self.text_content())
    }

    /// Id of the document node (the tree root, above `<html>`).
    pub fn root_id(&self) -> NodeId {
        self.html.tree.root().id()
    }

    /// All elements attached to the document, in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .filter(|node| node.value().is_element())
            .map(|node| node.id())
            .collect()
    }

    /// Descendant elements of `scope` with the given tag, in document order.
    ///
    /// `scope` itself is never part of the result.
    pub fn descendants_by_tag(&self, scope: NodeId, tag: &str) -> Vec<NodeId> {
        let Some(node) = self.html.tree.get(scope) else {
            return Vec::new();
        };

        node.descendants()
            .skip(1)
            .filter(|n| matches!(n.value(), Node::Element(el) if el.name() == tag))
            .map(|n| n.id())
            .collect()
    }

    /// Every descendant element of `scope`, excluding `scope`.
    pub fn descendant_elements(&self, scope: NodeId) -> Vec<NodeId> {
        let Some(node) = self.html.tree.get(scope) else {
            return Vec::new();
        };

        node.descendants()
            .skip(1)
            .filter(|n| n.value().is_element())
            .map(|n| n.id())
            .collect()
    }

    /// Attached elements with the given tag, in document order.
    pub fn elements_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.descendants_by_tag(self.root_id(), tag)
    }

    fn first_element_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.html
            .tree
            .root()
            .descendants()
            .find(|n| matches!(n.value(), Node::Element(el) if el.name() == tag))
            .map(|n| n.id())
    }

    /// Wraps a node as an [`Element`] when it is one.
    pub fn element(&'_ self, id: NodeId) -> Option<Element<'_>> {
        self.html
            .tree
            .get(id)
            .and_then(ElementRef::wrap)
            .map(|element| Element { element })
    }

    /// Lowercase tag name of an element node.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        match self.html.tree.get(id)?.value() {
            Node::Element(el) => Some(el.name()),
            _ => None,
        }
    }

    /// Whether the node is an element with the given tag.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag_name(id) == Some(tag)
    }

    /// Whether the node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.html.tree.get(id).is_some_and(|n| n.value().is_element())
    }

    /// Attribute value of an element node.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.html.tree.get(id)?.value() {
            Node::Element(el) => el.attr(name),
            _ => None,
        }
    }

    /// Class tokens of an element node.
    pub fn classes(&self, id: NodeId) -> Vec<&str> {
        match self.html.tree.get(id).map(|n| n.value()) {
            Some(Node::Element(el)) => el.classes().collect(),
            _ => Vec::new(),
        }
    }

    /// Concatenated text of every text node below `id` (or of `id` itself).
    pub fn text(&self, id: NodeId) -> String {
        let Some(node) = self.html.tree.get(id) else {
            return String::new();
        };

        node.descendants()
            .filter_map(|n| n.value().as_text())
            .map(|t| &**t)
            .collect()
    }

    /// Inner HTML of an element node.
    pub fn inner_html(&self, id: NodeId) -> String {
        self.element(id).map(|el| el.inner_html()).unwrap_or_default()
    }

    /// Outer HTML of an element node.
    pub fn outer_html(&self, id: NodeId) -> String {
        self.element(id).map(|el| el.outer_html()).unwrap_or_default()
    }

    /// Parent of a node, if it has one.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.html.tree.get(id)?.parent().map(|p| p.id())
    }

    /// Direct children of a node (elements, text and comments alike).
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(id)
            .map(|n| n.children().map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    /// Direct element children of a node.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.html
            .tree
            .get(id)
            .map(|n| n.children().filter(|c| c.value().is_element()).map(|c| c.id()).collect())
            .unwrap_or_default()
    }

    /// Next sibling node of any kind.
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.html.tree.get(id)?.next_sibling().map(|s| s.id())
    }

    /// Text of a text node; `None` for any other node.
    pub fn text_node(&self, id: NodeId) -> Option<&str> {
        self.html.tree.get(id)?.value().as_text().map(|t| &**t)
    }

    /// Whether the node is still reachable from the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let root = self.root_id();
        self.html
            .tree
            .get(id)
            .is_some_and(|node| node.id() == root || node.ancestors().any(|a| a.id() == root))
    }

    /// Whether `id` lies inside the subtree rooted at `scope` (inclusive).
    pub fn is_within(&self, id: NodeId, scope: NodeId) -> bool {
        self.html
            .tree
            .get(id)
            .is_some_and(|node| node.id() == scope || node.ancestors().any(|a| a.id() == scope))
    }

    /// Creates a detached element.
    ///
    /// The element is materialized from a parsed template so that it carries
    /// exactly the given attributes. Only flow-content tags (`p`, `span`,
    /// `div`, ...) can be created this way.
    ///
    /// # Errors
    ///
    /// Returns [`ReadableError::MalformedDocument`] if the template does not
    /// produce an element of that tag.
    pub fn create_element(&mut self, tag: &str, attrs: &[(&str, &str)]) -> Result<NodeId> {
        let mut markup = format!("<{}", tag);
        for (name, value) in attrs {
            markup.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
        }
        markup.push_str(&format!("></{}>", tag));

        let template = Html::parse_fragment(&markup);
        let value = template
            .tree
            .root()
            .descendants()
            .find(|n| matches!(n.value(), Node::Element(el) if el.name() == tag))
            .map(|n| n.value().clone())
            .ok_or_else(|| ReadableError::MalformedDocument(format!("cannot create <{}> element", tag)))?;

        Ok(self.html.tree.orphan(value).id())
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.html.tree.orphan(Node::Text(Text { text: text.into() })).id()
    }

    /// Moves `child` to the end of `parent`'s children.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child {
            return;
        }
        if let Some(mut node) = self.html.tree.get_mut(child) {
            node.detach();
        }
        if let Some(mut node) = self.html.tree.get_mut(parent) {
            node.append_id(child);
        }
    }

    /// Moves `new` right before `target` among `target`'s siblings.
    pub fn insert_before(&mut self, target: NodeId, new: NodeId) {
        if target == new || self.parent(target).is_none() {
            return;
        }
        if let Some(mut node) = self.html.tree.get_mut(new) {
            node.detach();
        }
        if let Some(mut node) = self.html.tree.get_mut(target) {
            node.insert_id_before(new);
        }
    }

    /// Puts `new` where `old` was and detaches `old`.
    pub fn replace_with(&mut self, old: NodeId, new: NodeId) {
        self.insert_before(old, new);
        self.detach(old);
    }

    /// Detaches a node, discarding its subtree from the document.
    pub fn detach(&mut self, id: NodeId) {
        if let Some(mut node) = self.html.tree.get_mut(id) {
            node.detach();
        }
    }

    /// Removes an attribute from an element node.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        if let Some(mut node) = self.html.tree.get_mut(id)
            && let Node::Element(el) = node.value()
        {
            el.attrs.retain(|(attr, _)| &*attr.local != name);
        }
    }

    /// Replaces the value of an attribute already present on an element node.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(mut node) = self.html.tree.get_mut(id)
            && let Node::Element(el) = node.value()
        {
            for (attr, current) in el.attrs.iter_mut() {
                if &*attr.local == name {
                    *current = value.into();
                }
            }
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ReadableError::InvalidSelector(format!("{}: {}", selector, e)))
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;").replace('<', "&lt;")
}

/// A read-only wrapper around scraper's ElementRef.
///
/// # Example
///
/// ```rust
/// use readable_core::parse::Document;
///
/// let html = r#"<a href="https://example.com">Link text</a>"#;
/// let doc = Document::parse(html).unwrap();
/// let link = &doc.select("a").unwrap()[0];
///
/// assert_eq!(link.text(), "Link text");
/// assert_eq!(link.attr("href"), Some("https://example.com"));
/// ```
#[derive(Clone, Debug)]
pub struct Element<'a> {
    element: ElementRef<'a>,
}

impl<'a> Element<'a> {
    /// Node id of this element in its document.
    pub fn id(&self) -> NodeId {
        (*self.element).id()
    }

    /// Gets the inner HTML of this element.
    pub fn inner_html(&self) -> String {
        self.element.inner_html()
    }

    /// Gets the outer HTML of this element.
    pub fn outer_html(&self) -> String {
        self.element.html()
    }

    /// Gets the text content of this element.
    pub fn text(&self) -> String {
        self.element.text().collect()
    }

    /// Gets the value of an attribute.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.element.value().attr(name)
    }

    /// Gets the lowercase tag name of this element.
    pub fn tag_name(&self) -> String {
        self.element.value().name().to_lowercase()
    }

    /// Selects descendant elements using a CSS selector.
    ///
    /// # Errors
    ///
    /// Returns [`ReadableError::InvalidSelector`] if the selector is invalid.
    pub fn select(&'_ self, selector: &str) -> Result<Vec<Element<'_>>> {
        let sel = parse_selector(selector)?;

        Ok(self.element.select(&sel).map(|el| Element { element: el }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"
        <!DOCTYPE html>
        <html lang="en">
        <head>
            <meta charset="UTF-8">
            <title> Test Page </title>
        </head>
        <body>
            <h1>Heading</h1>
            <p class="content">Paragraph 1</p>
            <p class="content">Paragraph 2</p>
            <a href="https://example.com" style="color: red">Link</a>
        </body>
        </html>
    "#;

    #[test]
    fn test_parse_document() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        assert_eq!(doc.title().unwrap(), "Test Page");
    }

    #[test]
    fn test_base_url_is_kept() {
        let base = Url::parse("https://example.com/a/b").unwrap();
        let doc = Document::parse_with_url(SAMPLE_HTML, Some(base.clone())).unwrap();
        assert_eq!(doc.base_url(), Some(&base));

        assert!(Document::parse(SAMPLE_HTML).unwrap().base_url().is_none());
    }

    #[test]
    fn test_parse_empty_is_malformed() {
        assert!(matches!(Document::parse(""), Err(ReadableError::MalformedDocument(_))));
        assert!(matches!(Document::parse("  \n\t"), Err(ReadableError::MalformedDocument(_))));
    }

    #[test]
    fn test_missing_title() {
        let doc = Document::parse("<html><body><p>No title</p></body></html>").unwrap();
        assert!(matches!(doc.title(), Err(ReadableError::MissingTitle)));
    }

    #[test]
    fn test_select_elements() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let elements = doc.select("p.content").unwrap();

        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].text(), "Paragraph 1");
        assert_eq!(elements[1].text(), "Paragraph 2");
    }

    #[test]
    fn test_invalid_selector() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let result = doc.select("[[invalid");

        assert!(matches!(result, Err(ReadableError::InvalidSelector(_))));
    }

    #[test]
    fn test_detached_nodes_are_not_selected() {
        let mut doc = Document::parse(SAMPLE_HTML).unwrap();
        let first = doc.elements_by_tag("p")[0];
        doc.detach(first);

        assert!(!doc.is_attached(first));
        assert_eq!(doc.elements_by_tag("p").len(), 1);
        assert_eq!(doc.select("p").unwrap().len(), 1);
        assert!(!doc.text_content().contains("Paragraph 1"));
    }

    #[test]
    fn test_create_and_replace() {
        let mut doc = Document::parse("<html><body><div id=\"old\">text</div></body></html>").unwrap();
        let old = doc.elements_by_tag("div")[0];
        let p = doc.create_element("p", &[("class", "fresh")]).unwrap();
        let text = doc.create_text("new text");
        doc.append_child(p, text);
        doc.replace_with(old, p);

        assert!(doc.is_attached(p));
        assert!(!doc.is_attached(old));
        assert_eq!(doc.outer_html(p), r#"<p class="fresh">new text</p>"#);
    }

    #[test]
    fn test_attribute_edits() {
        let mut doc = Document::parse(SAMPLE_HTML).unwrap();
        let link = doc.elements_by_tag("a")[0];

        doc.remove_attr(link, "style");
        doc.set_attr(link, "href", "https://example.org/");

        assert_eq!(doc.attr(link, "style"), None);
        assert_eq!(doc.attr(link, "href"), Some("https://example.org/"));
    }

    #[test]
    fn test_text_content() {
        let doc = Document::parse(SAMPLE_HTML).unwrap();
        let text = doc.body_text();

        assert!(text.contains("Heading"));
        assert!(text.contains("Paragraph 1"));
        assert!(!text.contains("Test Page"));
    }
}
