use ego_tree::iter::Edge;
use scraper::{Html, Node};

const BLOCK_ELEMENTS: [&str; 22] = [
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption", "figure", "h1", "h2", "h3",
    "h4", "h5", "h6", "li", "p", "pre", "section", "td", "tr",
];

const SKIPPED_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Configuration for plain text output
#[derive(Debug, Clone, Default)]
pub struct TextConfig {
    /// Wrap lines at specified width (0 = no wrapping)
    pub line_width: usize,

    /// Put the title, underlined, above the text
    pub include_title: bool,
}

/// Convert article markup to plain text with the given configuration
pub fn convert_to_text(html: &str, title: Option<&str>, config: &TextConfig) -> String {
    let mut output = String::new();

    if config.include_title
        && let Some(title) = title.map(str::trim).filter(|t| !t.is_empty())
    {
        output.push_str(title);
        output.push('\n');
        output.push_str(&"=".repeat(title.chars().count()));
        output.push_str("\n\n");
    }

    let text = html_to_text(html);
    if config.line_width > 0 {
        output.push_str(&wrap_text(&text, config.line_width));
    } else {
        output.push_str(&text);
    }

    output.trim().to_string()
}

/// Strip tags from markup, keeping block boundaries.
///
/// Each block-level element starts a new paragraph (separated by a blank
/// line), `<br>` starts a new line, and whitespace inside a line collapses
/// to single spaces. Script and style contents are dropped.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut blocks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut skip_depth = 0usize;

    for edge in fragment.tree.root().traverse() {
        match edge {
            Edge::Open(node) => match node.value() {
                Node::Text(text) if skip_depth == 0 => {
                    current.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }))
                }
                Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => skip_depth += 1,
                Node::Element(el) if el.name() == "br" => current.push('\n'),
                Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => flush_block(&mut blocks, &mut current),
                _ => {}
            },
            Edge::Close(node) => match node.value() {
                Node::Element(el) if SKIPPED_ELEMENTS.contains(&el.name()) => {
                    skip_depth = skip_depth.saturating_sub(1)
                }
                Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => flush_block(&mut blocks, &mut current),
                _ => {}
            },
        }
    }
    flush_block(&mut blocks, &mut current);

    blocks.join("\n\n")
}

fn flush_block(blocks: &mut Vec<String>, current: &mut String) {
    let block = current
        .split('\n')
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    if !block.is_empty() {
        blocks.push(block);
    }
    current.clear();
}

/// Wrap every line of `text` at `width` characters, keeping blank lines
pub fn wrap_text(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }

    text.split('\n')
        .map(|line| wrap_line(line, width))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, width: usize) -> String {
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_length = 0;

    for word in line.split_whitespace() {
        let word_length = word.chars().count();

        if current_length == 0 {
            current.push_str(word);
            current_length = word_length;
        } else if current_length + 1 + word_length <= width {
            current.push(' ');
            current.push_str(word);
            current_length += 1 + word_length;
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_length = word_length;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines.join("\n")
}
