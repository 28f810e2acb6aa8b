//! Wikipedia article to Markdown transducer
//!
//! Converts the readable body of an article page into Markdown suitable for
//! machine translation. The pipeline is a pure function over one input
//! stream:
//!
//! byte stream → DOM tree → (title, filtered block sequence) → per-block
//! rule-driven render → per-block normalize → concatenated output string
//!
//! # Conversion strategy
//!
//! Only the direct children of the `mw-parser-output` container are
//! considered, restricted to headings, paragraphs and lists; everything else
//! on the page (infoboxes, navigation, references) is skipped. Each retained
//! block is rendered bottom-up: a node's rewrite rule receives the fully
//! rendered text of its descendants, never raw markup. Headings that
//! introduce no content before the next heading (or the end of the article)
//! are suppressed, so section stubs and trailing "External links"-style
//! skeletons don't litter the translation input.
//!
//! # Determinism
//!
//! No state survives a call: the tree and block views are local to one
//! invocation and the rule set is immutable, so identical input yields
//! byte-identical output and calls may run concurrently without
//! coordination.

use std::io::Read;

use markup5ever_rcdom::{Handle, NodeData, RcDom};

use crate::error::ConversionError;
use crate::parser::parse_html_with_charset;
use crate::rules::{self, RuleSet};

/// `id` of the heading that carries the article title
const TITLE_ID: &str = "firstHeading";
/// Class token identifying the single content container
const CONTENT_CLASS: &str = "mw-parser-output";

/// Tag classification of a selected content block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Heading,
    Paragraph,
    List,
}

impl BlockKind {
    /// Classify a container child by tag; `None` means the child is skipped
    fn classify(tag: &str) -> Option<BlockKind> {
        match tag {
            "h2" => Some(BlockKind::Heading),
            "p" => Some(BlockKind::Paragraph),
            "ul" => Some(BlockKind::List),
            _ => None,
        }
    }
}

/// A direct child of the content container, as a view into the tree
struct Block {
    kind: BlockKind,
    node: Handle,
}

/// Converts Wikipedia article HTML into Markdown
///
/// The parser owns its rule set as fixed configuration; one instance can
/// serve any number of `parse` calls, concurrently if desired.
///
/// # Examples
///
/// ```rust
/// use wikitrans::article::ArticleParser;
///
/// let html = "<h1 id=\"firstHeading\">The Title</h1>\
///             <div class=\"mw-parser-output\"><p>body</p></div>";
/// let parser = ArticleParser::new();
/// let markdown = parser.parse(html.as_bytes()).expect("conversion should succeed");
/// assert_eq!(markdown, "# The Title\n\nbody\n\n");
/// ```
pub struct ArticleParser {
    rules: RuleSet,
}

impl Default for ArticleParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ArticleParser {
    pub fn new() -> Self {
        ArticleParser {
            rules: RuleSet::new(),
        }
    }

    /// Convert an article HTML stream into Markdown
    ///
    /// The stream is consumed to the end and released on every exit path.
    /// A missing title or missing content container degrades to a partial
    /// result instead of failing; see the module docs for what does fail.
    pub fn parse<R: Read>(&self, input: R) -> Result<String, ConversionError> {
        self.parse_with_content_type(input, None)
    }

    /// Like [`parse`](Self::parse), with a transport `Content-Type` header
    /// value feeding charset detection (URL retrieval has one, stdin does
    /// not)
    pub fn parse_with_content_type<R: Read>(
        &self,
        mut input: R,
        content_type: Option<&str>,
    ) -> Result<String, ConversionError> {
        let mut html = Vec::new();
        input.read_to_end(&mut html)?;

        let dom = parse_html_with_charset(&html, content_type)?;
        self.render(&dom)
    }

    /// Assemble the title line and the normalized fragments of all surviving
    /// blocks, in document order
    fn render(&self, dom: &RcDom) -> Result<String, ConversionError> {
        let mut output = String::with_capacity(1024);

        let title = extract_title(&dom.document);
        if !title.is_empty() {
            output.push_str("# ");
            output.push_str(&title);
            output.push_str("\n\n");
        }

        let blocks = select_blocks(&dom.document);
        for (position, block) in blocks.iter().enumerate() {
            if !survives(&blocks, position) {
                continue;
            }
            output.push_str(&self.render_block(block)?);
        }

        Ok(output)
    }

    /// Render one retained block into its normalized fragment
    ///
    /// Block-level formatting lives here, not in the rule set: it applies
    /// only to the block node itself, so a heading or paragraph nested
    /// deeper in some subtree passes through as plain content.
    fn render_block(&self, block: &Block) -> Result<String, ConversionError> {
        let fragment = match block.kind {
            BlockKind::Heading => {
                let content = self.render_children(&block.node)?;
                format!("## {}\n\n", single_line(&content))
            }
            BlockKind::Paragraph => {
                let content = self.render_children(&block.node)?;
                format!("{}\n\n", single_line(&content))
            }
            BlockKind::List => {
                // Only item children count; whitespace between <li> tags is
                // markup formatting, not content
                let mut items = String::new();
                for child in block.node.children.borrow().iter() {
                    if rules::element_tag(child).as_deref() == Some("li") {
                        items.push_str(&self.render_node(child)?);
                    }
                }
                items.push('\n');
                items
            }
        };

        Ok(normalize_fragment(&fragment))
    }

    fn render_children(&self, node: &Handle) -> Result<String, ConversionError> {
        let mut content = String::new();
        for child in node.children.borrow().iter() {
            content.push_str(&self.render_node(child)?);
        }
        Ok(content)
    }

    /// Bottom-up render of one subtree: descendants first, then the node's
    /// own rewrite rule over their gathered text
    fn render_node(&self, node: &Handle) -> Result<String, ConversionError> {
        match node.data {
            NodeData::Text { ref contents } => Ok(contents.borrow().to_string()),
            NodeData::Element { .. } => {
                let content = self.render_children(node)?;
                self.rules.apply(node, content)
            }
            // Comments, doctypes and processing instructions contribute
            // nothing
            _ => Ok(String::new()),
        }
    }
}

/// A heading survives iff its immediate successor in the original sequence
/// exists and is not itself a heading; non-headings always survive.
///
/// Adjacency is evaluated against the unfiltered sequence, so a run of
/// consecutive headings keeps only the last one before actual content.
fn survives(blocks: &[Block], position: usize) -> bool {
    if blocks[position].kind != BlockKind::Heading {
        return true;
    }

    match blocks.get(position + 1) {
        Some(next) => next.kind != BlockKind::Heading,
        None => false,
    }
}

/// Full text of the first `h1` marked as the article title, or the empty
/// string when the page has none (soft condition, not an error)
fn extract_title(root: &Handle) -> String {
    match find_title_heading(root) {
        Some(heading) => collect_text(&heading),
        None => String::new(),
    }
}

fn find_title_heading(node: &Handle) -> Option<Handle> {
    if rules::element_tag(node).as_deref() == Some("h1")
        && rules::attr_value(node, "id").as_deref() == Some(TITLE_ID)
    {
        return Some(node.clone());
    }

    for child in node.children.borrow().iter() {
        if let Some(found) = find_title_heading(child) {
            return Some(found);
        }
    }

    None
}

/// Direct children of the content container restricted to the allowed block
/// tags, in document order; an absent container yields an empty sequence
fn select_blocks(root: &Handle) -> Vec<Block> {
    let container = match find_container(root) {
        Some(container) => container,
        None => return Vec::new(),
    };

    let mut blocks = Vec::new();
    for child in container.children.borrow().iter() {
        if let Some(tag) = rules::element_tag(child) {
            if let Some(kind) = BlockKind::classify(&tag) {
                blocks.push(Block {
                    kind,
                    node: child.clone(),
                });
            }
        }
    }

    blocks
}

fn find_container(node: &Handle) -> Option<Handle> {
    if rules::has_class(node, CONTENT_CLASS) {
        return Some(node.clone());
    }

    for child in node.children.borrow().iter() {
        if let Some(found) = find_container(child) {
            return Some(found);
        }
    }

    None
}

/// Strip internal newlines so a heading or paragraph renders on one line
fn single_line(content: &str) -> String {
    content.replace('\n', "")
}

/// Per-block whitespace normalization: no leading newlines, and every run of
/// two or more newlines collapsed to exactly two
fn normalize_fragment(fragment: &str) -> String {
    let trimmed = fragment.trim_start_matches('\n');

    let mut normalized = String::with_capacity(trimmed.len());
    let mut newline_run = 0usize;
    for ch in trimmed.chars() {
        if ch == '\n' {
            newline_run += 1;
            if newline_run <= 2 {
                normalized.push(ch);
            }
        } else {
            newline_run = 0;
            normalized.push(ch);
        }
    }

    normalized
}

fn collect_text(node: &Handle) -> String {
    let mut text = String::new();
    push_text(node, &mut text);
    text
}

fn push_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { ref contents } = node.data {
        out.push_str(&contents.borrow());
    }

    for child in node.children.borrow().iter() {
        push_text(child, out);
    }
}
