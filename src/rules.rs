//! Tag-keyed rewrite rules applied during bottom-up rendering
//!
//! A rule receives the fully rendered text of a node's descendants, never raw
//! markup, and decides what the node contributes to its parent. Rules are a
//! closed set keyed by tag name; at most one rule fires per node, and tags
//! without a rule pass their gathered content through unchanged, which is how
//! nested inline elements compose without explicit handling.
//!
//! The drop rules mirror what Wikipedia pages require: fragment-only anchors
//! (footnote jumps, section links) and the editor affordances MediaWiki
//! injects into headings contribute nothing to the article body.

use markup5ever_rcdom::{Handle, NodeData};

use crate::error::ConversionError;

/// Class marking the "[edit]" span MediaWiki appends to section headings
const EDIT_SECTION_CLASS: &str = "mw-editsection";
/// Class marking the visual-editor variant of the edit link
const EDIT_VISUAL_CLASS: &str = "mw-editsection-visualeditor";

/// Element kinds with a dedicated rewrite rule
///
/// Closed enumeration with exhaustive dispatch; extending the rule set means
/// adding a variant here and an arm in [`RuleSet::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagRule {
    Anchor,
    Span,
    ListItem,
}

impl TagRule {
    fn for_tag(tag: &str) -> Option<TagRule> {
        match tag {
            "a" => Some(TagRule::Anchor),
            "span" => Some(TagRule::Span),
            "li" => Some(TagRule::ListItem),
            _ => None,
        }
    }
}

/// Immutable rule table, built once at startup and injected into the renderer
///
/// The table holds no mutable state, so one `RuleSet` can serve any number of
/// concurrent conversions.
#[derive(Debug, Default)]
pub struct RuleSet;

impl RuleSet {
    pub fn new() -> Self {
        RuleSet
    }

    /// Apply the rule registered for `node`'s tag to its rendered content
    ///
    /// Returns the node's contribution to its parent. Tags without a rule
    /// pass `content` through unchanged.
    ///
    /// # Errors
    ///
    /// A rule that cannot produce output surfaces
    /// [`ConversionError::RuleFailure`]; the caller aborts the whole
    /// conversion rather than emit a partial document.
    pub fn apply(&self, node: &Handle, content: String) -> Result<String, ConversionError> {
        let tag = match element_tag(node) {
            Some(tag) => tag,
            None => return Ok(content),
        };

        match TagRule::for_tag(&tag) {
            Some(TagRule::Anchor) => self.rewrite_anchor(node, content),
            Some(TagRule::Span) => self.rewrite_span(node, content),
            Some(TagRule::ListItem) => self.rewrite_list_item(content),
            None => Ok(content),
        }
    }

    /// Anchors never keep link markup: fragment jumps and visual-editor links
    /// vanish entirely, everything else contributes its inner text only.
    fn rewrite_anchor(&self, node: &Handle, content: String) -> Result<String, ConversionError> {
        if let Some(href) = attr_value(node, "href") {
            if href.starts_with('#') {
                return Ok(String::new());
            }
        }

        if has_class(node, EDIT_VISUAL_CLASS) {
            return Ok(String::new());
        }

        Ok(content)
    }

    fn rewrite_span(&self, node: &Handle, content: String) -> Result<String, ConversionError> {
        if has_class(node, EDIT_SECTION_CLASS) {
            return Ok(String::new());
        }

        Ok(content)
    }

    /// List items become dash-marked single lines; an item whose content
    /// collapses to nothing is dropped rather than emitted as a bare marker.
    fn rewrite_list_item(&self, content: String) -> Result<String, ConversionError> {
        let collapsed = collapse_whitespace(&content);
        if collapsed.is_empty() {
            return Ok(String::new());
        }

        Ok(format!("- {}\n", collapsed))
    }
}

/// Tag name of an element node, `None` for every other node kind
pub(crate) fn element_tag(node: &Handle) -> Option<String> {
    match node.data {
        NodeData::Element { ref name, .. } => Some(name.local.as_ref().to_string()),
        _ => None,
    }
}

/// Value of the named attribute on an element node
pub(crate) fn attr_value(node: &Handle, attr_name: &str) -> Option<String> {
    match node.data {
        NodeData::Element { ref attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| attr.name.local.as_ref() == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

/// Whether an element's `class` attribute contains `class_name` as a
/// whitespace-separated token
pub(crate) fn has_class(node: &Handle, class_name: &str) -> bool {
    match attr_value(node, "class") {
        Some(classes) => classes.split_whitespace().any(|c| c == class_name),
        None => false,
    }
}

/// Collapse every whitespace run to a single space and trim the ends
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_html;
    use markup5ever_rcdom::Handle;

    /// Parse a snippet and return the first element with the given tag
    fn first_element(html: &str, tag: &str) -> Handle {
        let dom = parse_html(html.as_bytes()).expect("snippet should parse");
        find_tag(&dom.document, tag).expect("tag should be present")
    }

    fn find_tag(node: &Handle, tag: &str) -> Option<Handle> {
        if element_tag(node).as_deref() == Some(tag) {
            return Some(node.clone());
        }
        for child in node.children.borrow().iter() {
            if let Some(found) = find_tag(child, tag) {
                return Some(found);
            }
        }
        None
    }

    #[test]
    fn test_fragment_anchor_is_dropped() {
        let node = first_element("<a href=\"#cite_note-1\">[1]</a>", "a");
        let out = RuleSet::new().apply(&node, "[1]".to_string()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_visual_editor_anchor_is_dropped() {
        let node = first_element(
            "<a class=\"mw-editsection-visualeditor\" href=\"/edit\">edit</a>",
            "a",
        );
        let out = RuleSet::new().apply(&node, "edit".to_string()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_external_anchor_keeps_text_only() {
        let node = first_element("<a href=\"https://example.com\">link</a>", "a");
        let out = RuleSet::new().apply(&node, "link".to_string()).unwrap();
        assert_eq!(out, "link", "No link markup, no URL");
    }

    #[test]
    fn test_anchor_without_href_keeps_text() {
        let node = first_element("<a name=\"x\">text</a>", "a");
        let out = RuleSet::new().apply(&node, "text".to_string()).unwrap();
        assert_eq!(out, "text");
    }

    #[test]
    fn test_edit_section_span_is_dropped() {
        let node = first_element("<span class=\"mw-editsection\">[edit]</span>", "span");
        let out = RuleSet::new().apply(&node, "[edit]".to_string()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_plain_span_passes_through() {
        let node = first_element("<span class=\"note other\">kept</span>", "span");
        let out = RuleSet::new().apply(&node, "kept".to_string()).unwrap();
        assert_eq!(out, "kept");
    }

    #[test]
    fn test_class_matching_is_token_based() {
        // "mw-editsection-visualeditor" must not match the plain
        // "mw-editsection" token
        let node = first_element(
            "<span class=\"mw-editsection-visualeditor\">kept</span>",
            "span",
        );
        let out = RuleSet::new().apply(&node, "kept".to_string()).unwrap();
        assert_eq!(out, "kept");
    }

    #[test]
    fn test_list_item_gets_marker() {
        let node = first_element("<ul><li>Item</li></ul>", "li");
        let out = RuleSet::new().apply(&node, "Item".to_string()).unwrap();
        assert_eq!(out, "- Item\n");
    }

    #[test]
    fn test_empty_list_item_is_dropped() {
        let node = first_element("<ul><li>  </li></ul>", "li");
        let out = RuleSet::new().apply(&node, "  ".to_string()).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_unruled_tag_passes_content_through() {
        let node = first_element("<b>bold</b>", "b");
        let out = RuleSet::new().apply(&node, "bold".to_string()).unwrap();
        assert_eq!(out, "bold");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), "a b");
        assert_eq!(collapse_whitespace("\n \n"), "");
    }
}
