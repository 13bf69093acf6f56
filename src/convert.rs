//! HTML tree to Markdown-like text
//!
//! A single depth-first walk. Markers are symmetric: bold and italic emit the
//! same delimiter on entry and exit, block elements break lines around their
//! content. Anything the rules don't know is a plain container, so conversion
//! cannot fail.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{DocumentNode, ElementNode, NodeMatcher};
use crate::normalize::collapse_newlines;

pub const LIST_MARKER: &str = "- ";
pub const BOLD_DELIMITER: &str = "**";
pub const ITALIC_DELIMITER: &str = "*";

const LIST_ITEM_TAG: &str = "li";

/// Tag sets and removable-node matchers driving the conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionRules {
    pub block_tags: Vec<String>,
    pub bold_tags: Vec<String>,
    pub italic_tags: Vec<String>,
    /// Nodes stripped from the copied tree before walking (permalink anchors).
    pub removable: Vec<NodeMatcher>,
}

impl Default for ConversionRules {
    fn default() -> Self {
        Self {
            block_tags: ["h1", "h2", "h3", "h4", "h5", "h6", "p", "div", "li"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            bold_tags: vec!["strong".to_string(), "b".to_string()],
            italic_tags: vec!["em".to_string(), "i".to_string()],
            removable: vec![NodeMatcher::tag_with_class("a", "c_permamlink__aa7")],
        }
    }
}

/// How an element takes part in the output. Computed once per visited node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Block { list_item: bool },
    Bold,
    Italic,
    Container,
}

impl TagKind {
    fn delimiter(self) -> Option<&'static str> {
        match self {
            TagKind::Bold => Some(BOLD_DELIMITER),
            TagKind::Italic => Some(ITALIC_DELIMITER),
            TagKind::Block { .. } | TagKind::Container => None,
        }
    }
}

/// Tree-to-text converter.
#[derive(Debug, Clone)]
pub struct Converter {
    block: HashSet<String>,
    bold: HashSet<String>,
    italic: HashSet<String>,
    removable: Vec<NodeMatcher>,
}

impl Converter {
    pub fn new(rules: &ConversionRules) -> Self {
        Self {
            block: tag_set(&rules.block_tags),
            bold: tag_set(&rules.bold_tags),
            italic: tag_set(&rules.italic_tags),
            removable: rules.removable.clone(),
        }
    }

    /// Block wins over bold, bold over italic, when a tag sits in several sets.
    pub fn classify(&self, tag: &str) -> TagKind {
        if self.block.contains(tag) {
            TagKind::Block {
                list_item: tag == LIST_ITEM_TAG,
            }
        } else if self.bold.contains(tag) {
            TagKind::Bold
        } else if self.italic.contains(tag) {
            TagKind::Italic
        } else {
            TagKind::Container
        }
    }

    pub fn is_removable(&self, element: &ElementNode) -> bool {
        self.removable.iter().any(|m| m.matches(element))
    }

    /// Convert `root` to formatted text.
    ///
    /// Works on a private copy of the tree. Runs of three or more newlines are
    /// collapsed to two and the result is trimmed.
    pub fn convert(&self, root: &DocumentNode) -> String {
        if root.as_element().is_some_and(|el| self.is_removable(el)) {
            return String::new();
        }

        let mut tree = root.clone();
        let removed = tree.prune(&|el: &ElementNode| self.is_removable(el));
        if removed > 0 {
            debug!(removed, "pruned removable nodes before conversion");
        }

        let mut out = String::new();
        self.walk(&tree, 0, &mut out);

        collapse_newlines(&out, 2).trim().to_string()
    }

    fn walk(&self, node: &DocumentNode, depth: usize, out: &mut String) {
        let element = match node {
            DocumentNode::Text(text) => {
                out.push_str(text.trim());
                return;
            }
            DocumentNode::Element(element) => element,
        };

        let kind = self.classify(&element.tag);

        if let TagKind::Block { list_item } = kind {
            // Root-level blocks start flush, nested ones on a new line
            if depth > 0 {
                out.push('\n');
            }
            if list_item {
                out.push_str(LIST_MARKER);
            }
        }
        if let Some(delimiter) = kind.delimiter() {
            out.push_str(delimiter);
        }

        for child in &element.children {
            self.walk(child, depth + 1, out);
        }

        if let Some(delimiter) = kind.delimiter() {
            out.push_str(delimiter);
        }
        if matches!(kind, TagKind::Block { .. }) {
            out.push('\n');
        }
    }
}

fn tag_set(tags: &[String]) -> HashSet<String> {
    tags.iter().map(|t| t.to_ascii_lowercase()).collect()
}

impl Default for Converter {
    fn default() -> Self {
        Self::new(&ConversionRules::default())
    }
}

/// Convert with the default rules.
pub fn convert(root: &DocumentNode) -> String {
    Converter::default().convert(root)
}

/// Parse an HTML fragment and convert it with the default rules.
pub fn convert_html(html: &str) -> String {
    convert(&DocumentNode::from_fragment(html))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("<b>x</b>", "**x**")]
    #[case("<strong>x</strong>", "**x**")]
    #[case("<i>x</i>", "*x*")]
    #[case("<em>x</em>", "*x*")]
    #[case("<em><strong>x</strong></em>", "***x***")]
    #[case("<strong><em>x</em></strong>", "***x***")]
    #[case("<p>a</p><p>b</p>", "a\n\nb")]
    #[case("<h1>Title</h1>text", "Title\ntext")]
    #[case("<ul><li>one</li><li>two</li></ul>", "- one\n\n- two")]
    #[case("<p>Hello <b>world</b></p>", "Hello**world**")]
    #[case("<custom-tag>hi <blink>there</blink></custom-tag>", "hithere")]
    #[case("<table><tr><td>cell</td></tr></table>", "cell")]
    fn test_convert_fragment(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(convert_html(html), expected);
    }

    #[test]
    fn test_text_only_tree_is_trimmed_plain_text() {
        let root = DocumentNode::text("  plain words \n");
        assert_eq!(convert(&root), "plain words");
    }

    #[test]
    fn test_root_block_has_no_leading_newline() {
        let root: DocumentNode = ElementNode::new("li").with_child("item").into();
        assert_eq!(convert(&root), "- item");

        let root: DocumentNode = ElementNode::new("div")
            .with_child(ElementNode::new("p").with_child("inner"))
            .into();
        assert_eq!(convert(&root), "inner");
    }

    #[test]
    fn test_no_triple_newlines() {
        let html = "<div><p>a</p><div><div></div></div><p></p><p></p><p>b</p></div>";
        let text = convert_html(html);
        assert!(!text.contains("\n\n\n"), "got {:?}", text);
        assert!(text.starts_with('a'));
        assert!(text.ends_with('b'));
    }

    #[test]
    fn test_permalink_anchors_are_removed() {
        let html = r##"<h2>Heading<a class="c_permamlink__aa7" href="#h">#</a></h2><p>Body</p>"##;
        assert_eq!(convert_html(html), "Heading\n\nBody");
    }

    #[test]
    fn test_removable_root_converts_to_nothing() {
        let root: DocumentNode = ElementNode::new("a")
            .with_attr("class", "c_permamlink__aa7")
            .with_child("#")
            .into();
        assert_eq!(convert(&root), "");
    }

    #[test]
    fn test_convert_does_not_mutate_input() {
        let root = DocumentNode::from_fragment(r#"<p>x<a class="c_permamlink__aa7">#</a></p>"#);
        let before = root.clone();
        let _ = convert(&root);
        assert_eq!(root, before);
    }

    #[test]
    fn test_custom_rules() {
        let rules = ConversionRules {
            block_tags: vec!["BLOCKQUOTE".to_string()],
            bold_tags: vec!["mark".to_string()],
            italic_tags: vec!["cite".to_string()],
            removable: vec![NodeMatcher::parse(".hidden").unwrap()],
        };
        let converter = Converter::new(&rules);

        let root = DocumentNode::from_fragment(
            r#"<blockquote><mark>hot</mark><cite>src</cite><span class="hidden">x</span></blockquote><p>para</p>"#,
        );
        assert_eq!(converter.convert(&root), "**hot***src*\npara");
    }

    #[test]
    fn test_deeply_nested_markup_converts() {
        let html = format!(
            "<p><b>{}deep{}</b></p><p>after</p>",
            "<span>".repeat(30_000),
            "</span>".repeat(30_000)
        );
        assert_eq!(convert_html(&html), "**deep**\n\nafter");
    }

    #[test]
    fn test_classify() {
        let converter = Converter::default();
        assert_eq!(converter.classify("li"), TagKind::Block { list_item: true });
        assert_eq!(converter.classify("h3"), TagKind::Block { list_item: false });
        assert_eq!(converter.classify("b"), TagKind::Bold);
        assert_eq!(converter.classify("i"), TagKind::Italic);
        assert_eq!(converter.classify("span"), TagKind::Container);
    }
}
