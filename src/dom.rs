//! Owned document tree
//!
//! The converter never walks a parsed page in place. Bodies are copied out of
//! the `scraper` document into `DocumentNode` values, so pruning decoration
//! nodes edits a private tree and the source document stays untouched.

use std::fmt;

use scraper::{ElementRef, Html, Node};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Element nesting kept when copying out of a parsed document. Anything
/// deeper becomes plain text.
pub const MAX_DEPTH: usize = 256;

/// A node of the owned tree: character data or an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentNode {
    Text(String),
    Element(ElementNode),
}

/// An element with a lower-cased tag name, its attributes and its children
/// in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<DocumentNode>,
}

impl ElementNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_child(mut self, child: impl Into<DocumentNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

impl From<ElementNode> for DocumentNode {
    fn from(element: ElementNode) -> Self {
        DocumentNode::Element(element)
    }
}

impl From<&str> for DocumentNode {
    fn from(text: &str) -> Self {
        DocumentNode::Text(text.to_string())
    }
}

impl DocumentNode {
    pub fn text(text: impl Into<String>) -> Self {
        DocumentNode::Text(text.into())
    }

    /// Deep-copy an element of a parsed document.
    ///
    /// Comments, doctypes and processing instructions are dropped; they carry
    /// no text and no formatting. Elements more than [`MAX_DEPTH`] levels
    /// below `element` are flattened into a single text node holding their
    /// text content, so the copy stays shallow enough for recursive walks.
    pub fn from_element(element: ElementRef<'_>) -> Self {
        Self::copy_element(element, 0)
    }

    fn copy_element(element: ElementRef<'_>, depth: usize) -> Self {
        let value = element.value();
        let mut node = ElementNode {
            tag: value.name().to_ascii_lowercase(),
            attrs: value
                .attrs()
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect(),
            children: Vec::new(),
        };

        for child in element.children() {
            match child.value() {
                Node::Text(text) => node.children.push(DocumentNode::Text(String::from(&**text))),
                Node::Element(_) => {
                    let Some(child_el) = ElementRef::wrap(child) else {
                        continue;
                    };
                    if depth + 1 >= MAX_DEPTH {
                        debug!(tag = child_el.value().name(), depth = depth + 1, "flattening deeply nested markup");
                        node.children.push(DocumentNode::Text(child_el.text().collect()));
                    } else {
                        node.children.push(Self::copy_element(child_el, depth + 1));
                    }
                }
                _ => {}
            }
        }

        DocumentNode::Element(node)
    }

    /// Parse an HTML fragment. The result is the synthetic `<html>` root that
    /// wraps the fragment's top-level nodes.
    pub fn from_fragment(html: &str) -> Self {
        let fragment = Html::parse_fragment(html);
        Self::from_element(fragment.root_element())
    }

    pub fn as_element(&self) -> Option<&ElementNode> {
        match self {
            DocumentNode::Element(element) => Some(element),
            DocumentNode::Text(_) => None,
        }
    }

    /// Concatenated character data of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            DocumentNode::Text(text) => out.push_str(text),
            DocumentNode::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Remove every descendant element matching `predicate`, subtree included.
    /// Returns how many elements were removed. The node itself is never removed.
    pub fn prune<F>(&mut self, predicate: &F) -> usize
    where
        F: Fn(&ElementNode) -> bool,
    {
        let DocumentNode::Element(element) = self else {
            return 0;
        };

        let before = element.children.len();
        element
            .children
            .retain(|child| !matches!(child, DocumentNode::Element(el) if predicate(el)));
        let mut removed = before - element.children.len();

        for child in &mut element.children {
            removed += child.prune(predicate);
        }

        removed
    }
}

/// A `tag.class.class` matcher used to identify removable nodes.
///
/// The tag may be omitted or `*`; every listed class must be present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeMatcher {
    tag: Option<String>,
    classes: Vec<String>,
}

impl NodeMatcher {
    /// Match `tag` elements carrying `class`.
    pub fn tag_with_class(tag: &str, class: &str) -> Self {
        Self {
            tag: Some(tag.to_ascii_lowercase()),
            classes: vec![class.to_string()],
        }
    }

    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        if input.is_empty() {
            return Err("empty matcher".to_string());
        }

        let mut parts = input.split('.');
        let tag = match parts.next() {
            Some("") | Some("*") | None => None,
            Some(tag) => {
                if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                    return Err(format!("invalid tag name in matcher '{}'", input));
                }
                Some(tag.to_ascii_lowercase())
            }
        };

        let mut classes = Vec::new();
        for class in parts {
            if class.is_empty() || class.chars().any(char::is_whitespace) {
                return Err(format!("invalid class in matcher '{}'", input));
            }
            classes.push(class.to_string());
        }

        if tag.is_none() && classes.is_empty() {
            return Err(format!("matcher '{}' matches every element", input));
        }

        Ok(Self { tag, classes })
    }

    pub fn matches(&self, element: &ElementNode) -> bool {
        if let Some(tag) = &self.tag {
            if *tag != element.tag {
                return false;
            }
        }
        self.classes.iter().all(|class| element.has_class(class))
    }
}

impl TryFrom<String> for NodeMatcher {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NodeMatcher> for String {
    fn from(matcher: NodeMatcher) -> Self {
        matcher.to_string()
    }
}

impl fmt::Display for NodeMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag.as_deref().unwrap_or("*"))?;
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}
