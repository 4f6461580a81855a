//! Tree traversal capability set used by the extraction heuristics.
//!
//! The card locator, field extractor and listing scanner never touch a parser
//! type directly. They work against [`TreeNode`], which is implemented for
//! `scraper`'s [`ElementRef`] and, in tests, for a small synthetic tree.

use scraper::{ElementRef, Html};

/// An element in a parsed document.
///
/// Only elements are exposed; text nodes are folded into [`TreeNode::flat_text`].
pub trait TreeNode: Clone {
    /// Lowercase tag name (`"a"`, `"p"`, `"h2"`...).
    fn tag_name(&self) -> String;

    /// Value of an attribute, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Enclosing element, or `None` at the document root.
    fn parent_node(&self) -> Option<Self>;

    /// Descendant elements in document order, excluding `self`.
    fn descendant_nodes(&self) -> Vec<Self>;

    /// All text beneath the element, text nodes joined with single spaces and
    /// surrounding whitespace removed.
    fn flat_text(&self) -> String;

    /// Descendants with the given tag, in document order.
    fn find_all(&self, tag: &str) -> Vec<Self> {
        self.descendant_nodes()
            .into_iter()
            .filter(|n| n.tag_name() == tag)
            .collect()
    }

    fn is_heading(&self) -> bool {
        matches!(
            self.tag_name().as_str(),
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6"
        )
    }
}

impl<'a> TreeNode for ElementRef<'a> {
    fn tag_name(&self) -> String {
        self.value().name().to_ascii_lowercase()
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.value().attr(name).map(str::to_string)
    }

    fn parent_node(&self) -> Option<Self> {
        (**self).parent().and_then(ElementRef::wrap)
    }

    fn descendant_nodes(&self) -> Vec<Self> {
        (**self)
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .collect()
    }

    fn flat_text(&self) -> String {
        collapse_whitespace(ElementRef::text(self))
    }
}

/// Every element of `document` in document order, starting with the root.
pub fn document_nodes(document: &Html) -> Vec<ElementRef<'_>> {
    let root = document.root_element();
    let mut nodes = vec![root];
    nodes.extend(root.descendant_nodes());
    nodes
}

/// Join text fragments with single spaces, dropping whitespace-only pieces.
pub fn collapse_whitespace<'t>(fragments: impl IntoIterator<Item = &'t str>) -> String {
    fragments
        .into_iter()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}
