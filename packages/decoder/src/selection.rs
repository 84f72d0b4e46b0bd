//! Selection adapter over the `scraper` document tree
//!
//! A [`Selection`] is an ordered, duplicate free list of nodes borrowed from a
//! parsed document. Every query the decoder needs (descendant search,
//! filtering, tree navigation and value extraction) lives here so the decode
//! path never touches the underlying tree directly.

use crate::error::{SelectorError, SelectorResult};
use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;

/// A node of a parsed document
pub type HtmlNode<'doc> = NodeRef<'doc, Node>;

/// Compile a CSS selector
pub fn compile(selector: &str) -> SelectorResult<Selector> {
    Selector::parse(selector).map_err(|err| SelectorError::new(selector, err.to_string()))
}

/// Ordered set of matched nodes
#[derive(Debug, Clone, Default)]
pub struct Selection<'doc> {
    nodes: Vec<HtmlNode<'doc>>,
}

impl<'doc> Selection<'doc> {
    /// Build a selection from raw nodes, dropping duplicates
    pub fn from_nodes(nodes: impl IntoIterator<Item = HtmlNode<'doc>>) -> Self {
        let mut seen = HashSet::new();
        Self {
            nodes: nodes.into_iter().filter(|node| seen.insert(node.id())).collect(),
        }
    }

    /// Selection holding the document node itself
    pub fn from_document(html: &'doc Html) -> Self {
        Self {
            nodes: vec![html.tree.root()],
        }
    }

    pub fn nodes(&self) -> &[HtmlNode<'doc>] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Single node selection at `index`, empty when out of range
    pub fn eq(&self, index: usize) -> Selection<'doc> {
        Self {
            nodes: self.nodes.get(index).copied().into_iter().collect(),
        }
    }

    pub fn first(&self) -> Selection<'doc> {
        self.eq(0)
    }

    pub fn last(&self) -> Selection<'doc> {
        Self {
            nodes: self.nodes.last().copied().into_iter().collect(),
        }
    }

    /// One single node selection per matched node, in order
    pub fn iter(&self) -> impl Iterator<Item = Selection<'doc>> + '_ {
        self.nodes.iter().map(|node| Selection { nodes: vec![*node] })
    }

    /// Visit each node until the callback returns false
    pub fn each_with_break(&self, mut f: impl FnMut(usize, Selection<'doc>) -> bool) {
        for (index, selection) in self.iter().enumerate() {
            if !f(index, selection) {
                break;
            }
        }
    }

    /// Descendants of every node matching `selector`, in document order
    pub fn find(&self, selector: &Selector) -> Selection<'doc> {
        Self::from_nodes(self.nodes.iter().flat_map(|node| {
            node.descendants()
                .skip(1)
                .filter(move |candidate| matches(selector, *candidate))
        }))
    }

    /// Nodes of this selection matching `selector`
    pub fn filter(&self, selector: &Selector) -> Selection<'doc> {
        Self {
            nodes: self
                .nodes
                .iter()
                .copied()
                .filter(|node| matches(selector, *node))
                .collect(),
        }
    }

    /// Element children of every node
    pub fn children(&self) -> Selection<'doc> {
        Self::from_nodes(
            self.nodes
                .iter()
                .flat_map(|node| node.children().filter(is_element)),
        )
    }

    /// All children of every node, text and comments included
    pub fn contents(&self) -> Selection<'doc> {
        Self::from_nodes(self.nodes.iter().flat_map(|node| node.children()))
    }

    /// Element parent of every node
    pub fn parent(&self) -> Selection<'doc> {
        Self::from_nodes(
            self.nodes
                .iter()
                .filter_map(|node| node.parent())
                .filter(is_element),
        )
    }

    /// Element ancestors of every node, nearest first
    pub fn parents(&self) -> Selection<'doc> {
        Self::from_nodes(
            self.nodes
                .iter()
                .flat_map(|node| node.ancestors().filter(is_element)),
        )
    }

    /// Next element sibling of every node
    pub fn next(&self) -> Selection<'doc> {
        Self::from_nodes(
            self.nodes
                .iter()
                .filter_map(|node| node.next_siblings().find(is_element)),
        )
    }

    pub fn next_all(&self) -> Selection<'doc> {
        Self::from_nodes(
            self.nodes
                .iter()
                .flat_map(|node| node.next_siblings().filter(is_element)),
        )
    }

    /// Previous element sibling of every node
    pub fn prev(&self) -> Selection<'doc> {
        Self::from_nodes(
            self.nodes
                .iter()
                .filter_map(|node| node.prev_siblings().find(is_element)),
        )
    }

    pub fn prev_all(&self) -> Selection<'doc> {
        Self::from_nodes(
            self.nodes
                .iter()
                .flat_map(|node| node.prev_siblings().filter(is_element)),
        )
    }

    /// Union of the element siblings of each node
    ///
    /// A node is only excluded from its own siblings, so two selected
    /// siblings appear in each other's result.
    pub fn siblings(&self) -> Selection<'doc> {
        Self::from_nodes(self.nodes.iter().flat_map(|node| {
            let own = node.id();
            node.parent()
                .into_iter()
                .flat_map(|parent| parent.children())
                .filter(move |sibling| is_element(sibling) && sibling.id() != own)
        }))
    }

    /// Combined text content of every node
    pub fn text(&self) -> String {
        let mut text = String::new();
        for node in &self.nodes {
            for descendant in node.descendants() {
                if let Node::Text(chunk) = descendant.value() {
                    text.push_str(chunk);
                }
            }
        }
        text
    }

    /// Serialized inner markup of the first node
    pub fn html(&self) -> String {
        match self.nodes.first() {
            Some(node) => match ElementRef::wrap(*node) {
                Some(element) => element.inner_html(),
                None => serialize_children(*node),
            },
            None => String::new(),
        }
    }

    /// Serialized markup of every node, the nodes themselves included
    pub fn outer_html(&self) -> Vec<String> {
        self.nodes.iter().map(|node| serialize_node(*node)).collect()
    }

    /// Attribute of the first node
    pub fn attr(&self, name: &str) -> Option<&'doc str> {
        self.nodes
            .first()
            .and_then(|node| node.value().as_element())
            .and_then(|element| element.attr(name))
    }
}

fn is_element(node: &HtmlNode<'_>) -> bool {
    node.value().is_element()
}

fn matches(selector: &Selector, node: HtmlNode<'_>) -> bool {
    ElementRef::wrap(node).is_some_and(|element| selector.matches(&element))
}

fn serialize_children(node: HtmlNode<'_>) -> String {
    node.children().map(serialize_node).collect()
}

fn serialize_node(node: HtmlNode<'_>) -> String {
    if let Some(element) = ElementRef::wrap(node) {
        return element.html();
    }
    match node.value() {
        Node::Text(text) => escape_text(text),
        Node::Comment(comment) => format!("<!--{}-->", &**comment),
        Node::Doctype(doctype) => format!("<!DOCTYPE {}>", doctype.name()),
        _ => serialize_children(node),
    }
}

fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '\u{a0}' => escaped.push_str("&nbsp;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
