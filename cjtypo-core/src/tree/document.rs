//! In-memory document implementing [`ContentTree`]
//!
//! Nodes live in an arena and are addressed by [`NodeId`]. Replaced nodes
//! stay in the arena but are detached from their parent.
//!
//! Documents are built from [`NodeSpec`] values, the serde form used for
//! JSON input and output:
//!
//! ```json
//! {"tag": "p", "lang": "zh-TW", "children": [{"text": "用Rust寫"}]}
//! ```
//!
//! Elements without an explicit `style` get the display their tag has in a
//! default user agent stylesheet.

use std::fmt;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::segment::{escape_html, StyledOutput};
use crate::tree::selector::{Selectable, Selector};
use crate::tree::{ComputedStyle, ContentTree, Display, NodeKind, TreeError};

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "body",
    "dd",
    "details",
    "dialog",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "html",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "ul",
];

const HIDDEN_TAGS: &[&str] = &["head", "link", "meta", "script", "style", "template", "title"];

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Display of `tag` in a default stylesheet
pub fn default_style_for(tag: &str) -> ComputedStyle {
    let tag = tag.to_ascii_lowercase();
    let display = match tag.as_str() {
        "li" => Display::ListItem,
        "table" => Display::Table,
        t if BLOCK_TAGS.contains(&t) => Display::Block,
        t if HIDDEN_TAGS.contains(&t) => Display::None,
        _ => Display::Inline,
    };
    ComputedStyle {
        display,
        ..ComputedStyle::default()
    }
}

/// Handle of a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Element data
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub lang: Option<String>,
    pub style: ComputedStyle,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into().to_ascii_lowercase();
        let style = default_style_for(&tag);
        Self {
            tag,
            id: None,
            classes: Vec::new(),
            lang: None,
            style,
        }
    }

    fn from_spec(spec: &ElementSpec) -> Self {
        let tag = spec.tag.to_ascii_lowercase();
        let style = spec
            .style
            .clone()
            .unwrap_or_else(|| default_style_for(&tag));
        Self {
            tag,
            id: spec.id.clone(),
            classes: spec.classes.clone(),
            lang: spec.lang.clone(),
            style,
        }
    }
}

impl Selectable for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum NodeData {
    Root,
    Text(String),
    Element(Element),
    Comment(String),
}

/// Arena slot; children form a doubly linked sibling list
#[derive(Debug, Clone)]
struct Node {
    data: NodeData,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

impl Node {
    fn new(data: NodeData, parent: Option<NodeId>) -> Self {
        Self {
            data,
            parent,
            first_child: None,
            last_child: None,
            prev: None,
            next: None,
        }
    }
}

/// Serde form of a node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeSpec {
    Text { text: String },
    Comment { comment: String },
    Element(ElementSpec),
}

/// Serde form of an element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSpec {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "class", skip_serializing_if = "Vec::is_empty")]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// Falls back to [`default_style_for`] the tag
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<ComputedStyle>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSpec>,
}

// Flatten nested children before dropping so deep specs do not recurse
impl Drop for ElementSpec {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            if let NodeSpec::Element(element) = &mut child {
                pending.append(&mut element.children);
            }
        }
    }
}

impl NodeSpec {
    pub fn text(text: impl Into<String>) -> Self {
        NodeSpec::Text { text: text.into() }
    }

    pub fn comment(comment: impl Into<String>) -> Self {
        NodeSpec::Comment {
            comment: comment.into(),
        }
    }

    pub fn element(tag: impl Into<String>, style: ComputedStyle, children: Vec<NodeSpec>) -> Self {
        NodeSpec::Element(ElementSpec {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            lang: None,
            style: Some(style),
            children,
        })
    }

    /// Element with the default style of its tag
    pub fn tag(tag: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        NodeSpec::Element(ElementSpec {
            tag: tag.into(),
            id: None,
            classes: Vec::new(),
            lang: None,
            style: None,
            children,
        })
    }

    pub fn as_element_mut(&mut self) -> Option<&mut ElementSpec> {
        match self {
            NodeSpec::Element(element) => Some(element),
            _ => None,
        }
    }

    /// No-op on text and comments
    pub fn set_lang(&mut self, lang: impl Into<String>) {
        if let Some(element) = self.as_element_mut() {
            element.lang = Some(lang.into());
        }
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        if let Some(element) = self.as_element_mut() {
            element.id = Some(id.into());
        }
    }

    pub fn add_class(&mut self, class: impl Into<String>) {
        if let Some(element) = self.as_element_mut() {
            element.classes.push(class.into());
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.set_lang(lang);
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.add_class(class);
        self
    }
}

/// JSON input: a single node or a list of top-level nodes
#[derive(Deserialize)]
#[serde(untagged)]
enum JsonInput {
    Many(Vec<NodeSpec>),
    One(NodeSpec),
}

/// Arena-backed content tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Empty document holding only the root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeData::Root, None)],
        }
    }

    pub fn from_spec(spec: &NodeSpec) -> Self {
        Self::from_specs(std::slice::from_ref(spec))
    }

    pub fn from_specs(specs: &[NodeSpec]) -> Self {
        let mut doc = Self::new();
        let root = doc.root();
        for spec in specs {
            doc.append(root, spec);
        }
        doc
    }

    /// Parse a JSON node or array of nodes
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        Ok(match serde_json::from_str::<JsonInput>(json)? {
            JsonInput::Many(specs) => Self::from_specs(&specs),
            JsonInput::One(spec) => Self::from_spec(&spec),
        })
    }

    /// One `p` per non-blank line
    pub fn from_paragraphs(text: &str) -> Self {
        let specs: Vec<NodeSpec> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| NodeSpec::tag("p", vec![NodeSpec::text(line)]))
            .collect();
        Self::from_specs(&specs)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Whether the root has no children
    pub fn is_empty(&self) -> bool {
        self.children(self.root()).next().is_none()
    }

    /// Children of `node` in document order
    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.node(node).and_then(|n| n.first_child), move |&c| {
            self.node(c).and_then(|n| n.next)
        })
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.node(node)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Text of a text node
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.data {
            NodeData::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Append `spec` and its descendants under `parent`
    pub fn append(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let top = self.push_child(parent, spec);
        let mut pending = vec![(top, spec)];
        while let Some((id, spec)) = pending.pop() {
            if let NodeSpec::Element(element) = spec {
                for child in &element.children {
                    let child_id = self.push_child(id, child);
                    pending.push((child_id, child));
                }
            }
        }
        top
    }

    fn push_child(&mut self, parent: NodeId, spec: &NodeSpec) -> NodeId {
        let data = match spec {
            NodeSpec::Text { text } => NodeData::Text(text.clone()),
            NodeSpec::Comment { comment } => NodeData::Comment(comment.clone()),
            NodeSpec::Element(element) => NodeData::Element(Element::from_spec(element)),
        };
        let id = self.alloc(data, Some(parent));
        let last = self.nodes[parent.0].last_child;
        self.link(parent, last, id, None);
        id
    }

    fn alloc(&mut self, data: NodeData, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(data, parent));
        id
    }

    /// Insert the chain `first..=last` between `prev` and `next` under `parent`
    fn link(&mut self, parent: NodeId, prev: Option<NodeId>, first: NodeId, next: Option<NodeId>) {
        let mut last = first;
        while let Some(following) = self.nodes[last.0].next {
            last = following;
        }
        self.nodes[first.0].prev = prev;
        self.nodes[last.0].next = next;
        match prev {
            Some(prev) => self.nodes[prev.0].next = Some(first),
            None => self.nodes[parent.0].first_child = Some(first),
        }
        match next {
            Some(next) => self.nodes[next.0].prev = Some(last),
            None => self.nodes[parent.0].last_child = Some(last),
        }
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Nodes below `node` in document order, `node` excluded
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self.node(node).and_then(|n| n.first_child);
        std::iter::from_fn(move || {
            let current = next?;
            next = self.node(current).and_then(|n| n.first_child).or_else(|| {
                let mut up = current;
                loop {
                    if let Some(sibling) = self.node(up)?.next {
                        return Some(sibling);
                    }
                    up = self.parent_of(up).filter(|&p| p != node)?;
                }
            });
            Some(current)
        })
    }

    /// Nodes below `node` in reverse document order, children before parents
    fn descendants_rev(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut next = self
            .node(node)
            .and_then(|n| n.last_child)
            .map(|c| self.deepest_last(c));
        std::iter::from_fn(move || {
            let current = next?;
            next = match self.node(current).and_then(|n| n.prev) {
                Some(prev) => Some(self.deepest_last(prev)),
                None => self.parent_of(current).filter(|&p| p != node),
            };
            Some(current)
        })
    }

    fn deepest_last(&self, mut node: NodeId) -> NodeId {
        while let Some(last) = self.node(node).and_then(|n| n.last_child) {
            node = last;
        }
        node
    }

    fn ancestor_elements(&self, node: NodeId) -> impl Iterator<Item = &Element> + Clone + '_ {
        std::iter::successors(self.parent_of(node), move |&n| self.parent_of(n))
            .filter_map(move |n| self.element(n))
    }

    fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.parent
    }

    /// Serialise the document content
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_html(child, &mut out);
        }
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        enum Visit {
            Open(NodeId),
            Close(NodeId),
        }

        let mut stack = vec![Visit::Open(node)];
        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Open(id) => {
                    let Some(node) = self.node(id) else { continue };
                    match &node.data {
                        NodeData::Root => {}
                        NodeData::Text(text) => {
                            out.push_str(&escape_html(text));
                            continue;
                        }
                        NodeData::Comment(comment) => {
                            out.push_str("<!--");
                            out.push_str(comment);
                            out.push_str("-->");
                            continue;
                        }
                        NodeData::Element(element) => {
                            write_open_tag(element, out);
                            if VOID_TAGS.contains(&element.tag.as_str()) {
                                continue;
                            }
                        }
                    }
                    stack.push(Visit::Close(id));
                    stack.extend(
                        std::iter::successors(node.last_child, |&c| self.node(c).and_then(|n| n.prev))
                            .map(Visit::Open),
                    );
                }
                Visit::Close(id) => {
                    if let Some(element) = self.element(id) {
                        out.push_str("</");
                        out.push_str(&element.tag);
                        out.push('>');
                    }
                }
            }
        }
    }

    /// Top-level nodes in their serde form
    pub fn to_node_specs(&self) -> Vec<NodeSpec> {
        self.children(self.root())
            .map(|child| self.to_node_spec(child))
            .collect()
    }

    /// Convert a subtree back to its serde form
    pub fn to_node_spec(&self, node: NodeId) -> NodeSpec {
        // Post-order: (node, next child to convert, converted children)
        let first_child = |id: NodeId| self.node(id).and_then(|n| n.first_child);
        let mut stack: Vec<(NodeId, Option<NodeId>, Vec<NodeSpec>)> =
            vec![(node, first_child(node), Vec::new())];
        loop {
            let Some(top) = stack.last_mut() else {
                return NodeSpec::text("");
            };
            if let Some(child) = top.1 {
                top.1 = self.node(child).and_then(|n| n.next);
                stack.push((child, first_child(child), Vec::new()));
                continue;
            }

            let Some((id, _, children)) = stack.pop() else {
                return NodeSpec::text("");
            };
            let spec = self.spec_of(id, children);
            match stack.last_mut() {
                Some(parent) => parent.2.push(spec),
                None => return spec,
            }
        }
    }

    fn spec_of(&self, id: NodeId, children: Vec<NodeSpec>) -> NodeSpec {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => NodeSpec::text(text.clone()),
            Some(NodeData::Comment(comment)) => NodeSpec::comment(comment.clone()),
            Some(NodeData::Element(element)) => {
                let style = (element.style != default_style_for(&element.tag))
                    .then(|| element.style.clone());
                NodeSpec::Element(ElementSpec {
                    tag: element.tag.clone(),
                    id: element.id.clone(),
                    classes: element.classes.clone(),
                    lang: element.lang.clone(),
                    style,
                    children,
                })
            }
            Some(NodeData::Root) | None => NodeSpec::tag("body", children),
        }
    }
}

fn write_open_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    if let Some(id) = &element.id {
        out.push_str(&format!(" id=\"{}\"", escape_html(id)));
    }
    if !element.classes.is_empty() {
        out.push_str(&format!(" class=\"{}\"", escape_html(&element.classes.join(" "))));
    }
    if let Some(lang) = &element.lang {
        out.push_str(&format!(" lang=\"{}\"", escape_html(lang)));
    }
    out.push('>');
}

impl ContentTree for Document {
    type NodeId = NodeId;

    fn kind(&self, node: NodeId) -> NodeKind {
        match self.node(node).map(|n| &n.data) {
            Some(NodeData::Text(_)) => NodeKind::Text,
            Some(NodeData::Element(_)) => NodeKind::Element,
            _ => NodeKind::Other,
        }
    }

    fn text_content(&self, node: NodeId) -> String {
        if let Some(text) = self.text(node) {
            return text.to_string();
        }
        self.descendants(node)
            .filter_map(|id| self.text(id))
            .collect()
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.node(node)?.next
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.parent_of(node)
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag.as_str())
    }

    fn lang(&self, node: NodeId) -> Option<&str> {
        self.element(node)?.lang.as_deref()
    }

    fn computed_style(&self, node: NodeId) -> ComputedStyle {
        match self.node(node).map(|n| &n.data) {
            Some(NodeData::Element(element)) => element.style.clone(),
            Some(NodeData::Root) => ComputedStyle::block(),
            _ => ComputedStyle::default(),
        }
    }

    fn select(&self, query: &str) -> Vec<NodeId> {
        let selector = match Selector::parse(query) {
            Ok(selector) => selector,
            Err(e) => {
                warn!("ignoring invalid selector '{}': {}", query, e);
                return Vec::new();
            }
        };
        self.descendants(self.root())
            .filter(|&id| {
                self.element(id)
                    .is_some_and(|element| selector.matches(element, self.ancestor_elements(id)))
            })
            .collect()
    }

    fn replace_with(&mut self, node: NodeId, output: &StyledOutput) -> Result<(), TreeError> {
        if self.node(node).is_none() {
            return Err(TreeError::UnknownNode(node.to_string()));
        }
        let parent = self
            .parent_of(node)
            .ok_or_else(|| TreeError::Detached(node.to_string()))?;
        let (prev, next) = (self.nodes[node.0].prev, self.nodes[node.0].next);

        let mut first: Option<NodeId> = None;
        let mut last: Option<NodeId> = None;
        for segment in output.segments() {
            let text = NodeData::Text(segment.text().to_string());
            let id = match segment.style() {
                None => self.alloc(text, Some(parent)),
                Some(style) => {
                    let mut span = Element::new("span");
                    span.classes.push(style.class_name().to_string());
                    let span = self.alloc(NodeData::Element(span), Some(parent));
                    let inner = self.alloc(text, Some(span));
                    self.nodes[span.0].first_child = Some(inner);
                    self.nodes[span.0].last_child = Some(inner);
                    span
                }
            };
            match last {
                Some(last) => {
                    self.nodes[last.0].next = Some(id);
                    self.nodes[id.0].prev = Some(last);
                }
                None => first = Some(id),
            }
            last = Some(id);
        }

        match first {
            Some(first) => self.link(parent, prev, first, next),
            None => {
                match prev {
                    Some(prev) => self.nodes[prev.0].next = next,
                    None => self.nodes[parent.0].first_child = next,
                }
                match next {
                    Some(next) => self.nodes[next.0].prev = prev,
                    None => self.nodes[parent.0].last_child = prev,
                }
            }
        }

        let old = &mut self.nodes[node.0];
        old.parent = None;
        old.prev = None;
        old.next = None;
        Ok(())
    }

    fn first_char(&self, node: NodeId) -> Option<char> {
        if self.kind(node) == NodeKind::Other {
            return None;
        }
        if let Some(text) = self.text(node) {
            return text.chars().next();
        }
        self.descendants(node)
            .filter_map(|id| self.text(id))
            .find_map(|text| text.chars().next())
    }

    fn last_char(&self, node: NodeId) -> Option<char> {
        if self.kind(node) == NodeKind::Other {
            return None;
        }
        if let Some(text) = self.text(node) {
            return text.chars().next_back();
        }
        self.descendants_rev(node)
            .filter_map(|id| self.text(id))
            .find_map(|text| text.chars().next_back())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::segment::StyleKind;

    fn sample() -> Document {
        Document::from_json_str(
            r#"[
                {"tag": "div", "id": "main", "children": [
                    {"tag": "p", "class": ["note"], "children": [{"text": "甲<乙>"}]},
                    {"comment": "skip me"},
                    {"tag": "p", "lang": "en", "children": [{"text": "B"}]}
                ]}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_json_input_and_html_output() {
        let doc = sample();
        assert_eq!(
            doc.to_html(),
            "<div id=\"main\"><p class=\"note\">甲&lt;乙&gt;</p><!--skip me--><p lang=\"en\">B</p></div>"
        );
    }

    #[test]
    fn test_single_node_json() {
        let doc = Document::from_json_str(r#"{"text": "孤"}"#).unwrap();
        assert_eq!(doc.to_html(), "孤");
    }

    #[test]
    fn test_default_styles_by_tag() {
        let doc = sample();
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.computed_style(div).display, Display::Block);
        assert_eq!(default_style_for("SPAN").display, Display::Inline);
        assert_eq!(default_style_for("li").display, Display::ListItem);
        assert_eq!(default_style_for("script").display, Display::None);
    }

    #[test]
    fn test_navigation_and_text_content() {
        let doc = sample();
        let div = doc.first_child(doc.root()).unwrap();
        let p = doc.first_child(div).unwrap();
        let comment = doc.next_sibling(p).unwrap();
        assert_eq!(doc.kind(comment), NodeKind::Other);
        assert_eq!(doc.parent(p), Some(div));
        assert_eq!(doc.text_content(div), "甲<乙>B");
        assert_eq!(doc.first_char(div), Some('甲'));
        assert_eq!(doc.last_char(div), Some('B'));
        assert_eq!(doc.first_char(comment), None);
    }

    #[test]
    fn test_select() {
        let doc = sample();
        assert_eq!(doc.select("p").len(), 2);
        assert_eq!(doc.select("p.note").len(), 1);
        assert_eq!(doc.select("div#main").len(), 1);
        assert_eq!(doc.select("#main p").len(), 2);
        assert_eq!(doc.select("*").len(), 3);
        assert_eq!(doc.select("h1, .note").len(), 1);
        assert!(doc.select("p >").is_empty());
    }

    #[test]
    fn test_replace_with_splices_segments() {
        let mut doc = Document::from_spec(&NodeSpec::tag("p", vec![NodeSpec::text("用Rust")]));
        let p = doc.first_child(doc.root()).unwrap();
        let text = doc.first_child(p).unwrap();

        let mut output = StyledOutput::new();
        output.push_marked(StyleKind::ExtraSpaced, "用");
        output.push_plain("Rust");
        doc.replace_with(text, &output).unwrap();

        assert_eq!(
            doc.to_html(),
            "<p><span class=\"extra-spaced\">用</span>Rust</p>"
        );
        assert_eq!(doc.parent(text), None);
        assert_eq!(doc.children(p).count(), 2);

        // The old node is gone from the tree now
        assert_eq!(
            doc.replace_with(text, &output),
            Err(TreeError::Detached(text.to_string()))
        );
        assert_eq!(
            doc.replace_with(doc.root(), &output),
            Err(TreeError::Detached("#0".to_string()))
        );
    }

    #[test]
    fn test_replace_with_relinks_siblings() {
        let mut doc = Document::from_spec(&NodeSpec::tag(
            "p",
            vec![NodeSpec::text("甲"), NodeSpec::text("中A"), NodeSpec::text("乙")],
        ));
        let p = doc.first_child(doc.root()).unwrap();
        let first = doc.first_child(p).unwrap();
        let middle = doc.next_sibling(first).unwrap();
        let last = doc.next_sibling(middle).unwrap();

        let mut output = StyledOutput::new();
        output.push_marked(StyleKind::ExtraSpaced, "中");
        output.push_plain("A");
        doc.replace_with(middle, &output).unwrap();

        let span = doc.next_sibling(first).unwrap();
        assert_eq!(doc.tag_name(span), Some("span"));
        let plain = doc.next_sibling(span).unwrap();
        assert_eq!(doc.text(plain), Some("A"));
        assert_eq!(doc.next_sibling(plain), Some(last));
        assert_eq!(doc.next_sibling(middle), None);
        assert_eq!(doc.children(p).count(), 4);
        assert_eq!(doc.to_html(), "<p>甲<span class=\"extra-spaced\">中</span>A乙</p>");
    }

    #[test]
    fn test_boundary_chars_skip_empty_and_comment_nodes() {
        let doc = Document::from_json_str(
            r#"{"tag": "div", "children": [
                {"tag": "b"},
                {"comment": "x"},
                {"tag": "i", "children": [{"text": "首"}, {"text": "尾"}, {"tag": "b"}]},
                {"text": ""},
                {"comment": "y"}
            ]}"#,
        )
        .unwrap();
        let div = doc.first_child(doc.root()).unwrap();
        assert_eq!(doc.first_char(div), Some('首'));
        assert_eq!(doc.last_char(div), Some('尾'));
        assert_eq!(doc.text_content(div), "首尾");
    }

    #[test]
    fn test_wide_document_navigation() {
        let leaves: Vec<NodeSpec> = (0..20_000).map(|_| NodeSpec::text("字")).collect();
        let doc = Document::from_spec(&NodeSpec::tag("p", leaves));
        let p = doc.first_child(doc.root()).unwrap();
        let count = std::iter::successors(doc.first_child(p), |&n| doc.next_sibling(n)).count();
        assert_eq!(count, 20_000);
        assert_eq!(doc.last_char(p), Some('字'));
    }

    #[test]
    fn test_from_paragraphs() {
        let doc = Document::from_paragraphs("第一行\n\n  \r\n第二行\r\n");
        assert_eq!(doc.to_html(), "<p>第一行</p><p>第二行</p>");
    }

    #[test]
    fn test_node_spec_round_trip_keeps_explicit_styles_only() {
        let doc = Document::from_json_str(
            r#"{"tag": "span", "style": {"display": "inline-block"}, "children": [{"tag": "b"}]}"#,
        )
        .unwrap();
        let json = serde_json::to_string(&doc.to_node_specs()).unwrap();
        assert_eq!(
            json,
            r#"[{"tag":"span","style":{"display":"inline-block","position":"static"},"children":[{"tag":"b"}]}]"#
        );
    }

    #[test]
    fn test_void_elements() {
        let doc = Document::from_spec(&NodeSpec::tag(
            "p",
            vec![NodeSpec::text("a"), NodeSpec::tag("img", vec![]), NodeSpec::text("b")],
        ));
        assert_eq!(doc.to_html(), "<p>a<img>b</p>");
    }
}
