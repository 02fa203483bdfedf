//! Host content tree capabilities
//!
//! The styling pass never owns the tree it works on. Hosts expose their
//! nodes through [`ContentTree`]: a handful of read accessors, a selector
//! query and one mutation that replaces a node with new content.
//!
//! [`Document`] is an in-memory implementation used by the command-line
//! tool and the tests.

pub mod document;
pub mod policy;
pub mod selector;
pub mod traversal;

use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::segment::StyledOutput;

pub use document::{Document, NodeId, NodeSpec};
pub use policy::{NodeDecision, SkipPolicy};
pub use selector::Selector;
pub use traversal::{BoundaryTraversal, TraversalStats};

/// Kind of a content node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Text,
    Element,
    /// Comments, processing instructions and anything else without content
    Other,
}

/// CSS `display` values the traversal distinguishes
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Display {
    #[default]
    Inline,
    InlineBlock,
    InlineFlex,
    InlineGrid,
    InlineTable,
    Block,
    Flex,
    Grid,
    ListItem,
    Table,
    None,
    #[serde(other)]
    Other,
}

impl Display {
    /// Inline-level boxes keep character context flowing through them
    pub fn is_inline_level(&self) -> bool {
        matches!(
            self,
            Display::Inline
                | Display::InlineBlock
                | Display::InlineFlex
                | Display::InlineGrid
                | Display::InlineTable
        )
    }
}

/// CSS `position` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

/// The computed properties the traversal reads
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedStyle {
    pub display: Display,
    pub position: Position,
    /// Used width in CSS pixels, `None` for `auto`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
}

impl ComputedStyle {
    pub fn block() -> Self {
        Self {
            display: Display::Block,
            ..Self::default()
        }
    }

    pub fn inline() -> Self {
        Self::default()
    }

    /// Absolutely positioned boxes and boxes with a definite width do not
    /// contribute their own boundary character
    pub fn is_ignorable(&self) -> bool {
        self.position == Position::Absolute || self.width.is_some_and(|width| width > 0.0)
    }
}

/// Tree errors raised by hosts
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// The node to replace has no parent
    #[error("node {0} is detached from the tree")]
    Detached(String),

    /// The node handle does not belong to this tree
    #[error("unknown node {0}")]
    UnknownNode(String),
}

/// Read and write access to a host content tree
///
/// Handles are small copyable ids; the tree keeps ownership of the nodes.
pub trait ContentTree {
    type NodeId: Copy + Eq + Hash + fmt::Debug;

    fn kind(&self, node: Self::NodeId) -> NodeKind;

    /// Concatenated text of the node and all of its descendants
    fn text_content(&self, node: Self::NodeId) -> String;

    fn first_child(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    fn next_sibling(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    fn parent(&self, node: Self::NodeId) -> Option<Self::NodeId>;

    /// Tag name of an element, `None` for other kinds
    fn tag_name(&self, node: Self::NodeId) -> Option<&str>;

    /// The element's own `lang` attribute, not the inherited language
    fn lang(&self, node: Self::NodeId) -> Option<&str>;

    /// Computed style of an element; other kinds report the default
    fn computed_style(&self, node: Self::NodeId) -> ComputedStyle;

    /// All nodes matching a selector query, in document order
    fn select(&self, query: &str) -> Vec<Self::NodeId>;

    /// Replace `node` in its parent with the content of `output`
    ///
    /// Plain segments become text nodes, marked segments become inline
    /// containers carrying the segment's class.
    fn replace_with(&mut self, node: Self::NodeId, output: &StyledOutput)
        -> Result<(), TreeError>;

    /// First character of the node's content
    fn first_char(&self, node: Self::NodeId) -> Option<char> {
        match self.kind(node) {
            NodeKind::Text | NodeKind::Element => self.text_content(node).chars().next(),
            NodeKind::Other => None,
        }
    }

    /// Last character of the node's content
    fn last_char(&self, node: Self::NodeId) -> Option<char> {
        match self.kind(node) {
            NodeKind::Text | NodeKind::Element => self.text_content(node).chars().next_back(),
            NodeKind::Other => None,
        }
    }
}
