//! Lossless parse trees
//!
//! A [`ParseTree`] records every production and every token of a parse. Leaves are
//! tokens (including whitespace and error tokens), inner nodes are productions. Reading
//! the token leaves in order reproduces the consumed input exactly: no unit is dropped
//! and none is covered twice.
//!
//! Nodes live in one arena in document order (a production precedes its descendants),
//! so iterating the tokens is a filter over the arena and discarding a subtree is a
//! truncation. See [`TreeBuilder`] for how trees are built and
//! [`parse_as_tree`](crate::lexkit::parse_as_tree) for the action that builds them.

use super::event::TokenKind;
use std::ops::Range;

mod builder;
mod snapshot;
mod treeviz;

pub use builder::{Marker, TreeBuilder};
pub use snapshot::{to_json, to_yaml, TreeSnapshot};
pub use treeviz::{format_snapshot, to_treeviz, to_treeviz_with, TreevizOptions};

/// Index of a node in its tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeKind {
    Production(&'static str),
    Token(TokenKind),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NodeData {
    kind: NodeKind,
    range: Range<usize>,
    parent: Option<usize>,
    children: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseTree {
    nodes: Vec<NodeData>,
}

impl ParseTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes, productions and tokens.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    pub fn root(&self) -> Option<Node<'_>> {
        (!self.nodes.is_empty()).then(|| self.node(NodeId(0)))
    }

    /// # Panics
    ///
    /// Panics when `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> Node<'_> {
        assert!(id.0 < self.nodes.len(), "node {} outside the tree", id.0);
        Node { tree: self, id: id.0 }
    }

    /// Token leaves in document order.
    pub fn tokens(&self) -> impl Iterator<Item = Node<'_>> {
        (0..self.nodes.len())
            .map(move |id| Node { tree: self, id })
            .filter(|node| node.is_token())
    }

    /// Depth-first walk yielding enter / exit events for productions and leaf events
    /// for tokens.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse {
            tree: self,
            stack: Vec::new(),
            started: false,
        }
    }
}

/// A node borrowed from its tree.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t ParseTree,
    id: usize,
}

impl<'t> Node<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id]
    }

    pub fn id(&self) -> NodeId {
        NodeId(self.id)
    }

    /// The production name, or the token kind's name.
    pub fn name(&self) -> &'static str {
        match self.data().kind {
            NodeKind::Production(name) => name,
            NodeKind::Token(kind) => kind.name(),
        }
    }

    pub fn token_kind(&self) -> Option<TokenKind> {
        match self.data().kind {
            NodeKind::Production(_) => None,
            NodeKind::Token(kind) => Some(kind),
        }
    }

    pub fn is_token(&self) -> bool {
        matches!(self.data().kind, NodeKind::Token(_))
    }

    /// Units covered by the node.
    pub fn range(&self) -> Range<usize> {
        self.data().range.clone()
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        let tree = self.tree;
        self.data().parent.map(|id| Node { tree, id })
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'t>> + 't {
        let tree = self.tree;
        self.data().children.iter().map(move |&id| Node { tree, id })
    }

    pub fn child_count(&self) -> usize {
        self.data().children.len()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let range = self.range();
        write!(f, "{} {}..{}", self.name(), range.start, range.end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraverseEvent<'t> {
    Enter(Node<'t>),
    Exit(Node<'t>),
    Leaf(Node<'t>),
}

pub struct Traverse<'t> {
    tree: &'t ParseTree,
    /// Open productions with the index of their next child.
    stack: Vec<(usize, usize)>,
    started: bool,
}

impl<'t> Traverse<'t> {
    fn visit(&mut self, id: usize) -> TraverseEvent<'t> {
        let node = Node { tree: self.tree, id };
        if node.is_token() {
            TraverseEvent::Leaf(node)
        } else {
            self.stack.push((id, 0));
            TraverseEvent::Enter(node)
        }
    }
}

impl<'t> Iterator for Traverse<'t> {
    type Item = TraverseEvent<'t>;

    fn next(&mut self) -> Option<TraverseEvent<'t>> {
        if !self.started {
            self.started = true;
            if self.tree.is_empty() {
                return None;
            }
            return Some(self.visit(0));
        }
        let (id, next) = self.stack.last_mut()?;
        let id = *id;
        match self.tree.nodes[id].children.get(*next).copied() {
            Some(child) => {
                *next += 1;
                Some(self.visit(child))
            }
            None => {
                self.stack.pop();
                Some(TraverseEvent::Exit(Node { tree: self.tree, id }))
            }
        }
    }
}
