use super::{NodeData, NodeKind, ParseTree};
use crate::lexkit::event::TokenKind;

/// Builds a [`ParseTree`] top-down.
///
/// Every started production is represented by a [`Marker`] that has to be handed back
/// exactly once, to [`finish_production`](Self::finish_production) or
/// [`cancel_production`](Self::cancel_production). Productions nest, so markers are
/// returned in reverse order of creation.
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    current: usize,
}

/// An open production.
#[derive(Debug)]
#[must_use = "a production has to be finished or cancelled"]
pub struct Marker {
    node: usize,
    parent: usize,
}

impl Marker {
    /// Where the production started.
    pub fn begin(&self, builder: &TreeBuilder) -> usize {
        builder.nodes[self.node].range.start
    }
}

impl TreeBuilder {
    pub fn new(root: &'static str, begin: usize) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Production(root),
                range: begin..begin,
                parent: None,
                children: Vec::new(),
            }],
            current: 0,
        }
    }

    fn push(&mut self, kind: NodeKind, range: std::ops::Range<usize>) -> usize {
        let id = self.nodes.len();
        self.nodes.push(NodeData {
            kind,
            range,
            parent: Some(self.current),
            children: Vec::new(),
        });
        self.nodes[self.current].children.push(id);
        id
    }

    pub fn start_production(&mut self, name: &'static str, position: usize) -> Marker {
        let parent = self.current;
        let node = self.push(NodeKind::Production(name), position..position);
        self.current = node;
        Marker { node, parent }
    }

    pub fn token(&mut self, kind: TokenKind, begin: usize, end: usize) {
        self.push(NodeKind::Token(kind), begin..end);
    }

    /// The end of the last node, which is the end of the open production's content.
    fn content_end(&self, node: usize) -> usize {
        let begin = self.nodes[node].range.start;
        self.nodes[node..]
            .last()
            .map_or(begin, |last| last.range.end.max(begin))
    }

    pub fn finish_production(&mut self, marker: Marker) {
        debug_assert_eq!(marker.node, self.current, "productions finished out of order");
        let end = self.content_end(marker.node);
        self.nodes[marker.node].range.end = end;
        self.current = marker.parent;
    }

    /// Discards the production and everything added since it started.
    pub fn cancel_production(&mut self, marker: Marker) {
        debug_assert_eq!(marker.node, self.current, "productions cancelled out of order");
        log::trace!(
            "discarding {} tree nodes of a cancelled production",
            self.nodes.len() - marker.node
        );
        self.nodes.truncate(marker.node);
        self.nodes[marker.parent].children.pop();
        self.current = marker.parent;
    }

    pub fn finish(mut self) -> ParseTree {
        debug_assert_eq!(self.current, 0, "unfinished productions");
        let end = self.content_end(0);
        self.nodes[0].range.end = end;
        ParseTree { nodes: self.nodes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_discards_subtree() {
        let mut builder = TreeBuilder::new("root", 0);
        builder.token(TokenKind::Literal, 0, 1);
        let marker = builder.start_production("child", 1);
        assert_eq!(marker.begin(&builder), 1);
        builder.token(TokenKind::Digits, 1, 3);
        let inner = builder.start_production("inner", 3);
        builder.token(TokenKind::Error, 3, 4);
        builder.cancel_production(inner);
        builder.cancel_production(marker);
        builder.token(TokenKind::Error, 1, 4);
        let tree = builder.finish();

        assert_eq!(tree.len(), 3);
        let root = tree.root().unwrap();
        let kinds: Vec<_> = root.children().map(|c| c.name()).collect();
        assert_eq!(kinds, vec!["literal", "error"]);
        assert_eq!(root.range(), 0..4);
    }

    #[test]
    fn test_empty_production_keeps_position() {
        let mut builder = TreeBuilder::new("root", 5);
        let marker = builder.start_production("empty", 5);
        builder.finish_production(marker);
        let tree = builder.finish();
        assert_eq!(tree.root().unwrap().range(), 5..5);
        assert_eq!(tree.root().unwrap().children().next().unwrap().range(), 5..5);
    }
}
