//! Tree snapshots
//!
//! A [`TreeSnapshot`] is an owned, serializable copy of a parse tree with the text of
//! every token resolved. All output formats (JSON, YAML, treeviz) render snapshots
//! instead of walking the arena themselves.

use super::{Node, ParseTree};
use crate::lexkit::encoding::Encoding;
use serde::{Deserialize, Serialize};
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSnapshot {
    /// `production` or `token`
    pub node_type: String,
    /// Production name or token kind.
    pub name: String,
    pub start: usize,
    pub end: usize,
    /// Source text of a token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeSnapshot>,
}

impl TreeSnapshot {
    pub fn is_token(&self) -> bool {
        self.node_type == "token"
    }

    /// Concatenated token text of the subtree.
    pub fn text_content(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self.children.iter().map(TreeSnapshot::text_content).collect(),
        }
    }
}

fn snapshot_node(node: Node<'_>, text: &dyn Fn(Range<usize>) -> String) -> TreeSnapshot {
    let range = node.range();
    TreeSnapshot {
        node_type: if node.is_token() { "token" } else { "production" }.to_string(),
        name: node.name().to_string(),
        start: range.start,
        end: range.end,
        text: node.is_token().then(|| text(range.clone())),
        children: node.children().map(|child| snapshot_node(child, text)).collect(),
    }
}

impl ParseTree {
    /// Snapshot of the tree, with token text produced by `text`.
    pub fn snapshot(&self, text: impl Fn(Range<usize>) -> String) -> Option<TreeSnapshot> {
        self.root().map(|root| snapshot_node(root, &text))
    }

    /// Snapshot of a tree built from `units`.
    pub fn snapshot_units<E: Encoding>(&self, units: &[E::Unit]) -> Option<TreeSnapshot> {
        self.snapshot(|range| E::to_display(&units[range]))
    }
}

pub fn to_json(snapshot: &TreeSnapshot) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(snapshot)
}

pub fn to_yaml(snapshot: &TreeSnapshot) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::encoding::Utf8;
    use crate::lexkit::event::TokenKind;
    use crate::lexkit::tree::TreeBuilder;

    fn tree() -> ParseTree {
        let mut builder = TreeBuilder::new("pair", 0);
        builder.token(TokenKind::Identifier, 0, 1);
        builder.token(TokenKind::Literal, 1, 2);
        builder.token(TokenKind::Digits, 2, 4);
        builder.finish()
    }

    #[test]
    fn test_snapshot_text() {
        let snapshot = tree().snapshot_units::<Utf8>(b"a=10").unwrap();
        assert_eq!(snapshot.name, "pair");
        assert!(!snapshot.is_token());
        assert_eq!(snapshot.children[2].text.as_deref(), Some("10"));
        assert_eq!(snapshot.text_content(), "a=10");
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = tree().snapshot_units::<Utf8>(b"a=10").unwrap();
        let json = to_json(&snapshot).unwrap();
        let back: TreeSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_yaml_output() {
        let snapshot = tree().snapshot_units::<Utf8>(b"a=10").unwrap();
        let yaml = to_yaml(&snapshot).unwrap();
        assert!(yaml.contains("name: pair"));
        assert!(yaml.contains("text: '10'"));
    }

    #[test]
    fn test_empty_tree_has_no_snapshot() {
        assert!(ParseTree::new().snapshot(|_| String::new()).is_none());
    }
}
