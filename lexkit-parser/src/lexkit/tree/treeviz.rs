//! Treeviz rendering
//!
//! One line per node, nesting drawn with box connectors:
//!
//! ```text
//! list 0..7
//! ├─ item 0..3
//! │ ├─ digits "1"
//! │ └─ whitespace " "
//! └─ literal ","
//! ```
//!
//! Productions show their unit range, tokens their (truncated) text.

use super::snapshot::TreeSnapshot;
use super::ParseTree;
use crate::lexkit::encoding::Encoding;

const MAX_TEXT: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreevizOptions {
    /// Include whitespace tokens.
    pub show_whitespace: bool,
}

impl Default for TreevizOptions {
    fn default() -> Self {
        Self { show_whitespace: true }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() > max_chars {
        let mut truncated = s.chars().take(max_chars).collect::<String>();
        truncated.push_str("...");
        truncated
    } else {
        s.to_string()
    }
}

fn label(snapshot: &TreeSnapshot) -> String {
    match &snapshot.text {
        Some(text) => format!("{} {:?}", snapshot.name, truncate(text, MAX_TEXT)),
        None => format!("{} {}..{}", snapshot.name, snapshot.start, snapshot.end),
    }
}

fn visible<'s>(snapshot: &'s TreeSnapshot, options: &TreevizOptions) -> Vec<&'s TreeSnapshot> {
    snapshot
        .children
        .iter()
        .filter(|child| options.show_whitespace || !(child.is_token() && child.name == "whitespace"))
        .collect()
}

fn format_children(snapshot: &TreeSnapshot, prefix: &str, options: &TreevizOptions, output: &mut String) {
    let children = visible(snapshot, options);
    let count = children.len();
    for (index, child) in children.into_iter().enumerate() {
        let is_last = index + 1 == count;
        let connector = if is_last { "└─" } else { "├─" };
        output.push_str(&format!("{}{} {}\n", prefix, connector, label(child)));
        let child_prefix = format!("{}{}", prefix, if is_last { "  " } else { "│ " });
        format_children(child, &child_prefix, options, output);
    }
}

/// Renders a snapshot.
pub fn format_snapshot(snapshot: &TreeSnapshot, options: &TreevizOptions) -> String {
    let mut output = format!("{}\n", label(snapshot));
    format_children(snapshot, "", options, &mut output);
    output
}

/// Renders a tree built from `units`; an empty tree renders as an empty string.
pub fn to_treeviz<E: Encoding>(tree: &ParseTree, units: &[E::Unit]) -> String {
    to_treeviz_with::<E>(tree, units, &TreevizOptions::default())
}

pub fn to_treeviz_with<E: Encoding>(tree: &ParseTree, units: &[E::Unit], options: &TreevizOptions) -> String {
    tree.snapshot_units::<E>(units)
        .map(|snapshot| format_snapshot(&snapshot, options))
        .unwrap_or_default()
}
