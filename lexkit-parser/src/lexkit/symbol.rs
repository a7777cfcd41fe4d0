//! Symbol tables
//!
//! A [`SymbolTable`] maps a fixed set of strings to values. Tables are meant to be built
//! once, typically in a `static` [`Lazy`](once_cell::sync::Lazy), and shared by every
//! parse:
//!
//! ```ignore
//! static KEYWORDS: Lazy<SymbolTable<Keyword>> = Lazy::new(|| {
//!     SymbolTable::new()
//!         .map("if", Keyword::If)
//!         .map("ifdef", Keyword::Ifdef)
//! });
//! ```
//!
//! Lookup walks a trie over code units, one unit at a time, and yields the longest key
//! that is fully present in the input. The trie for an encoding is built the first time
//! the table is used with it and never changes afterwards.

use super::code_point::CodePoint;
use super::encoding::{Encoding, EncodingKind};
use super::input::Reader;
use once_cell::sync::OnceCell;
use std::fmt;
use std::ops::Index;

/// Position of a key in its table, in insertion order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyIndex(usize);

impl KeyIndex {
    pub fn get(self) -> usize {
        self.0
    }
}

/// A key was registered twice (or is empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateSymbol {
    pub key: String,
}

impl fmt::Display for DuplicateSymbol {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.key.is_empty() {
            write!(f, "symbol keys must not be empty")
        } else {
            write!(f, "duplicate symbol '{}'", self.key)
        }
    }
}

impl std::error::Error for DuplicateSymbol {}

#[derive(Debug, Default)]
struct TrieNode {
    key: Option<usize>,
    /// Sorted by unit.
    edges: Vec<(u32, usize)>,
}

#[derive(Debug)]
struct Trie {
    nodes: Vec<TrieNode>,
}

impl Trie {
    fn build<E: Encoding>(keys: &[String]) -> Self {
        let mut nodes = vec![TrieNode::default()];
        let mut buffer = [E::unit_from_u8(0); 4];
        'keys: for (index, key) in keys.iter().enumerate() {
            let mut units = Vec::with_capacity(key.len());
            for ch in key.chars() {
                let cp = CodePoint::from(ch);
                if !E::can_encode(cp) {
                    // can never appear in this encoding
                    continue 'keys;
                }
                let count = E::encode(cp, &mut buffer);
                units.extend(buffer[..count].iter().map(|&unit| E::to_u32(unit)));
            }

            let mut node = 0;
            for unit in units {
                node = match nodes[node].edges.binary_search_by_key(&unit, |&(u, _)| u) {
                    Ok(edge) => nodes[node].edges[edge].1,
                    Err(slot) => {
                        let child = nodes.len();
                        nodes.push(TrieNode::default());
                        nodes[node].edges.insert(slot, (unit, child));
                        child
                    }
                };
            }
            nodes[node].key = Some(index);
        }
        Self { nodes }
    }

    fn longest_match<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Option<usize> {
        let mut probe = *reader;
        let mut node = 0;
        let mut best = None;
        while let Some(unit) = probe.peek() {
            let edges = &self.nodes[node].edges;
            match edges.binary_search_by_key(&E::to_u32(unit), |&(u, _)| u) {
                Ok(edge) => {
                    node = edges[edge].1;
                    probe.bump();
                    if let Some(key) = self.nodes[node].key {
                        best = Some((key, probe.position()));
                    }
                }
                Err(_) => break,
            }
        }
        let (key, end) = best?;
        reader.set_position(end);
        Some(key)
    }
}

/// Maps string keys to values, matched by longest prefix.
pub struct SymbolTable<T> {
    keys: Vec<String>,
    values: Vec<T>,
    tries: [OnceCell<Trie>; 4],
}

impl<T> SymbolTable<T> {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
            tries: Default::default(),
        }
    }

    /// Adds an entry.
    ///
    /// # Panics
    ///
    /// Panics on an empty or duplicate key; use [`try_map`](Self::try_map) to handle it.
    pub fn map(self, key: impl Into<String>, value: T) -> Self {
        match self.try_map(key, value) {
            Ok(table) => table,
            Err(error) => panic!("{}", error),
        }
    }

    pub fn try_map(mut self, key: impl Into<String>, value: T) -> Result<Self, DuplicateSymbol> {
        let key = key.into();
        if key.is_empty() || self.keys.contains(&key) {
            return Err(DuplicateSymbol { key });
        }
        self.keys.push(key);
        self.values.push(value);
        for trie in &mut self.tries {
            trie.take();
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn key(&self, index: KeyIndex) -> &str {
        &self.keys[index.0]
    }

    pub fn value(&self, index: KeyIndex) -> &T {
        &self.values[index.0]
    }

    /// Exact lookup by key.
    pub fn get(&self, key: &str) -> Option<&T> {
        let index = self.keys.iter().position(|k| k == key)?;
        Some(&self.values[index])
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.keys.iter().map(String::as_str).zip(self.values.iter())
    }

    /// Matches the longest key at the reader's position and moves the reader after it.
    /// On failure the reader is left untouched.
    pub fn try_parse<E: Encoding>(&self, reader: &mut Reader<'_, E>) -> Option<KeyIndex> {
        self.trie::<E>().longest_match(reader).map(KeyIndex)
    }

    fn trie<E: Encoding>(&self) -> &Trie {
        self.tries[E::KIND.index()].get_or_init(|| {
            log::trace!("building {} symbol trie for {} keys", E::KIND, self.keys.len());
            Trie::build::<E>(&self.keys)
        })
    }

    /// Whether the trie for `kind` has been built.
    pub fn is_compiled(&self, kind: EncodingKind) -> bool {
        self.tries[kind.index()].get().is_some()
    }
}

impl<T> Default for SymbolTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<KeyIndex> for SymbolTable<T> {
    type Output = T;

    fn index(&self, index: KeyIndex) -> &T {
        self.value(index)
    }
}

impl<T: fmt::Debug> fmt::Debug for SymbolTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::encoding::{Utf16, Utf8};
    use crate::lexkit::input::{Buffer, Input};

    fn table() -> SymbolTable<u32> {
        SymbolTable::new().map("if", 1).map("ifdef", 2).map("in", 3)
    }

    #[test]
    fn test_longest_match() {
        let table = table();
        let mut reader = Reader::<Utf8>::new(b"ifdef x");
        let index = table.try_parse(&mut reader).unwrap();
        assert_eq!(table[index], 2);
        assert_eq!(reader.position(), 5);
    }

    #[test]
    fn test_falls_back_to_shorter_key() {
        let table = table();
        let mut reader = Reader::<Utf8>::new(b"ifde");
        let index = table.try_parse(&mut reader).unwrap();
        assert_eq!(table.key(index), "if");
        assert_eq!(reader.position(), 2);
    }

    #[test]
    fn test_no_match_leaves_reader() {
        let table = table();
        let mut reader = Reader::<Utf8>::new(b"i");
        assert!(table.try_parse(&mut reader).is_none());
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_trie_per_encoding() {
        let table = SymbolTable::new().map("größe", 'g');
        assert!(!table.is_compiled(EncodingKind::Utf16));
        let input = Buffer::<Utf16>::from_text("größe");
        let mut reader = input.reader();
        assert_eq!(table.try_parse(&mut reader).map(|i| table[i]), Some('g'));
        assert!(table.is_compiled(EncodingKind::Utf16));
        assert!(!table.is_compiled(EncodingKind::Utf8));
        assert_eq!(reader.position(), 5);
    }

    #[test]
    fn test_duplicate_keys() {
        let result = SymbolTable::new().map("a", 1).try_map("a", 2);
        assert_eq!(result.unwrap_err().to_string(), "duplicate symbol 'a'");
        assert!(SymbolTable::new().try_map("", 0).is_err());
    }

    #[test]
    fn test_iteration_order() {
        let table = table();
        let keys: Vec<&str> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["if", "ifdef", "in"]);
        assert_eq!(table.get("in"), Some(&3));
    }
}
