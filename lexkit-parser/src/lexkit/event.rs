//! Parse events
//!
//! Rules do not build results themselves. They emit an ordered stream of [`Event`]s to
//! one [`EventHandler`]: production boundaries, tokens and errors. Validation, tree
//! building and tracing are handlers over the same stream.
//!
//! Ordering guarantees:
//!
//!   - a production's start precedes every event of its children, and its finish or
//!     cancel follows them
//!   - tokens arrive in input order and never overlap
//!   - errors arrive at the point of failure

use super::error::ParseError;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    Unknown,
    /// Input consumed by a failed rule.
    Error,
    Whitespace,
    /// Zero-width token marking a position.
    Position,
    Eof,
    Newline,
    Literal,
    Identifier,
    Digits,
    CharClass,
    CodePoint,
    /// A kind named by the grammar.
    Custom(&'static str),
}

impl TokenKind {
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Unknown => "unknown",
            TokenKind::Error => "error",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Position => "position",
            TokenKind::Eof => "eof",
            TokenKind::Newline => "newline",
            TokenKind::Literal => "literal",
            TokenKind::Identifier => "identifier",
            TokenKind::Digits => "digits",
            TokenKind::CharClass => "char-class",
            TokenKind::CodePoint => "code-point",
            TokenKind::Custom(name) => name,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ProductionStart { name: &'static str, position: usize },
    ProductionFinish { name: &'static str, position: usize },
    ProductionCancel { name: &'static str, position: usize },
    Token { kind: TokenKind, range: Range<usize> },
    Error(ParseError),
}

pub trait EventHandler {
    fn on(&mut self, event: Event);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl EventHandler for Silent {
    fn on(&mut self, _event: Event) {}
}

/// Forwards errors only; used while whitespace is skipped so that the skipped range
/// can be reported as a single token.
pub(crate) struct ErrorsOnly<'a> {
    inner: &'a mut dyn EventHandler,
}

impl<'a> ErrorsOnly<'a> {
    pub(crate) fn new(inner: &'a mut dyn EventHandler) -> Self {
        Self { inner }
    }
}

impl EventHandler for ErrorsOnly<'_> {
    fn on(&mut self, event: Event) {
        if let Event::Error(_) = event {
            self.inner.on(event);
        }
    }
}
