//! Parse errors
//!
//! Errors are values reported through the event stream, not Rust errors returned from
//! rules: a rule reports what went wrong and then either fails (which unwinds to the
//! nearest recovery point) or the grammar recovers and carries on. The action collects
//! them into its result.

use super::code_point::CodePointStatus;
use serde::Serialize;
use std::fmt;
use std::ops::Range;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// A literal did not match; `index` units of it did.
    ExpectedLiteral { literal: String, index: usize },
    /// A unit or code point was not in the expected class.
    ExpectedCharClass { name: &'static str },
    /// No alternative of a choice applied.
    ExhaustedChoice,
    /// A symbol table had no entry for the input.
    UnknownSymbol,
    /// `token(rule)` did not match.
    MissingToken,
    /// The input is not well-formed in its encoding.
    InvalidCodePoint { status: CodePointStatus },
    /// An integer does not fit its type.
    IntegerOverflow,
    /// Productions nested deeper than the configured limit.
    RecursionLimit { max_depth: usize },
    /// Reported by a user rule.
    Custom { message: &'static str },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ErrorKind::ExpectedLiteral { literal, .. } => write!(f, "expected '{}'", literal),
            ErrorKind::ExpectedCharClass { name } => write!(f, "expected {}", name),
            ErrorKind::ExhaustedChoice => write!(f, "exhausted choice"),
            ErrorKind::UnknownSymbol => write!(f, "unknown symbol"),
            ErrorKind::MissingToken => write!(f, "missing token"),
            ErrorKind::InvalidCodePoint { status } => write!(f, "invalid code point: {}", status),
            ErrorKind::IntegerOverflow => write!(f, "integer overflow"),
            ErrorKind::RecursionLimit { max_depth } => {
                write!(f, "maximum recursion depth of {} exceeded", max_depth)
            }
            ErrorKind::Custom { message } => write!(f, "{}", message),
        }
    }
}

/// An error together with where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    #[serde(flatten)]
    pub kind: ErrorKind,
    /// Unit range the error refers to; empty for errors at a single position.
    pub range: Range<usize>,
    /// Name of the production that reported it.
    pub production: &'static str,
}

impl ParseError {
    pub fn new(kind: ErrorKind, range: Range<usize>, production: &'static str) -> Self {
        Self {
            kind,
            range,
            production,
        }
    }

    pub fn position(&self) -> usize {
        self.range.start
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}..{}",
            self.production, self.kind, self.range.start, self.range.end
        )
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let error = ParseError::new(
            ErrorKind::ExpectedLiteral {
                literal: "abc".to_string(),
                index: 2,
            },
            0..2,
            "word",
        );
        assert_eq!(error.to_string(), "word: expected 'abc' at 0..2");
        assert_eq!(error.position(), 0);
    }

    #[test]
    fn test_serializes_flat() {
        let error = ParseError::new(ErrorKind::UnknownSymbol, 3..5, "command");
        let json = serde_json::to_value(&error).unwrap();
        assert_eq!(json["kind"], "unknown_symbol");
        assert_eq!(json["production"], "command");
        assert_eq!(json["range"]["start"], 3);
    }
}
