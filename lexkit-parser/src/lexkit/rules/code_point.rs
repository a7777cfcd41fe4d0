//! The code point token
//!
//! `code_point()` decodes one code point with the codec of the input's encoding. On
//! malformed input it skips the malformed units (see
//! [`recover_code_point`](crate::lexkit::code_point::recover_code_point)) so that they
//! become an error token, and reports `InvalidCodePoint` with the decoder's status.

use super::char_class::CharClass;
use super::{token_rule, Token, TokenFailure};
use crate::lexkit::code_point::{decode_code_point, recover_code_point, CodePoint, CodePointStatus};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::error::ErrorKind;
use crate::lexkit::event::TokenKind;
use crate::lexkit::input::Reader;

#[derive(Debug, Clone, Copy)]
enum Filter {
    Any,
    Exactly(CodePoint),
    Range(CodePoint, CodePoint),
    Predicate(&'static str, fn(CodePoint) -> bool),
}

/// Matches one well-formed code point, optionally restricted.
#[derive(Debug, Clone, Copy)]
pub struct CodePointToken {
    filter: Filter,
}

/// Any well-formed code point.
pub fn code_point() -> CodePointToken {
    CodePointToken { filter: Filter::Any }
}

impl CodePointToken {
    /// Only code points for which `predicate` holds; `name` is used in errors.
    pub fn if_(self, name: &'static str, predicate: fn(CodePoint) -> bool) -> Self {
        Self {
            filter: Filter::Predicate(name, predicate),
        }
    }

    /// Only code points in `low..=high`.
    pub fn range(self, low: char, high: char) -> Self {
        Self {
            filter: Filter::Range(low.into(), high.into()),
        }
    }

    /// Only `ch`.
    pub fn lit(self, ch: char) -> Self {
        Self {
            filter: Filter::Exactly(ch.into()),
        }
    }

    fn accepts(&self, cp: CodePoint) -> bool {
        match self.filter {
            Filter::Any => true,
            Filter::Exactly(expected) => cp == expected,
            Filter::Range(low, high) => low <= cp && cp <= high,
            Filter::Predicate(_, predicate) => predicate(cp),
        }
    }

    fn filter_name(&self) -> &'static str {
        match self.filter {
            Filter::Any => "code-point",
            Filter::Exactly(_) => "code-point.literal",
            Filter::Range(_, _) => "code-point.range",
            Filter::Predicate(name, _) => name,
        }
    }
}

impl<E: Encoding> CharClass<E> for CodePointToken {
    fn name(&self) -> &'static str {
        self.filter_name()
    }

    fn match_one(&self, reader: Reader<'_, E>) -> Option<usize> {
        let result = decode_code_point(reader);
        (result.status == CodePointStatus::Success && self.accepts(result.code_point))
            .then_some(result.end)
    }
}

impl<E: Encoding> Token<E> for CodePointToken {
    fn kind(&self) -> TokenKind {
        TokenKind::CodePoint
    }

    fn try_match(&self, reader: Reader<'_, E>) -> Result<usize, TokenFailure> {
        let begin = reader.position();
        let result = decode_code_point(reader);
        match result.status {
            CodePointStatus::Success if self.accepts(result.code_point) => Ok(result.end),
            CodePointStatus::Success => Err(TokenFailure {
                end: result.end,
                kind: ErrorKind::ExpectedCharClass {
                    name: self.filter_name(),
                },
                range: begin..result.end,
            }),
            CodePointStatus::Eof => Err(TokenFailure::at(
                begin,
                ErrorKind::ExpectedCharClass {
                    name: E::CODE_POINT_CLASS,
                },
            )),
            status => {
                let mut skipped = reader;
                recover_code_point(&mut skipped, &result);
                Err(TokenFailure {
                    end: skipped.position(),
                    kind: ErrorKind::InvalidCodePoint { status },
                    range: begin..skipped.position(),
                })
            }
        }
    }
}

token_rule!([] CodePointToken);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::encoding::{Utf16, Utf8};

    fn try_utf8(token: CodePointToken, units: &[u8]) -> Result<usize, TokenFailure> {
        Token::<Utf8>::try_match(&token, Reader::<Utf8>::new(units))
    }

    #[test]
    fn test_matches_multi_unit() {
        assert_eq!(try_utf8(code_point(), "ä".as_bytes()), Ok(2));
        assert_eq!(try_utf8(code_point().lit('ä'), "äa".as_bytes()), Ok(2));
    }

    #[test]
    fn test_overlong_is_skipped_as_a_whole() {
        let failure = try_utf8(code_point(), &[0xE0, 0x80, 0x80, b'a']).unwrap_err();
        assert_eq!(failure.end, 3);
        assert_eq!(
            failure.kind,
            ErrorKind::InvalidCodePoint {
                status: CodePointStatus::Overlong
            }
        );
    }

    #[test]
    fn test_leading_continuation_skips_one_unit() {
        let failure = try_utf8(code_point(), &[0x81, 0x81]).unwrap_err();
        assert_eq!(failure.end, 1);
    }

    #[test]
    fn test_eof_consumes_nothing() {
        let failure = Token::<Utf16>::try_match(&code_point(), Reader::<Utf16>::new(&[])).unwrap_err();
        assert_eq!(failure.end, 0);
        assert_eq!(
            failure.kind,
            ErrorKind::ExpectedCharClass {
                name: "UTF-16.code-point"
            }
        );
    }

    #[test]
    fn test_filters() {
        assert_eq!(try_utf8(code_point().range('a', 'f'), b"c"), Ok(1));
        let failure = try_utf8(code_point().range('a', 'f'), b"g").unwrap_err();
        assert_eq!(failure.end, 1);
        let upper = code_point().if_("upper", |cp| cp.to_char().is_some_and(char::is_uppercase));
        assert_eq!(try_utf8(upper, "Ä".as_bytes()), Ok(2));
        assert_eq!(
            try_utf8(upper, b"a").unwrap_err().kind,
            ErrorKind::ExpectedCharClass { name: "upper" }
        );
    }
}
