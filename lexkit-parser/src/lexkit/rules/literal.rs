//! String literals

use super::{token_rule, Token, TokenFailure};
use crate::lexkit::code_point::CodePoint;
use crate::lexkit::encoding::Encoding;
use crate::lexkit::error::ErrorKind;
use crate::lexkit::event::TokenKind;
use crate::lexkit::input::Reader;

/// Matches a fixed string, compared unit by unit in the input's encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Literal {
    text: &'static str,
}

/// A literal token. It must not be empty.
pub fn lit(text: &'static str) -> Literal {
    debug_assert!(!text.is_empty(), "empty literal");
    Literal { text }
}

impl Literal {
    pub fn text(&self) -> &'static str {
        self.text
    }
}

impl<E: Encoding> Token<E> for Literal {
    fn kind(&self) -> TokenKind {
        TokenKind::Literal
    }

    fn try_match(&self, mut reader: Reader<'_, E>) -> Result<usize, TokenFailure> {
        let begin = reader.position();
        let mut buffer = [E::unit_from_u8(0); 4];
        let mut index = 0;
        for ch in self.text.chars() {
            let cp = CodePoint::from(ch);
            let count = if E::can_encode(cp) {
                E::encode(cp, &mut buffer)
            } else {
                0
            };
            for &unit in &buffer[..count] {
                if reader.peek() != Some(unit) {
                    return Err(self.failure(begin, reader.position(), index));
                }
                reader.bump();
                index += 1;
            }
            if count == 0 {
                return Err(self.failure(begin, reader.position(), index));
            }
        }
        Ok(reader.position())
    }
}

impl Literal {
    fn failure(&self, begin: usize, end: usize, index: usize) -> TokenFailure {
        TokenFailure {
            end,
            kind: ErrorKind::ExpectedLiteral {
                literal: self.text.to_string(),
                index,
            },
            range: begin..end,
        }
    }
}

token_rule!([] Literal);
