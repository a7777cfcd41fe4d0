//! Identifiers

use super::char_class::CharClass;
use super::{token_rule, Token, TokenFailure};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::error::ErrorKind;
use crate::lexkit::event::TokenKind;
use crate::lexkit::input::Reader;

/// One leading character followed by any number of trailing characters.
#[derive(Debug, Clone, Copy)]
pub struct Identifier<L, T> {
    leading: L,
    trailing: T,
}

pub fn identifier<L, T>(leading: L, trailing: T) -> Identifier<L, T> {
    Identifier { leading, trailing }
}

impl<L, T> Identifier<L, T> {
    pub fn leading(&self) -> &L {
        &self.leading
    }

    pub fn trailing(&self) -> &T {
        &self.trailing
    }
}

impl<E: Encoding, L: CharClass<E>, T: CharClass<E>> Token<E> for Identifier<L, T> {
    fn kind(&self) -> TokenKind {
        TokenKind::Identifier
    }

    fn try_match(&self, mut reader: Reader<'_, E>) -> Result<usize, TokenFailure> {
        let Some(end) = self.leading.match_one(reader) else {
            return Err(TokenFailure::at(
                reader.position(),
                ErrorKind::ExpectedCharClass {
                    name: self.leading.name(),
                },
            ));
        };
        reader.set_position(end);
        while let Some(end) = self.trailing.match_one(reader) {
            reader.set_position(end);
        }
        Ok(reader.position())
    }
}

token_rule!([L, T] Identifier<L, T>);
