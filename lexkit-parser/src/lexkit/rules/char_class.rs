//! Character classes

use super::{token_rule, Token, TokenFailure};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::error::ErrorKind;
use crate::lexkit::event::TokenKind;
use crate::lexkit::input::Reader;

/// A set of characters that can be matched one at a time.
pub trait CharClass<E: Encoding> {
    fn name(&self) -> &'static str;

    /// End of the character at the reader's position if it belongs to the class.
    fn match_one(&self, reader: Reader<'_, E>) -> Option<usize>;
}

/// An ASCII character class matching a single unit.
#[derive(Debug, Clone, Copy)]
pub struct AsciiClass {
    name: &'static str,
    predicate: fn(u8) -> bool,
}

impl AsciiClass {
    pub const fn new(name: &'static str, predicate: fn(u8) -> bool) -> Self {
        Self { name, predicate }
    }

    pub fn contains(&self, byte: u8) -> bool {
        byte.is_ascii() && (self.predicate)(byte)
    }
}

impl<E: Encoding> CharClass<E> for AsciiClass {
    fn name(&self) -> &'static str {
        self.name
    }

    fn match_one(&self, reader: Reader<'_, E>) -> Option<usize> {
        let unit = E::to_u32(reader.peek()?);
        let byte = u8::try_from(unit).ok()?;
        self.contains(byte).then(|| reader.position() + 1)
    }
}

impl<E: Encoding> Token<E> for AsciiClass {
    fn kind(&self) -> TokenKind {
        TokenKind::CharClass
    }

    fn try_match(&self, reader: Reader<'_, E>) -> Result<usize, TokenFailure> {
        CharClass::<E>::match_one(self, reader).ok_or_else(|| {
            TokenFailure::at(reader.position(), ErrorKind::ExpectedCharClass { name: self.name })
        })
    }
}

token_rule!([] AsciiClass);

/// The ASCII classes.
pub mod ascii {
    use super::AsciiClass;

    /// `' '`, `\t`, `\n`, `\r`, `\f` and `\v`.
    pub fn space() -> AsciiClass {
        AsciiClass::new("ASCII.space", |b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C))
    }

    /// `' '` and `\t`.
    pub fn blank() -> AsciiClass {
        AsciiClass::new("ASCII.blank", |b| b == b' ' || b == b'\t')
    }

    pub fn alpha() -> AsciiClass {
        AsciiClass::new("ASCII.alpha", |b| b.is_ascii_alphabetic())
    }

    pub fn upper() -> AsciiClass {
        AsciiClass::new("ASCII.upper", |b| b.is_ascii_uppercase())
    }

    pub fn lower() -> AsciiClass {
        AsciiClass::new("ASCII.lower", |b| b.is_ascii_lowercase())
    }

    pub fn digit() -> AsciiClass {
        AsciiClass::new("ASCII.digit", |b| b.is_ascii_digit())
    }

    pub fn alnum() -> AsciiClass {
        AsciiClass::new("ASCII.alpha-digit", |b| b.is_ascii_alphanumeric())
    }

    pub fn alpha_underscore() -> AsciiClass {
        AsciiClass::new("ASCII.alpha-underscore", |b| b.is_ascii_alphabetic() || b == b'_')
    }

    pub fn alnum_underscore() -> AsciiClass {
        AsciiClass::new("ASCII.alpha-digit-underscore", |b| {
            b.is_ascii_alphanumeric() || b == b'_'
        })
    }

    pub fn punct() -> AsciiClass {
        AsciiClass::new("ASCII.punct", |b| b.is_ascii_punctuation())
    }

    /// Printable characters, including space.
    pub fn print() -> AsciiClass {
        AsciiClass::new("ASCII.print", |b| (0x20..0x7F).contains(&b))
    }
}
