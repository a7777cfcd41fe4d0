//! Inputs and readers
//!
//! A [`Reader`] is a cursor over an immutable slice of code units. It is `Copy`:
//! lookahead works on a copy, and rewinding is `set_position` with a position taken
//! earlier. Positions are absolute indices into the slice the input was created from,
//! so positions recorded through a [partial reader](Reader::partial) stay valid for the
//! reader it was cut from.

use super::encoding::{Encoding, Utf8};
use std::marker::PhantomData;
use std::ops::Range;

/// Cursor over the code units of an input.
#[derive(Debug, Clone, Copy)]
pub struct Reader<'a, E: Encoding> {
    units: &'a [E::Unit],
    position: usize,
    end: usize,
    _encoding: PhantomData<E>,
}

impl<'a, E: Encoding> Reader<'a, E> {
    pub fn new(units: &'a [E::Unit]) -> Self {
        Self {
            units,
            position: 0,
            end: units.len(),
            _encoding: PhantomData,
        }
    }

    /// The unit at the cursor, `None` at the end of the input.
    #[inline]
    pub fn peek(&self) -> Option<E::Unit> {
        if self.position < self.end {
            Some(self.units[self.position])
        } else {
            None
        }
    }

    /// The unit `offset` units after the cursor.
    #[inline]
    pub fn peek_at(&self, offset: usize) -> Option<E::Unit> {
        let index = self.position + offset;
        if index < self.end {
            Some(self.units[index])
        } else {
            None
        }
    }

    /// Advances past the current unit.
    ///
    /// # Panics
    ///
    /// Panics when the reader is already at the end.
    #[inline]
    pub fn bump(&mut self) {
        assert!(self.position < self.end, "bump past the end of the input");
        self.position += 1;
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to a position obtained from this reader (or a copy of it).
    ///
    /// # Panics
    ///
    /// Panics when `position` lies after the end of the reader.
    #[inline]
    pub fn set_position(&mut self, position: usize) {
        assert!(position <= self.end, "position {} past the end {}", position, self.end);
        self.position = position;
    }

    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.position >= self.end
    }

    /// Units from the cursor to the end.
    pub fn remaining(&self) -> &'a [E::Unit] {
        &self.units[self.position..self.end]
    }

    /// Units of an absolute range.
    pub fn slice(&self, range: Range<usize>) -> &'a [E::Unit] {
        &self.units[range]
    }

    /// A reader over `[position, end)` of this one.
    ///
    /// # Panics
    ///
    /// Panics when `end` lies outside `[position, self.end]`.
    pub fn partial(&self, end: usize) -> Self {
        assert!(
            self.position <= end && end <= self.end,
            "partial reader end {} outside {}..{}",
            end,
            self.position,
            self.end
        );
        Self { end, ..*self }
    }
}

/// Something a reader can be created from.
pub trait Input {
    type Encoding: Encoding;

    fn reader(&self) -> Reader<'_, Self::Encoding>;
}

/// Borrowed units.
#[derive(Debug, Clone, Copy)]
pub struct RangeInput<'a, E: Encoding> {
    units: &'a [E::Unit],
}

impl<'a, E: Encoding> RangeInput<'a, E> {
    pub fn new(units: &'a [E::Unit]) -> Self {
        Self { units }
    }

    pub fn units(&self) -> &'a [E::Unit] {
        self.units
    }
}

impl<'a> RangeInput<'a, Utf8> {
    /// The bytes of a string as UTF-8 input.
    pub fn from_text(text: &'a str) -> Self {
        Self::new(text.as_bytes())
    }
}

impl<E: Encoding> Input for RangeInput<'_, E> {
    type Encoding = E;

    fn reader(&self) -> Reader<'_, E> {
        Reader::new(self.units)
    }
}

/// Owned units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer<E: Encoding> {
    units: Vec<E::Unit>,
}

impl<E: Encoding> Buffer<E> {
    pub fn new(units: Vec<E::Unit>) -> Self {
        Self { units }
    }

    /// Encodes a string. Characters the encoding cannot represent are dropped.
    pub fn from_text(text: &str) -> Self {
        Self::new(E::encode_str(text))
    }

    pub fn units(&self) -> &[E::Unit] {
        &self.units
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

impl<E: Encoding> Input for Buffer<E> {
    type Encoding = E;

    fn reader(&self) -> Reader<'_, E> {
        Reader::new(&self.units)
    }
}

/// Shorthand for UTF-8 input over a string.
pub fn string_input(text: &str) -> RangeInput<'_, Utf8> {
    RangeInput::from_text(text)
}

/// A range of the input, as produced by `capture`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Lexeme {
    begin: usize,
    end: usize,
}

impl Lexeme {
    pub fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end);
        Self { begin, end }
    }

    pub fn begin(&self) -> usize {
        self.begin
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.begin..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// The units of this lexeme in `units` (the slice the input was created from).
    pub fn units<'a, T>(&self, units: &'a [T]) -> &'a [T] {
        &units[self.range()]
    }

    /// The text of this lexeme in a UTF-8 source.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.range()]
    }
}
