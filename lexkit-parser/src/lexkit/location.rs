//! Line and column lookup
//!
//! Positions reported by the parser are unit indices. [`LineIndex`] records where every
//! line starts (one scan, then a binary search per lookup) and turns a position into
//! a 1-based line and column. A line ends after `\n`; `\r\n` is a single line break and
//! a lone `\r` is an ordinary unit.

use super::code_point::{decode_code_point, recover_code_point, CodePointStatus};
use super::encoding::Encoding;
use super::input::Reader;
use serde::Serialize;
use std::fmt;

/// What a column counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Counting {
    #[default]
    CodeUnits,
    /// Code points; a malformed sequence counts once per recovered chunk.
    CodePoints,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputLocation {
    /// 1-based
    pub line_nr: usize,
    /// 1-based
    pub column_nr: usize,
    /// Unit index where the line starts.
    pub line_begin: usize,
    pub position: usize,
}

impl fmt::Display for InputLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line_nr, self.column_nr)
    }
}

/// Line starts of one input.
#[derive(Debug, Clone)]
pub struct LineIndex<'a, E: Encoding> {
    units: &'a [E::Unit],
    line_starts: Vec<usize>,
}

impl<'a, E: Encoding> LineIndex<'a, E> {
    pub fn new(units: &'a [E::Unit]) -> Self {
        let newline = E::unit_from_u8(b'\n');
        let mut line_starts = vec![0];
        line_starts.extend(
            units
                .iter()
                .enumerate()
                .filter(|&(_, &unit)| unit == newline)
                .map(|(index, _)| index + 1),
        );
        Self { units, line_starts }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Location of `position`, clamped to the end of the input.
    pub fn location(&self, position: usize, counting: Counting) -> InputLocation {
        let position = position.min(self.units.len());
        let line = self
            .line_starts
            .binary_search(&position)
            .unwrap_or_else(|index| index - 1);
        let line_begin = self.line_starts[line];
        InputLocation {
            line_nr: line + 1,
            column_nr: self.columns(line_begin, position, counting) + 1,
            line_begin,
            position,
        }
    }

    /// Columns between the start of a line and `position`.
    fn columns(&self, line_begin: usize, position: usize, counting: Counting) -> usize {
        // The `\r` of a `\r\n` belongs to the line break, not the line.
        let position = if position > line_begin
            && self.units.get(position) == Some(&E::unit_from_u8(b'\n'))
            && self.units[position - 1] == E::unit_from_u8(b'\r')
        {
            position - 1
        } else {
            position
        };
        match counting {
            Counting::CodeUnits => position - line_begin,
            Counting::CodePoints => count_code_points(Reader::<E>::new(self.units).partial(position), line_begin),
        }
    }
}

fn count_code_points<E: Encoding>(mut reader: Reader<'_, E>, begin: usize) -> usize {
    reader.set_position(begin);
    let mut count = 0;
    while !reader.is_eof() {
        let before = reader.position();
        let result = decode_code_point(reader);
        if result.status == CodePointStatus::Success {
            reader.set_position(result.end);
        } else {
            recover_code_point(&mut reader, &result);
        }
        if reader.position() == before {
            reader.bump();
        }
        count += 1;
    }
    count
}

/// Location of `position` in `units`.
pub fn input_location<E: Encoding>(units: &[E::Unit], position: usize, counting: Counting) -> InputLocation {
    LineIndex::<E>::new(units).location(position, counting)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::encoding::{Utf16, Utf8};

    fn at(text: &str, position: usize) -> (usize, usize) {
        let location = input_location::<Utf8>(text.as_bytes(), position, Counting::CodeUnits);
        (location.line_nr, location.column_nr)
    }

    #[test]
    fn test_lines_and_columns() {
        let text = "ab\ncd\n\nef";
        assert_eq!(at(text, 0), (1, 1));
        assert_eq!(at(text, 2), (1, 3));
        assert_eq!(at(text, 3), (2, 1));
        assert_eq!(at(text, 4), (2, 2));
        assert_eq!(at(text, 6), (3, 1));
        assert_eq!(at(text, 7), (4, 1));
        assert_eq!(at(text, 9), (4, 3));
    }

    #[test]
    fn test_crlf_is_one_break() {
        let text = "ab\r\ncd";
        assert_eq!(at(text, 2), (1, 3));
        assert_eq!(at(text, 3), (1, 3));
        assert_eq!(at(text, 4), (2, 1));
        assert_eq!(at("a\rb", 2), (1, 3));
    }

    #[test]
    fn test_position_is_clamped() {
        let location = input_location::<Utf8>(b"ab", 10, Counting::CodeUnits);
        assert_eq!(location.position, 2);
        assert_eq!(location.to_string(), "1:3");
    }

    #[test]
    fn test_code_point_columns() {
        let text = "é1\nx€y";
        let units = text.as_bytes();
        let index = LineIndex::<Utf8>::new(units);
        assert_eq!(index.line_count(), 2);
        assert_eq!(index.location(2, Counting::CodePoints).column_nr, 2);
        assert_eq!(index.location(2, Counting::CodeUnits).column_nr, 3);
        let y = text.find('y').unwrap();
        let location = index.location(y, Counting::CodePoints);
        assert_eq!((location.line_nr, location.column_nr, location.line_begin), (2, 3, 4));
    }

    #[test]
    fn test_invalid_units_count_once_per_chunk() {
        let units = [b'a', 0xE0, 0x80, 0x80, b'b'];
        let location = input_location::<Utf8>(&units, 4, Counting::CodePoints);
        assert_eq!(location.column_nr, 3);
    }

    #[test]
    fn test_utf16_surrogate_pair_is_one_column() {
        let units = Utf16::encode_str("😀x");
        assert_eq!(units.len(), 3);
        let location = input_location::<Utf16>(&units, 2, Counting::CodePoints);
        assert_eq!(location.column_nr, 2);
    }
}
