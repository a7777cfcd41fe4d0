//! Code points and the Unicode codec
//!
//! Decoding is a small state machine per encoding. It never moves the caller's reader:
//! [`decode_code_point`] takes the reader by value and reports, next to the status, the
//! position where the attempt stopped. Callers that want to skip a malformed sequence
//! pass that result to [`recover_code_point`].
//!
//! Malformed UTF-8 is classified precisely:
//!
//!   - a continuation byte where a sequence should start: `LeadsWithContinuation`
//!   - a sequence cut short: `MissingContinuation`, ending after the units read so far
//!   - encoded UTF-16 surrogates: `Surrogate`
//!   - a longer sequence than needed (`C0`/`C1`, `E0 < A0`, `F0 < 90`): `Overlong`
//!   - a scalar above `U+10FFFF`: `OutOfRange`
//!
//! End of input, and bytes `F8` to `FF` (which never start a sequence), report `Eof`.

use super::encoding::{Ascii, Encoding, Utf16, Utf32, Utf8};
use super::input::Reader;
use serde::Serialize;
use std::fmt;

/// A Unicode code point, possibly invalid (surrogates and values above `U+10FFFF` are
/// representable so that decoders can report them).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct CodePoint(u32);

impl CodePoint {
    pub const MAX: u32 = 0x10_FFFF;

    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u32 {
        self.0
    }

    pub const fn is_ascii(self) -> bool {
        self.0 <= 0x7F
    }

    pub const fn is_bmp(self) -> bool {
        self.0 <= 0xFFFF
    }

    pub const fn is_surrogate(self) -> bool {
        self.0 >= 0xD800 && self.0 <= 0xDFFF
    }

    /// A Unicode scalar value: in range and not a surrogate.
    pub const fn is_valid(self) -> bool {
        self.0 <= Self::MAX && !self.is_surrogate()
    }

    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.0)
    }
}

impl From<char> for CodePoint {
    fn from(ch: char) -> Self {
        Self(u32::from(ch))
    }
}

impl fmt::Display for CodePoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "U+{:04X}", self.0)
    }
}

/// Outcome of one decoding attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CodePointStatus {
    Success,
    Eof,
    LeadsWithContinuation,
    MissingContinuation,
    Surrogate,
    Overlong,
    OutOfRange,
}

impl CodePointStatus {
    pub fn is_error(self) -> bool {
        self != Self::Success
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Eof => "end of input",
            Self::LeadsWithContinuation => "leads with continuation unit",
            Self::MissingContinuation => "missing continuation unit",
            Self::Surrogate => "surrogate",
            Self::Overlong => "overlong sequence",
            Self::OutOfRange => "out of range",
        }
    }
}

impl fmt::Display for CodePointStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeResult {
    pub code_point: CodePoint,
    pub status: CodePointStatus,
    /// Where the attempt stopped; for `Success` the end of the code point.
    pub end: usize,
}

impl DecodeResult {
    fn success(value: u32, end: usize) -> Self {
        Self {
            code_point: CodePoint(value),
            status: CodePointStatus::Success,
            end,
        }
    }

    fn error(status: CodePointStatus, end: usize) -> Self {
        Self {
            code_point: CodePoint(0),
            status,
            end,
        }
    }

    fn with_value(status: CodePointStatus, value: u32, end: usize) -> Self {
        Self {
            code_point: CodePoint(value),
            status,
            end,
        }
    }
}

/// Encodes `cp` into `buffer`, returning the number of units written.
///
/// # Panics
///
/// Panics if the encoding cannot represent `cp` or the buffer is too small.
pub fn encode_code_point<E: Encoding>(cp: CodePoint, buffer: &mut [E::Unit]) -> usize {
    E::encode(cp, buffer)
}

/// Decodes the code point at the reader's position.
pub fn decode_code_point<E: Encoding>(reader: Reader<'_, E>) -> DecodeResult {
    E::decode(reader)
}

/// Skips the malformed units described by `result`.
///
/// `Eof` consumes nothing, `LeadsWithContinuation` exactly one unit, and every other
/// error everything up to `result.end`.
///
/// # Panics
///
/// Panics when called with a successful result.
pub fn recover_code_point<E: Encoding>(reader: &mut Reader<'_, E>, result: &DecodeResult) {
    match result.status {
        CodePointStatus::Success => panic!("recover_code_point called on a decoded code point"),
        CodePointStatus::Eof => {}
        CodePointStatus::LeadsWithContinuation => {
            debug_assert_eq!(reader.position(), result.end);
            reader.bump();
        }
        CodePointStatus::MissingContinuation
        | CodePointStatus::Surrogate
        | CodePointStatus::Overlong
        | CodePointStatus::OutOfRange => reader.set_position(result.end),
    }
}

pub(crate) fn encode_ascii(cp: CodePoint, buffer: &mut [u8]) -> usize {
    assert!(cp.is_ascii(), "{} is not ASCII", cp);
    buffer[0] = cp.0 as u8;
    1
}

pub(crate) fn encode_utf8(cp: CodePoint, buffer: &mut [u8]) -> usize {
    assert!(cp.is_valid(), "{} is not a scalar value", cp);
    let value = cp.0;
    if value <= 0x7F {
        buffer[0] = value as u8;
        1
    } else if value <= 0x07FF {
        buffer[0] = 0xC0 | (value >> 6) as u8;
        buffer[1] = 0x80 | (value & 0x3F) as u8;
        2
    } else if value <= 0xFFFF {
        buffer[0] = 0xE0 | (value >> 12) as u8;
        buffer[1] = 0x80 | ((value >> 6) & 0x3F) as u8;
        buffer[2] = 0x80 | (value & 0x3F) as u8;
        3
    } else {
        buffer[0] = 0xF0 | (value >> 18) as u8;
        buffer[1] = 0x80 | ((value >> 12) & 0x3F) as u8;
        buffer[2] = 0x80 | ((value >> 6) & 0x3F) as u8;
        buffer[3] = 0x80 | (value & 0x3F) as u8;
        4
    }
}

pub(crate) fn encode_utf16(cp: CodePoint, buffer: &mut [u16]) -> usize {
    assert!(cp.is_valid(), "{} is not a scalar value", cp);
    if cp.is_bmp() {
        buffer[0] = cp.0 as u16;
        1
    } else {
        let offset = cp.0 - 0x1_0000;
        buffer[0] = 0xD800 | (offset >> 10) as u16;
        buffer[1] = 0xDC00 | (offset & 0x3FF) as u16;
        2
    }
}

pub(crate) fn encode_utf32(cp: CodePoint, buffer: &mut [u32]) -> usize {
    assert!(cp.is_valid(), "{} is not a scalar value", cp);
    buffer[0] = cp.0;
    1
}

pub(crate) fn decode_ascii(mut reader: Reader<'_, Ascii>) -> DecodeResult {
    let Some(unit) = reader.peek() else {
        return DecodeResult::error(CodePointStatus::Eof, reader.position());
    };
    reader.bump();
    if unit.is_ascii() {
        DecodeResult::success(u32::from(unit), reader.position())
    } else {
        DecodeResult::with_value(CodePointStatus::OutOfRange, u32::from(unit), reader.position())
    }
}

const CONTINUATION_MASK: u8 = 0b1100_0000;
const CONTINUATION_PATTERN: u8 = 0b1000_0000;

fn is_continuation(byte: u8) -> bool {
    byte & CONTINUATION_MASK == CONTINUATION_PATTERN
}

/// Reads the next continuation byte, returning its payload bits.
fn continuation(reader: &mut Reader<'_, Utf8>) -> Option<u32> {
    let byte = reader.peek().filter(|&b| is_continuation(b))?;
    reader.bump();
    Some(u32::from(byte & 0x3F))
}

pub(crate) fn decode_utf8(mut reader: Reader<'_, Utf8>) -> DecodeResult {
    use CodePointStatus::*;

    let Some(first) = reader.peek() else {
        return DecodeResult::error(Eof, reader.position());
    };

    if first & 0x80 == 0 {
        reader.bump();
        return DecodeResult::success(u32::from(first), reader.position());
    }
    if is_continuation(first) {
        return DecodeResult::error(LeadsWithContinuation, reader.position());
    }

    let (length, lead_bits) = if first & 0b1110_0000 == 0b1100_0000 {
        (2, u32::from(first & 0b0001_1111))
    } else if first & 0b1111_0000 == 0b1110_0000 {
        (3, u32::from(first & 0b0000_1111))
    } else if first & 0b1111_1000 == 0b1111_0000 {
        (4, u32::from(first & 0b0000_0111))
    } else {
        // F8..FF never start a sequence
        return DecodeResult::error(Eof, reader.position());
    };
    reader.bump();

    let second_byte = reader.peek();
    let mut value = lead_bits;
    for _ in 1..length {
        match continuation(&mut reader) {
            Some(bits) => value = (value << 6) | bits,
            None => return DecodeResult::error(MissingContinuation, reader.position()),
        }
    }
    let end = reader.position();
    let second = second_byte.unwrap_or(0);

    match length {
        2 => {
            if first == 0xC0 || first == 0xC1 {
                DecodeResult::with_value(Overlong, value, end)
            } else {
                DecodeResult::success(value, end)
            }
        }
        3 => {
            if CodePoint(value).is_surrogate() {
                DecodeResult::with_value(Surrogate, value, end)
            } else if first == 0xE0 && second < 0xA0 {
                DecodeResult::with_value(Overlong, value, end)
            } else {
                DecodeResult::success(value, end)
            }
        }
        _ => {
            if value > CodePoint::MAX {
                DecodeResult::with_value(OutOfRange, value, end)
            } else if first == 0xF0 && second < 0x90 {
                DecodeResult::with_value(Overlong, value, end)
            } else {
                DecodeResult::success(value, end)
            }
        }
    }
}

pub(crate) fn decode_utf16(mut reader: Reader<'_, Utf16>) -> DecodeResult {
    use CodePointStatus::*;

    let Some(first) = reader.peek() else {
        return DecodeResult::error(Eof, reader.position());
    };
    match first {
        0xD800..=0xDBFF => {
            reader.bump();
            match reader.peek() {
                Some(second @ 0xDC00..=0xDFFF) => {
                    reader.bump();
                    let high = u32::from(first & 0x3FF);
                    let low = u32::from(second & 0x3FF);
                    DecodeResult::success(((high << 10) | low) + 0x1_0000, reader.position())
                }
                _ => DecodeResult::error(MissingContinuation, reader.position()),
            }
        }
        0xDC00..=0xDFFF => DecodeResult::error(LeadsWithContinuation, reader.position()),
        _ => {
            reader.bump();
            DecodeResult::success(u32::from(first), reader.position())
        }
    }
}

pub(crate) fn decode_utf32(mut reader: Reader<'_, Utf32>) -> DecodeResult {
    use CodePointStatus::*;

    let Some(unit) = reader.peek() else {
        return DecodeResult::error(Eof, reader.position());
    };
    reader.bump();
    let cp = CodePoint(unit);
    if unit > CodePoint::MAX {
        DecodeResult::with_value(OutOfRange, unit, reader.position())
    } else if cp.is_surrogate() {
        DecodeResult::with_value(Surrogate, unit, reader.position())
    } else {
        DecodeResult::success(unit, reader.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::input::Reader;
    use rstest::rstest;

    /// Decodes, recovers on error, and reports the status with the units consumed.
    fn decode_and_recover<E: Encoding>(units: &[E::Unit]) -> (CodePointStatus, usize) {
        let mut reader = Reader::<E>::new(units);
        let result = decode_code_point(reader);
        if result.status == CodePointStatus::Success {
            reader.set_position(result.end);
        } else {
            recover_code_point(&mut reader, &result);
        }
        (result.status, reader.position())
    }

    #[rstest]
    #[case(&[], CodePointStatus::Eof, 0)]
    #[case(&[0x81], CodePointStatus::LeadsWithContinuation, 1)]
    #[case(&[0xD0], CodePointStatus::MissingContinuation, 1)]
    #[case(&[0xE8, 0x81], CodePointStatus::MissingContinuation, 2)]
    #[case(&[0xF4, 0x81, 0x81], CodePointStatus::MissingContinuation, 3)]
    #[case(&[0xD0, 0x0F], CodePointStatus::MissingContinuation, 1)]
    #[case(&[0xED, 0xBF, 0xBF], CodePointStatus::Surrogate, 3)]
    #[case(&[0xF7, 0xBF, 0xBF, 0xBF], CodePointStatus::OutOfRange, 4)]
    #[case(&[0xF4, 0x90, 0x80, 0x80], CodePointStatus::OutOfRange, 4)]
    #[case(&[0xC0, 0x84], CodePointStatus::Overlong, 2)]
    #[case(&[0xC1, 0xBF], CodePointStatus::Overlong, 2)]
    #[case(&[0xE0, 0x80, 0x80], CodePointStatus::Overlong, 3)]
    #[case(&[0xF0, 0x80, 0x80, 0x80], CodePointStatus::Overlong, 4)]
    #[case(&[0xFE], CodePointStatus::Eof, 0)]
    #[case(&[0xFF, 0x41], CodePointStatus::Eof, 0)]
    fn test_utf8_errors(#[case] units: &[u8], #[case] status: CodePointStatus, #[case] consumed: usize) {
        assert_eq!(decode_and_recover::<Utf8>(units), (status, consumed));
    }

    #[rstest]
    #[case(&[0x41], 0x41, 1)]
    #[case(&[0xC3, 0xA4], 0xE4, 2)]
    #[case(&[0xE0, 0xA0, 0x80], 0x800, 3)]
    #[case(&[0xEF, 0xBF, 0xBF], 0xFFFF, 3)]
    #[case(&[0xF0, 0x90, 0x80, 0x80], 0x1_0000, 4)]
    #[case(&[0xF4, 0x8F, 0xBF, 0xBF], 0x10_FFFF, 4)]
    fn test_utf8_success(#[case] units: &[u8], #[case] value: u32, #[case] end: usize) {
        let result = decode_code_point(Reader::<Utf8>::new(units));
        assert_eq!(result.status, CodePointStatus::Success);
        assert_eq!(result.code_point.value(), value);
        assert_eq!(result.end, end);
    }

    #[test]
    fn test_utf16_lone_surrogates() {
        assert_eq!(
            decode_and_recover::<Utf16>(&[0xDC44]),
            (CodePointStatus::LeadsWithContinuation, 1)
        );
        assert_eq!(
            decode_and_recover::<Utf16>(&[0xDA44]),
            (CodePointStatus::MissingContinuation, 1)
        );
        assert_eq!(
            decode_and_recover::<Utf16>(&[0xDA44, 0x0041]),
            (CodePointStatus::MissingContinuation, 1)
        );
    }

    #[test]
    fn test_utf16_pair() {
        let result = decode_code_point(Reader::<Utf16>::new(&[0xD83D, 0xDE00]));
        assert_eq!(result.status, CodePointStatus::Success);
        assert_eq!(result.code_point, CodePoint::from('😀'));
        assert_eq!(result.end, 2);
    }

    #[test]
    fn test_utf32_errors() {
        assert_eq!(decode_and_recover::<Utf32>(&[0xD844]), (CodePointStatus::Surrogate, 1));
        assert_eq!(decode_and_recover::<Utf32>(&[0xFF_1234]), (CodePointStatus::OutOfRange, 1));
        assert_eq!(decode_and_recover::<Utf32>(&[]), (CodePointStatus::Eof, 0));
    }

    #[test]
    fn test_ascii_high_bit() {
        assert_eq!(decode_and_recover::<Ascii>(&[0x80]), (CodePointStatus::OutOfRange, 1));
        assert_eq!(decode_and_recover::<Ascii>(&[b'x']), (CodePointStatus::Success, 1));
    }

    #[test]
    #[should_panic]
    fn test_recover_success_panics() {
        let mut reader = Reader::<Utf8>::new(b"a");
        let result = decode_code_point(reader);
        recover_code_point(&mut reader, &result);
    }

    #[test]
    fn test_encode_lengths() {
        let mut buffer = [0u8; 4];
        assert_eq!(encode_code_point::<Utf8>(CodePoint::new(0x7F), &mut buffer), 1);
        assert_eq!(encode_code_point::<Utf8>(CodePoint::new(0x80), &mut buffer), 2);
        assert_eq!(encode_code_point::<Utf8>(CodePoint::new(0x800), &mut buffer), 3);
        assert_eq!(encode_code_point::<Utf8>(CodePoint::new(0x1_0000), &mut buffer), 4);
        assert_eq!(buffer, [0xF0, 0x90, 0x80, 0x80]);

        let mut wide = [0u16; 2];
        assert_eq!(encode_code_point::<Utf16>(CodePoint::new(0x10_FFFF), &mut wide), 2);
        assert_eq!(wide, [0xDBFF, 0xDFFF]);
    }

    #[test]
    #[should_panic]
    fn test_encode_surrogate_panics() {
        let mut buffer = [0u32; 1];
        encode_code_point::<Utf32>(CodePoint::new(0xD800), &mut buffer);
    }

    #[test]
    fn test_code_point_classification() {
        assert!(CodePoint::new(0x41).is_ascii());
        assert!(CodePoint::new(0xFFFF).is_bmp());
        assert!(!CodePoint::new(0x1_0000).is_bmp());
        assert!(CodePoint::new(0xDBFF).is_surrogate());
        assert!(!CodePoint::new(0x11_0000).is_valid());
        assert_eq!(CodePoint::new(0xE4).to_string(), "U+00E4");
    }
}
