//! Input encodings
//!
//! An encoding fixes the code unit type of an input and how code points are laid out in
//! those units. Rules never look at bytes directly: they compare units through
//! [`Encoding::to_u32`] and decode code points through the codec in
//! [`code_point`](super::code_point).
//!
//! Four encodings are supported. The set is closed: symbol tables keep one trie per
//! [`EncodingKind`].

use super::code_point::{self, CodePoint, DecodeResult};
use super::input::Reader;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Identifies one of the supported encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EncodingKind {
    Ascii,
    Utf8,
    Utf16,
    Utf32,
}

impl EncodingKind {
    pub const ALL: [EncodingKind; 4] = [Self::Ascii, Self::Utf8, Self::Utf16, Self::Utf32];

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Ascii => 0,
            Self::Utf8 => 1,
            Self::Utf16 => 2,
            Self::Utf32 => 3,
        }
    }
}

impl fmt::Display for EncodingKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Ascii => "ASCII",
            Self::Utf8 => "UTF-8",
            Self::Utf16 => "UTF-16",
            Self::Utf32 => "UTF-32",
        };
        write!(f, "{}", name)
    }
}

/// A code unit encoding.
pub trait Encoding: Copy + Default + fmt::Debug + Send + Sync + 'static {
    type Unit: Copy + Eq + Ord + Hash + fmt::Debug + Send + Sync + 'static;

    const KIND: EncodingKind;

    /// Upper bound on the units a single code point occupies.
    const MAX_UNITS: usize;

    /// Name used for "expected a code point" errors.
    const CODE_POINT_CLASS: &'static str;

    fn to_u32(unit: Self::Unit) -> u32;

    /// Whether `cp` has a representation in this encoding.
    fn can_encode(cp: CodePoint) -> bool;

    /// Writes `cp` into `buffer` and returns the number of units written.
    ///
    /// # Panics
    ///
    /// Panics if `cp` cannot be encoded or `buffer` is shorter than [`Self::MAX_UNITS`].
    fn encode(cp: CodePoint, buffer: &mut [Self::Unit]) -> usize;

    /// Decodes the code point at the reader's position without moving the reader.
    fn decode(reader: Reader<'_, Self>) -> DecodeResult;

    /// Best-effort text for diagnostics and tree dumps.
    fn to_display(units: &[Self::Unit]) -> String;

    /// Encodes a whole string, skipping characters the encoding cannot represent.
    fn encode_str(text: &str) -> Vec<Self::Unit> {
        let mut units = Vec::with_capacity(text.len());
        let mut buffer = [Self::unit_from_u8(0); 4];
        for ch in text.chars() {
            let cp = CodePoint::from(ch);
            if Self::can_encode(cp) {
                let count = Self::encode(cp, &mut buffer);
                units.extend_from_slice(&buffer[..count]);
            }
        }
        units
    }

    /// The unit holding the given ASCII byte.
    fn unit_from_u8(byte: u8) -> Self::Unit;
}

/// 7-bit ASCII in `u8` units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ascii;

/// UTF-8 in `u8` units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf8;

/// UTF-16 in `u16` units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf16;

/// UTF-32 in `u32` units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Utf32;

fn display_chars(chars: impl Iterator<Item = Option<char>>) -> String {
    chars
        .map(|ch| ch.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

impl Encoding for Ascii {
    type Unit = u8;

    const KIND: EncodingKind = EncodingKind::Ascii;
    const MAX_UNITS: usize = 1;
    const CODE_POINT_CLASS: &'static str = "ASCII.code-point";

    fn to_u32(unit: u8) -> u32 {
        u32::from(unit)
    }

    fn can_encode(cp: CodePoint) -> bool {
        cp.is_ascii()
    }

    fn encode(cp: CodePoint, buffer: &mut [u8]) -> usize {
        code_point::encode_ascii(cp, buffer)
    }

    fn decode(reader: Reader<'_, Self>) -> DecodeResult {
        code_point::decode_ascii(reader)
    }

    fn to_display(units: &[u8]) -> String {
        display_chars(units.iter().map(|&b| b.is_ascii().then_some(char::from(b))))
    }

    fn unit_from_u8(byte: u8) -> u8 {
        byte
    }
}

impl Encoding for Utf8 {
    type Unit = u8;

    const KIND: EncodingKind = EncodingKind::Utf8;
    const MAX_UNITS: usize = 4;
    const CODE_POINT_CLASS: &'static str = "UTF-8.code-point";

    fn to_u32(unit: u8) -> u32 {
        u32::from(unit)
    }

    fn can_encode(cp: CodePoint) -> bool {
        cp.is_valid()
    }

    fn encode(cp: CodePoint, buffer: &mut [u8]) -> usize {
        code_point::encode_utf8(cp, buffer)
    }

    fn decode(reader: Reader<'_, Self>) -> DecodeResult {
        code_point::decode_utf8(reader)
    }

    fn to_display(units: &[u8]) -> String {
        String::from_utf8_lossy(units).into_owned()
    }

    fn unit_from_u8(byte: u8) -> u8 {
        byte
    }
}

impl Encoding for Utf16 {
    type Unit = u16;

    const KIND: EncodingKind = EncodingKind::Utf16;
    const MAX_UNITS: usize = 2;
    const CODE_POINT_CLASS: &'static str = "UTF-16.code-point";

    fn to_u32(unit: u16) -> u32 {
        u32::from(unit)
    }

    fn can_encode(cp: CodePoint) -> bool {
        cp.is_valid()
    }

    fn encode(cp: CodePoint, buffer: &mut [u16]) -> usize {
        code_point::encode_utf16(cp, buffer)
    }

    fn decode(reader: Reader<'_, Self>) -> DecodeResult {
        code_point::decode_utf16(reader)
    }

    fn to_display(units: &[u16]) -> String {
        display_chars(char::decode_utf16(units.iter().copied()).map(Result::ok))
    }

    fn unit_from_u8(byte: u8) -> u16 {
        u16::from(byte)
    }
}

impl Encoding for Utf32 {
    type Unit = u32;

    const KIND: EncodingKind = EncodingKind::Utf32;
    const MAX_UNITS: usize = 1;
    const CODE_POINT_CLASS: &'static str = "UTF-32.code-point";

    fn to_u32(unit: u32) -> u32 {
        unit
    }

    fn can_encode(cp: CodePoint) -> bool {
        cp.is_valid()
    }

    fn encode(cp: CodePoint, buffer: &mut [u32]) -> usize {
        code_point::encode_utf32(cp, buffer)
    }

    fn decode(reader: Reader<'_, Self>) -> DecodeResult {
        code_point::decode_utf32(reader)
    }

    fn to_display(units: &[u32]) -> String {
        display_chars(units.iter().map(|&u| char::from_u32(u)))
    }

    fn unit_from_u8(byte: u8) -> u32 {
        u32::from(byte)
    }
}
