//! Property-based tests for the code-point codec
//!
//! Round trips over every encoding, and the overlong / surrogate classifications of
//! malformed UTF-8 and UTF-16.

use lexkit_parser::lexkit::code_point::{decode_code_point, encode_code_point, recover_code_point};
use lexkit_parser::lexkit::{Ascii, CodePoint, CodePointStatus, Encoding, Reader, Utf16, Utf32, Utf8};
use proptest::prelude::*;

fn scalar_strategy() -> impl Strategy<Value = CodePoint> {
    any::<char>().prop_map(CodePoint::from)
}

fn round_trip<E: Encoding>(cp: CodePoint) -> Result<(), TestCaseError> {
    let mut buffer = [E::unit_from_u8(0); 4];
    let written = encode_code_point::<E>(cp, &mut buffer);
    prop_assert!(written >= 1 && written <= E::MAX_UNITS);

    let result = decode_code_point(Reader::<E>::new(&buffer[..written]));
    prop_assert_eq!(result.status, CodePointStatus::Success);
    prop_assert_eq!(result.code_point, cp);
    prop_assert_eq!(result.end, written);
    Ok(())
}

proptest! {
    #[test]
    fn test_utf8_round_trip(cp in scalar_strategy()) {
        round_trip::<Utf8>(cp)?;
    }

    #[test]
    fn test_utf16_round_trip(cp in scalar_strategy()) {
        round_trip::<Utf16>(cp)?;
    }

    #[test]
    fn test_utf32_round_trip(cp in scalar_strategy()) {
        round_trip::<Utf32>(cp)?;
    }

    #[test]
    fn test_ascii_round_trip(byte in 0u8..0x80) {
        round_trip::<Ascii>(CodePoint::new(u32::from(byte)))?;
    }

    #[test]
    fn test_utf8_matches_std(text in "\\PC{0,20}") {
        let units = text.as_bytes();
        let mut reader = Reader::<Utf8>::new(units);
        let mut decoded = String::new();
        while !reader.is_eof() {
            let result = decode_code_point(reader);
            prop_assert_eq!(result.status, CodePointStatus::Success);
            decoded.push(result.code_point.to_char().unwrap());
            reader.set_position(result.end);
        }
        prop_assert_eq!(decoded, text);
    }

    #[test]
    fn test_overlong_ascii_never_decodes(lead in 0xC0u8..=0xC1, trail in 0x80u8..=0xBF) {
        let result = decode_code_point(Reader::<Utf8>::new(&[lead, trail]));
        prop_assert_eq!(result.status, CodePointStatus::Overlong);
    }

    #[test]
    fn test_overlong_three_units_never_decodes(second in 0x80u8..0xA0, third in 0x80u8..=0xBF) {
        let result = decode_code_point(Reader::<Utf8>::new(&[0xE0, second, third]));
        prop_assert_eq!(result.status, CodePointStatus::Overlong);
    }

    #[test]
    fn test_overlong_four_units_never_decodes(
        second in 0x80u8..0x90,
        third in 0x80u8..=0xBF,
        fourth in 0x80u8..=0xBF,
    ) {
        let result = decode_code_point(Reader::<Utf8>::new(&[0xF0, second, third, fourth]));
        prop_assert_eq!(result.status, CodePointStatus::Overlong);
    }

    #[test]
    fn test_lone_low_surrogate(unit in 0xDC00u16..=0xDFFF) {
        let mut reader = Reader::<Utf16>::new(std::slice::from_ref(&unit));
        let result = decode_code_point(reader);
        prop_assert_eq!(result.status, CodePointStatus::LeadsWithContinuation);
        recover_code_point(&mut reader, &result);
        prop_assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_high_surrogate_without_low(high in 0xD800u16..=0xDBFF, next in 0u16..0xD800) {
        let units = [high, next];
        let result = decode_code_point(Reader::<Utf16>::new(&units));
        prop_assert_eq!(result.status, CodePointStatus::MissingContinuation);
    }

    #[test]
    fn test_decoding_arbitrary_bytes_always_progresses(bytes in proptest::collection::vec(any::<u8>(), 0..32)) {
        let mut reader = Reader::<Utf8>::new(&bytes);
        let mut steps = 0;
        while !reader.is_eof() && steps <= bytes.len() {
            let before = reader.position();
            let result = decode_code_point(reader);
            match result.status {
                CodePointStatus::Success => reader.set_position(result.end),
                CodePointStatus::Eof => break,
                _ => recover_code_point(&mut reader, &result),
            }
            prop_assert!(reader.position() > before);
            steps += 1;
        }
    }
}

#[test]
fn test_overlong_zero_consumes_three_units() {
    let units = [0xE0, 0x80, 0x80];
    let mut reader = Reader::<Utf8>::new(&units);
    let result = decode_code_point(reader);
    assert_eq!(result.status, CodePointStatus::Overlong);
    recover_code_point(&mut reader, &result);
    assert_eq!(reader.position(), 3);
}

#[test]
fn test_f4_upper_bound_is_out_of_range() {
    let result = decode_code_point(Reader::<Utf8>::new(&[0xF4, 0x90, 0x80, 0x80]));
    assert_eq!(result.status, CodePointStatus::OutOfRange);
    assert_eq!(result.end, 4);
}
