//! Digits and integers

use super::{finish_token, report_token_failure, token_rule, Branch, Rule, Token, TokenFailure};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::error::ErrorKind;
use crate::lexkit::event::TokenKind;
use crate::lexkit::grammar::Context;
use crate::lexkit::input::Reader;
use std::marker::PhantomData;

/// One or more digits of a radix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digits {
    radix: u32,
}

/// Decimal digits.
pub fn digits() -> Digits {
    Digits { radix: 10 }
}

/// Hexadecimal digits, either case.
pub fn hex_digits() -> Digits {
    Digits { radix: 16 }
}

impl Digits {
    pub fn radix(&self) -> u32 {
        self.radix
    }

    fn digit_value<E: Encoding>(&self, unit: E::Unit) -> Option<u32> {
        char::from_u32(E::to_u32(unit))?.to_digit(self.radix)
    }

    fn class_name(&self) -> &'static str {
        if self.radix == 16 {
            "digit.hex"
        } else {
            "digit.decimal"
        }
    }
}

impl<E: Encoding> Token<E> for Digits {
    fn kind(&self) -> TokenKind {
        TokenKind::Digits
    }

    fn try_match(&self, mut reader: Reader<'_, E>) -> Result<usize, TokenFailure> {
        let begin = reader.position();
        while let Some(unit) = reader.peek() {
            if self.digit_value::<E>(unit).is_none() {
                break;
            }
            reader.bump();
        }
        if reader.position() == begin {
            Err(TokenFailure::at(
                begin,
                ErrorKind::ExpectedCharClass {
                    name: self.class_name(),
                },
            ))
        } else {
            Ok(reader.position())
        }
    }
}

token_rule!([] Digits);

/// Integer types `integer` can produce.
pub trait ParseInteger: Copy {
    const ZERO: Self;

    /// `self * radix + digit`, or `None` on overflow.
    fn push_digit(self, radix: u32, digit: u32) -> Option<Self>;
}

macro_rules! parse_integer_impl {
    ($($ty:ty),*) => {$(
        impl ParseInteger for $ty {
            const ZERO: Self = 0;

            fn push_digit(self, radix: u32, digit: u32) -> Option<Self> {
                let radix = <$ty>::try_from(radix).ok()?;
                let digit = <$ty>::try_from(digit).ok()?;
                self.checked_mul(radix)?.checked_add(digit)
            }
        }
    )*};
}

parse_integer_impl!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

/// Parses digits into an integer of type `T`.
#[derive(Debug, Clone, Copy)]
pub struct Integer<T> {
    digits: Digits,
    _type: PhantomData<fn() -> T>,
}

pub fn integer<T: ParseInteger>(digits: Digits) -> Integer<T> {
    Integer {
        digits,
        _type: PhantomData,
    }
}

impl<T: ParseInteger> Integer<T> {
    fn value<E: Encoding>(&self, units: &[E::Unit]) -> Option<T> {
        units.iter().try_fold(T::ZERO, |acc, &unit| {
            let digit = self.digits.digit_value::<E>(unit)?;
            acc.push_digit(self.digits.radix, digit)
        })
    }

    fn commit<E: Encoding>(
        &self,
        end: usize,
        ctx: &mut Context<'_, E>,
        reader: &mut Reader<'_, E>,
    ) -> Option<(T,)> {
        let begin = reader.position();
        let value = self.value::<E>(reader.slice(begin..end));
        match value {
            Some(value) => {
                finish_token(TokenKind::Digits, begin, end, ctx, reader)?;
                Some((value,))
            }
            None => {
                ctx.token(TokenKind::Digits, begin, end);
                reader.set_position(end);
                ctx.error(ErrorKind::IntegerOverflow, begin..end);
                None
            }
        }
    }
}

impl<E: Encoding, V, T: ParseInteger> Rule<E, V> for Integer<T> {
    type Output = (T,);

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<(T,)> {
        match Token::<E>::try_match(&self.digits, *reader) {
            Ok(end) => self.commit(end, ctx, reader),
            Err(failure) => {
                report_token_failure(reader.position(), failure, ctx, reader);
                None
            }
        }
    }
}

impl<E: Encoding, V, T: ParseInteger> Branch<E, V> for Integer<T> {
    type Attempt = usize;

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<usize> {
        Token::<E>::try_match(&self.digits, reader).ok()
    }

    fn finish(&self, end: usize, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<(T,)> {
        self.commit(end, ctx, reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::encoding::{Utf16, Utf8};
    use crate::lexkit::event::Silent;
    use crate::lexkit::grammar::ParseOptions;

    fn run<E: Encoding, T: ParseInteger>(rule: Integer<T>, units: &[E::Unit]) -> (Option<T>, usize) {
        let mut silent = Silent;
        let mut ctx = Context::<E>::new(&mut silent, &(), &ParseOptions::default());
        let mut reader = Reader::<E>::new(units);
        let value = Rule::<E>::parse(&rule, &mut ctx, &(), &mut reader).map(|(v,)| v);
        (value, reader.position())
    }

    #[test]
    fn test_decimal() {
        assert_eq!(run::<Utf8, u32>(integer(digits()), b"1234x"), (Some(1234), 4));
    }

    #[test]
    fn test_hex_in_utf16() {
        let units: Vec<u16> = "fF10".encode_utf16().collect();
        assert_eq!(run::<Utf16, u32>(integer(hex_digits()), &units), (Some(0xFF10), 4));
    }

    #[test]
    fn test_overflow_consumes_the_digits() {
        assert_eq!(run::<Utf8, u8>(integer(digits()), b"256"), (None, 3));
        assert_eq!(run::<Utf8, u8>(integer(digits()), b"255"), (Some(255), 3));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(run::<Utf8, i64>(integer(digits()), b"x"), (None, 0));
    }
}
