//! Rules and combinators
//!
//! Every grammar building block implements [`Rule`]: given the context, the value of the
//! enclosing production and a reader, it either produces an output tuple or fails.
//! Failing means the failure has already been reported through the context; callers
//! only propagate it (or stop it, see [`try_`]).
//!
//! Rules that can decide cheaply whether they apply also implement [`Branch`]. A branch
//! attempt works on a copy of the reader and emits nothing; only `finish` commits. Choices,
//! repetition and whitespace skipping are driven by branch attempts.
//!
//! [`Token`]s are the leaves: they match a run of units in one go and show up as a
//! single token event. After every token the context skips whitespace.
//!
//! Outputs are argument tuples. Sequencing concatenates them, so `seq(lit("("),
//! integer::<u32>(digits()))` outputs `(u32,)`.
//!
//! The combinators:
//!
//!   - [`lit`], [`ascii`] classes, [`identifier`], [`digits`], [`code_point`], [`eof`],
//!     [`newline`]: tokens
//!   - [`seq`], [`choice`], [`branch`], [`opt`]: structure
//!   - [`list`], [`times`]: repetition into the production's sink
//!   - [`p`], [`recurse`]: reference to a production
//!   - [`integer`], [`capture`], [`position`], [`symbol`]: values
//!   - [`token`], [`ws`], [`whitespace`], [`no_whitespace`], [`try_`]: control

use super::encoding::Encoding;
use super::error::ErrorKind;
use super::event::TokenKind;
use super::grammar::Context;
use super::input::Reader;
use std::ops::Range;

pub mod branch;
pub mod char_class;
pub mod choice;
pub mod code_point;
pub mod digits;
pub mod identifier;
pub mod literal;
pub mod production;
pub mod recover;
pub mod repeat;
pub mod sequence;
pub mod symbol;
pub mod token;
pub mod whitespace;

pub use branch::{branch, opt, Branched, Opt};
pub use char_class::{ascii, AsciiClass, CharClass};
pub use choice::{choice, Choice, ChoiceAttempt};
pub use code_point::{code_point, CodePointToken};
pub use digits::{digits, hex_digits, integer, Digits, Integer, ParseInteger};
pub use identifier::{identifier, Identifier};
pub use literal::{lit, Literal};
pub use production::{p, recurse, ProductionRef, Recurse, Recursive};
pub use recover::{try_, Try};
pub use repeat::{list, times, List, OptList, SepList, Times, TrailingSepList};
pub use sequence::{seq, Seq};
pub use symbol::{symbol, Symbol, SymbolIdentifier, SymbolOf};
pub use token::{capture, eof, newline, position, token, Capture, Eof, Newline, Position, TokenOf};
pub use whitespace::{no_whitespace, whitespace, ws, WithoutWhitespace, WhitespaceRule, Ws};

pub trait Rule<E: Encoding, V = ()> {
    type Output;

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output>;
}

pub trait Branch<E: Encoding, V = ()>: Rule<E, V> {
    /// What a successful attempt learned, handed back to `finish`.
    type Attempt;

    /// Checks whether the branch applies, without committing.
    fn try_branch(&self, reader: Reader<'_, E>) -> Option<Self::Attempt>;

    /// Commits to a successful attempt.
    fn finish(
        &self,
        attempt: Self::Attempt,
        ctx: &mut Context<'_, E>,
        value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<Self::Output>;

    /// Drops a successful attempt that will not be finished.
    fn cancel(&self, _attempt: Self::Attempt) {}
}

/// Why a token did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFailure {
    /// How far the token read before failing; the units up to here become an error token.
    pub end: usize,
    pub kind: ErrorKind,
    pub range: Range<usize>,
}

impl TokenFailure {
    /// A failure at `position` that consumed nothing.
    pub fn at(position: usize, kind: ErrorKind) -> Self {
        Self {
            end: position,
            kind,
            range: position..position,
        }
    }
}

pub trait Token<E: Encoding> {
    fn kind(&self) -> TokenKind;

    /// Matches at the reader's position, returning the end of the token.
    fn try_match(&self, reader: Reader<'_, E>) -> Result<usize, TokenFailure>;
}

pub(crate) fn parse_token<E: Encoding, T: Token<E> + ?Sized>(
    token: &T,
    ctx: &mut Context<'_, E>,
    reader: &mut Reader<'_, E>,
) -> Option<()> {
    let begin = reader.position();
    match token.try_match(*reader) {
        Ok(end) => finish_token(token.kind(), begin, end, ctx, reader),
        Err(failure) => {
            report_token_failure(begin, failure, ctx, reader);
            None
        }
    }
}

pub(crate) fn finish_token<E: Encoding>(
    kind: TokenKind,
    begin: usize,
    end: usize,
    ctx: &mut Context<'_, E>,
    reader: &mut Reader<'_, E>,
) -> Option<()> {
    ctx.token(kind, begin, end);
    reader.set_position(end);
    ctx.skip_whitespace(reader).then_some(())
}

pub(crate) fn report_token_failure<E: Encoding>(
    begin: usize,
    failure: TokenFailure,
    ctx: &mut Context<'_, E>,
    reader: &mut Reader<'_, E>,
) {
    if failure.end > begin {
        ctx.token(TokenKind::Error, begin, failure.end);
        reader.set_position(failure.end);
    }
    ctx.error(failure.kind, failure.range);
}

/// Implements `Rule` and `Branch` for token types.
macro_rules! token_rule {
    ($([$($generics:tt)*] $ty:ty),* $(,)?) => {$(
        impl<E: Encoding, V, $($generics)*> $crate::lexkit::rules::Rule<E, V> for $ty
        where
            $ty: $crate::lexkit::rules::Token<E>,
        {
            type Output = ();

            fn parse(
                &self,
                ctx: &mut $crate::lexkit::grammar::Context<'_, E>,
                _value: &V,
                reader: &mut $crate::lexkit::input::Reader<'_, E>,
            ) -> Option<()> {
                $crate::lexkit::rules::parse_token(self, ctx, reader)
            }
        }

        impl<E: Encoding, V, $($generics)*> $crate::lexkit::rules::Branch<E, V> for $ty
        where
            $ty: $crate::lexkit::rules::Token<E>,
        {
            type Attempt = usize;

            fn try_branch(&self, reader: $crate::lexkit::input::Reader<'_, E>) -> Option<usize> {
                <$ty as $crate::lexkit::rules::Token<E>>::try_match(self, reader).ok()
            }

            fn finish(
                &self,
                end: usize,
                ctx: &mut $crate::lexkit::grammar::Context<'_, E>,
                _value: &V,
                reader: &mut $crate::lexkit::input::Reader<'_, E>,
            ) -> Option<()> {
                let begin = reader.position();
                let kind = <$ty as $crate::lexkit::rules::Token<E>>::kind(self);
                $crate::lexkit::rules::finish_token(kind, begin, end, ctx, reader)
            }
        }
    )*};
}

pub(crate) use token_rule;

/// Concatenation of output tuples.
pub trait Concat<Rhs> {
    type Output;

    fn concat(self, rhs: Rhs) -> Self::Output;
}

macro_rules! concat_impl {
    ($(($($a:ident),*) + ($($b:ident),*);)*) => {$(
        impl<$($a,)* $($b,)*> Concat<($($b,)*)> for ($($a,)*) {
            type Output = ($($a,)* $($b,)*);

            #[allow(non_snake_case, clippy::unused_unit)]
            fn concat(self, rhs: ($($b,)*)) -> Self::Output {
                let ($($a,)*) = self;
                let ($($b,)*) = rhs;
                ($($a,)* $($b,)*)
            }
        }
    )*};
}

concat_impl! {
    () + ();
    () + (B0);
    () + (B0, B1);
    () + (B0, B1, B2);
    () + (B0, B1, B2, B3);
    () + (B0, B1, B2, B3, B4);
    () + (B0, B1, B2, B3, B4, B5);
    (A0) + ();
    (A0) + (B0);
    (A0) + (B0, B1);
    (A0) + (B0, B1, B2);
    (A0) + (B0, B1, B2, B3);
    (A0) + (B0, B1, B2, B3, B4);
    (A0, A1) + ();
    (A0, A1) + (B0);
    (A0, A1) + (B0, B1);
    (A0, A1) + (B0, B1, B2);
    (A0, A1) + (B0, B1, B2, B3);
    (A0, A1, A2) + ();
    (A0, A1, A2) + (B0);
    (A0, A1, A2) + (B0, B1);
    (A0, A1, A2) + (B0, B1, B2);
    (A0, A1, A2, A3) + ();
    (A0, A1, A2, A3) + (B0);
    (A0, A1, A2, A3) + (B0, B1);
    (A0, A1, A2, A3, A4) + ();
    (A0, A1, A2, A3, A4) + (B0);
    (A0, A1, A2, A3, A4, A5) + ();
}

/// Method forms of the structural combinators.
pub trait RuleExt: Sized {
    /// `seq(self, next)`
    fn then<B>(self, next: B) -> Seq<Self, B> {
        seq(self, next)
    }

    /// `choice(self, other)`
    fn or<B>(self, other: B) -> Choice<Self, B> {
        choice(self, other)
    }
}

impl<T> RuleExt for T {}

/// `seq!(a, b, c)` is `seq(a, seq(b, c))`.
#[macro_export]
macro_rules! seq {
    ($rule:expr $(,)?) => { $rule };
    ($rule:expr, $($rest:expr),+ $(,)?) => {
        $crate::lexkit::rules::seq($rule, $crate::seq!($($rest),+))
    };
}

/// `choice!(a, b, c)` is `choice(a, choice(b, c))`.
#[macro_export]
macro_rules! choice {
    ($rule:expr $(,)?) => { $rule };
    ($rule:expr, $($rest:expr),+ $(,)?) => {
        $crate::lexkit::rules::choice($rule, $crate::choice!($($rest),+))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_flattens() {
        assert_eq!(().concat((1,)), (1,));
        assert_eq!((1, "a").concat(('b',)), (1, "a", 'b'));
        assert_eq!((1,).concat(()), (1,));
    }
}
