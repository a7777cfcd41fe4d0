//! Token rules and token adapters

use super::{finish_token, report_token_failure, token_rule, Branch, Rule, Token, TokenFailure};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::error::ErrorKind;
use crate::lexkit::event::{Silent, TokenKind};
use crate::lexkit::grammar::{Context, ParseOptions};
use crate::lexkit::input::{Lexeme, Reader};

/// Turns an arbitrary rule into a single token.
///
/// The rule runs silently on a copy of the reader. On success everything it consumed
/// becomes one token; on failure the units it reached become an error token followed
/// by a `MissingToken` error.
#[derive(Debug, Clone, Copy)]
pub struct TokenOf<R> {
    rule: R,
    kind: TokenKind,
}

pub fn token<R>(rule: R) -> TokenOf<R> {
    TokenOf {
        rule,
        kind: TokenKind::Unknown,
    }
}

impl<R> TokenOf<R> {
    /// Reports the token with `kind` instead of `Unknown`.
    pub fn with_kind(mut self, kind: TokenKind) -> Self {
        self.kind = kind;
        self
    }
}

impl<E: Encoding, R: Rule<E>> Token<E> for TokenOf<R> {
    fn kind(&self) -> TokenKind {
        self.kind
    }

    fn try_match(&self, mut reader: Reader<'_, E>) -> Result<usize, TokenFailure> {
        let begin = reader.position();
        let mut silent = Silent;
        let mut ctx = Context::new(&mut silent, &(), &ParseOptions::default());
        match self.rule.parse(&mut ctx, &(), &mut reader) {
            Some(_) => Ok(reader.position()),
            None => {
                let reached = reader.position();
                Err(TokenFailure {
                    end: reached,
                    kind: ErrorKind::MissingToken,
                    range: begin..reached,
                })
            }
        }
    }
}

token_rule!([R] TokenOf<R>);

/// Matches the end of the input, as an empty token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Eof;

pub fn eof() -> Eof {
    Eof
}

impl<E: Encoding> Token<E> for Eof {
    fn kind(&self) -> TokenKind {
        TokenKind::Eof
    }

    fn try_match(&self, reader: Reader<'_, E>) -> Result<usize, TokenFailure> {
        if reader.is_eof() {
            Ok(reader.position())
        } else {
            Err(TokenFailure::at(reader.position(), ErrorKind::ExpectedCharClass { name: "EOF" }))
        }
    }
}

/// `\n` or `\r\n`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Newline;

pub fn newline() -> Newline {
    Newline
}

impl<E: Encoding> Token<E> for Newline {
    fn kind(&self) -> TokenKind {
        TokenKind::Newline
    }

    fn try_match(&self, reader: Reader<'_, E>) -> Result<usize, TokenFailure> {
        let position = reader.position();
        let unit = |offset| reader.peek_at(offset).map(E::to_u32);
        match (unit(0), unit(1)) {
            (Some(0x0A), _) => Ok(position + 1),
            (Some(0x0D), Some(0x0A)) => Ok(position + 2),
            _ => Err(TokenFailure::at(position, ErrorKind::ExpectedCharClass { name: "newline" })),
        }
    }
}

token_rule!([] Eof, [] Newline);

/// The current position as a value, marked by an empty `Position` token.
#[derive(Debug, Clone, Copy, Default)]
pub struct Position;

pub fn position() -> Position {
    Position
}

impl<E: Encoding, V> Rule<E, V> for Position {
    type Output = (usize,);

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<(usize,)> {
        let position = reader.position();
        ctx.token(TokenKind::Position, position, position);
        Some((position,))
    }
}

impl<E: Encoding, V> Branch<E, V> for Position {
    type Attempt = ();

    fn try_branch(&self, _reader: Reader<'_, E>) -> Option<()> {
        Some(())
    }

    fn finish(&self, _attempt: (), ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<(usize,)> {
        self.parse(ctx, value, reader)
    }
}

/// A token whose range is produced as a [`Lexeme`].
#[derive(Debug, Clone, Copy)]
pub struct Capture<T> {
    token: T,
}

pub fn capture<T>(token: T) -> Capture<T> {
    Capture { token }
}

impl<T> Capture<T> {
    fn commit<E: Encoding>(
        &self,
        end: usize,
        ctx: &mut Context<'_, E>,
        reader: &mut Reader<'_, E>,
    ) -> Option<(Lexeme,)>
    where
        T: Token<E>,
    {
        let begin = reader.position();
        finish_token(self.token.kind(), begin, end, ctx, reader)?;
        Some((Lexeme::new(begin, end),))
    }
}

impl<E: Encoding, V, T: Token<E>> Rule<E, V> for Capture<T> {
    type Output = (Lexeme,);

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<(Lexeme,)> {
        match self.token.try_match(*reader) {
            Ok(end) => self.commit(end, ctx, reader),
            Err(failure) => {
                report_token_failure(reader.position(), failure, ctx, reader);
                None
            }
        }
    }
}

impl<E: Encoding, V, T: Token<E>> Branch<E, V> for Capture<T> {
    type Attempt = usize;

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<usize> {
        self.token.try_match(reader).ok()
    }

    fn finish(&self, end: usize, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<(Lexeme,)> {
        self.commit(end, ctx, reader)
    }
}
