//! Symbol rules
//!
//! Three ways to look up a [`SymbolTable`]:
//!
//!   - `symbol(&TABLE)` matches the table directly against the input
//!   - `symbol(&TABLE).of(token)` parses a token first; its whole lexeme must be a key
//!   - `symbol(&TABLE).identifier(id)` matches the table, then checks that the identifier
//!     does not continue; otherwise the full identifier is parsed and reported as an
//!     unknown symbol
//!
//! All of them produce a clone of the mapped value.

use super::char_class::CharClass;
use super::identifier::Identifier;
use super::{finish_token, report_token_failure, Branch, Rule, Token};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::error::ErrorKind;
use crate::lexkit::event::TokenKind;
use crate::lexkit::grammar::Context;
use crate::lexkit::input::Reader;
use crate::lexkit::symbol::{KeyIndex, SymbolTable};

#[derive(Debug)]
pub struct Symbol<T: 'static> {
    table: &'static SymbolTable<T>,
}

impl<T> Clone for Symbol<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Symbol<T> {}

pub fn symbol<T>(table: &'static SymbolTable<T>) -> Symbol<T> {
    Symbol { table }
}

impl<T> Symbol<T> {
    /// Looks up the lexeme of `token` instead of the raw input.
    pub fn of<K>(self, token: K) -> SymbolOf<T, K> {
        SymbolOf {
            table: self.table,
            token,
        }
    }

    /// Looks up keywords that must not be a prefix of a longer identifier.
    pub fn identifier<L, R>(self, identifier: Identifier<L, R>) -> SymbolIdentifier<T, L, R> {
        SymbolIdentifier {
            table: self.table,
            identifier,
        }
    }

    fn commit<E: Encoding>(
        &self,
        (index, end): (KeyIndex, usize),
        ctx: &mut Context<'_, E>,
        reader: &mut Reader<'_, E>,
    ) -> Option<(T,)>
    where
        T: Clone,
    {
        let begin = reader.position();
        finish_token(TokenKind::Identifier, begin, end, ctx, reader)?;
        Some((self.table[index].clone(),))
    }
}

fn lookup<E: Encoding, T>(table: &SymbolTable<T>, mut reader: Reader<'_, E>) -> Option<(KeyIndex, usize)> {
    let index = table.try_parse(&mut reader)?;
    Some((index, reader.position()))
}

impl<E: Encoding, V, T: Clone> Rule<E, V> for Symbol<T> {
    type Output = (T,);

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<(T,)> {
        match lookup(self.table, *reader) {
            Some(found) => self.commit(found, ctx, reader),
            None => {
                let position = reader.position();
                ctx.error(ErrorKind::UnknownSymbol, position..position);
                None
            }
        }
    }
}

impl<E: Encoding, V, T: Clone> Branch<E, V> for Symbol<T> {
    type Attempt = (KeyIndex, usize);

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<Self::Attempt> {
        lookup(self.table, reader)
    }

    fn finish(
        &self,
        attempt: Self::Attempt,
        ctx: &mut Context<'_, E>,
        _value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<(T,)> {
        self.commit(attempt, ctx, reader)
    }
}

#[derive(Debug)]
pub struct SymbolOf<T: 'static, K> {
    table: &'static SymbolTable<T>,
    token: K,
}

impl<T, K: Clone> Clone for SymbolOf<T, K> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            token: self.token.clone(),
        }
    }
}

/// The key matched by the table over exactly `begin..end`.
fn lookup_exact<E: Encoding, T>(table: &SymbolTable<T>, reader: Reader<'_, E>, end: usize) -> Option<KeyIndex> {
    let mut partial = reader.partial(end);
    let index = table.try_parse(&mut partial)?;
    (partial.position() == end).then_some(index)
}

impl<E: Encoding, V, T: Clone, K: Token<E>> Rule<E, V> for SymbolOf<T, K> {
    type Output = (T,);

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<(T,)> {
        let begin = reader.position();
        let end = match self.token.try_match(*reader) {
            Ok(end) => end,
            Err(failure) => {
                report_token_failure(begin, failure, ctx, reader);
                return None;
            }
        };
        match lookup_exact(self.table, *reader, end) {
            Some(index) => {
                finish_token(self.token.kind(), begin, end, ctx, reader)?;
                Some((self.table[index].clone(),))
            }
            None => {
                ctx.token(self.token.kind(), begin, end);
                reader.set_position(end);
                ctx.error(ErrorKind::UnknownSymbol, begin..end);
                None
            }
        }
    }
}

impl<E: Encoding, V, T: Clone, K: Token<E>> Branch<E, V> for SymbolOf<T, K> {
    type Attempt = (KeyIndex, usize);

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<Self::Attempt> {
        let end = self.token.try_match(reader).ok()?;
        let index = lookup_exact(self.table, reader, end)?;
        Some((index, end))
    }

    fn finish(
        &self,
        (index, end): Self::Attempt,
        ctx: &mut Context<'_, E>,
        _value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<(T,)> {
        let begin = reader.position();
        finish_token(self.token.kind(), begin, end, ctx, reader)?;
        Some((self.table[index].clone(),))
    }
}

#[derive(Debug)]
pub struct SymbolIdentifier<T: 'static, L, R> {
    table: &'static SymbolTable<T>,
    identifier: Identifier<L, R>,
}

impl<T, L: Clone, R: Clone> Clone for SymbolIdentifier<T, L, R> {
    fn clone(&self) -> Self {
        Self {
            table: self.table,
            identifier: self.identifier.clone(),
        }
    }
}

impl<T, L, R> SymbolIdentifier<T, L, R> {
    /// A key that is not followed by another identifier character.
    fn keyword<E: Encoding>(&self, reader: Reader<'_, E>) -> Option<(KeyIndex, usize)>
    where
        R: CharClass<E>,
    {
        let (index, end) = lookup(self.table, reader)?;
        let mut after = reader;
        after.set_position(end);
        match self.identifier.trailing().match_one(after) {
            Some(_) => None,
            None => Some((index, end)),
        }
    }
}

impl<E, V, T, L, R> Rule<E, V> for SymbolIdentifier<T, L, R>
where
    E: Encoding,
    T: Clone,
    L: CharClass<E>,
    R: CharClass<E>,
{
    type Output = (T,);

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<(T,)> {
        let begin = reader.position();
        if let Some((index, end)) = self.keyword(*reader) {
            finish_token(TokenKind::Identifier, begin, end, ctx, reader)?;
            return Some((self.table[index].clone(),));
        }
        match self.identifier.try_match(*reader) {
            Ok(end) => {
                ctx.token(TokenKind::Identifier, begin, end);
                reader.set_position(end);
                ctx.error(ErrorKind::UnknownSymbol, begin..end);
            }
            Err(failure) => report_token_failure(begin, failure, ctx, reader),
        }
        None
    }
}

impl<E, V, T, L, R> Branch<E, V> for SymbolIdentifier<T, L, R>
where
    E: Encoding,
    T: Clone,
    L: CharClass<E>,
    R: CharClass<E>,
{
    type Attempt = (KeyIndex, usize);

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<Self::Attempt> {
        self.keyword(reader)
    }

    fn finish(
        &self,
        (index, end): Self::Attempt,
        ctx: &mut Context<'_, E>,
        _value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<(T,)> {
        let begin = reader.position();
        finish_token(TokenKind::Identifier, begin, end, ctx, reader)?;
        Some((self.table[index].clone(),))
    }
}
