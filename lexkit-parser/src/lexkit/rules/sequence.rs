//! Sequences

use super::{Concat, Rule};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::grammar::Context;
use crate::lexkit::input::Reader;

/// `first` then `second`; the outputs are concatenated.
#[derive(Debug, Clone, Copy)]
pub struct Seq<A, B> {
    first: A,
    second: B,
}

pub fn seq<A, B>(first: A, second: B) -> Seq<A, B> {
    Seq { first, second }
}

impl<E, V, A, B> Rule<E, V> for Seq<A, B>
where
    E: Encoding,
    A: Rule<E, V>,
    B: Rule<E, V>,
    A::Output: Concat<B::Output>,
{
    type Output = <A::Output as Concat<B::Output>>::Output;

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        let first = self.first.parse(ctx, value, reader)?;
        let second = self.second.parse(ctx, value, reader)?;
        Some(first.concat(second))
    }
}
