//! Ordered choice

use super::{Branch, Rule};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::error::ErrorKind;
use crate::lexkit::grammar::Context;
use crate::lexkit::input::Reader;

/// The first alternative whose branch condition matches.
///
/// Both alternatives must be branches with the same output. A choice is itself a branch,
/// so `choice(a, choice(b, c))` (or `choice!(a, b, c)`) chains any number of them.
#[derive(Debug, Clone, Copy)]
pub struct Choice<A, B> {
    first: A,
    second: B,
}

pub fn choice<A, B>(first: A, second: B) -> Choice<A, B> {
    Choice { first, second }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChoiceAttempt<A, B> {
    First(A),
    Second(B),
}

impl<E, V, A, B> Rule<E, V> for Choice<A, B>
where
    E: Encoding,
    A: Branch<E, V>,
    B: Branch<E, V, Output = A::Output>,
{
    type Output = A::Output;

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        match self.try_branch(*reader) {
            Some(attempt) => self.finish(attempt, ctx, value, reader),
            None => {
                let position = reader.position();
                ctx.error(ErrorKind::ExhaustedChoice, position..position);
                None
            }
        }
    }
}

impl<E, V, A, B> Branch<E, V> for Choice<A, B>
where
    E: Encoding,
    A: Branch<E, V>,
    B: Branch<E, V, Output = A::Output>,
{
    type Attempt = ChoiceAttempt<A::Attempt, B::Attempt>;

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<Self::Attempt> {
        if let Some(attempt) = self.first.try_branch(reader) {
            return Some(ChoiceAttempt::First(attempt));
        }
        self.second.try_branch(reader).map(ChoiceAttempt::Second)
    }

    fn finish(
        &self,
        attempt: Self::Attempt,
        ctx: &mut Context<'_, E>,
        value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<Self::Output> {
        match attempt {
            ChoiceAttempt::First(attempt) => self.first.finish(attempt, ctx, value, reader),
            ChoiceAttempt::Second(attempt) => self.second.finish(attempt, ctx, value, reader),
        }
    }

    fn cancel(&self, attempt: Self::Attempt) {
        match attempt {
            ChoiceAttempt::First(attempt) => self.first.cancel(attempt),
            ChoiceAttempt::Second(attempt) => self.second.cancel(attempt),
        }
    }
}
