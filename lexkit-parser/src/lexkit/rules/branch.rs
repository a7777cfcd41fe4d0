//! Branches and optional rules

use super::{Branch, Concat, Rule};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::grammar::Context;
use crate::lexkit::input::Reader;

/// `condition` decides, `then` follows unconditionally.
///
/// Inside a choice or a list, only `condition` is tried: once it matches, the branch is
/// taken and a failure in `then` is an error rather than a reason to try the next
/// alternative.
#[derive(Debug, Clone, Copy)]
pub struct Branched<C, R> {
    condition: C,
    then: R,
}

pub fn branch<C, R>(condition: C, then: R) -> Branched<C, R> {
    Branched { condition, then }
}

impl<E, V, C, R> Rule<E, V> for Branched<C, R>
where
    E: Encoding,
    C: Branch<E, V>,
    R: Rule<E, V>,
    C::Output: Concat<R::Output>,
{
    type Output = <C::Output as Concat<R::Output>>::Output;

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        let head = self.condition.parse(ctx, value, reader)?;
        let tail = self.then.parse(ctx, value, reader)?;
        Some(head.concat(tail))
    }
}

impl<E, V, C, R> Branch<E, V> for Branched<C, R>
where
    E: Encoding,
    C: Branch<E, V>,
    R: Rule<E, V>,
    C::Output: Concat<R::Output>,
{
    type Attempt = C::Attempt;

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<C::Attempt> {
        self.condition.try_branch(reader)
    }

    fn finish(
        &self,
        attempt: C::Attempt,
        ctx: &mut Context<'_, E>,
        value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<Self::Output> {
        let head = self.condition.finish(attempt, ctx, value, reader)?;
        let tail = self.then.parse(ctx, value, reader)?;
        Some(head.concat(tail))
    }

    fn cancel(&self, attempt: C::Attempt) {
        self.condition.cancel(attempt);
    }
}

/// Parses the branch if it applies, otherwise nothing.
#[derive(Debug, Clone, Copy)]
pub struct Opt<R> {
    rule: R,
}

pub fn opt<R>(rule: R) -> Opt<R> {
    Opt { rule }
}

impl<E, V, R> Rule<E, V> for Opt<R>
where
    E: Encoding,
    R: Branch<E, V, Output = ()>,
{
    type Output = ();

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<()> {
        match self.rule.try_branch(*reader) {
            Some(attempt) => self.rule.finish(attempt, ctx, value, reader),
            None => Some(()),
        }
    }
}
