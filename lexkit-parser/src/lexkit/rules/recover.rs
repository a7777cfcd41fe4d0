//! Error recovery

use super::{Branch, Rule};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::grammar::Context;
use crate::lexkit::input::Reader;

/// Parses `rule`; if it fails, the failure stops here and parsing continues after
/// whatever the rule consumed, with the default output in place of the rule's. The
/// error stays reported, so the action ends with a recovered error instead of a fatal
/// one.
#[derive(Debug, Clone, Copy)]
pub struct Try<R> {
    rule: R,
}

pub fn try_<R>(rule: R) -> Try<R> {
    Try { rule }
}

fn recovered<E: Encoding, T: Default>(output: Option<T>, ctx: &Context<'_, E>, reader: &Reader<'_, E>) -> T {
    output.unwrap_or_else(|| {
        log::trace!("{}: recovered at {}", ctx.production(), reader.position());
        T::default()
    })
}

impl<E: Encoding, V, R> Rule<E, V> for Try<R>
where
    R: Rule<E, V>,
    R::Output: Default,
{
    type Output = R::Output;

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<R::Output> {
        let output = self.rule.parse(ctx, value, reader);
        Some(recovered(output, ctx, reader))
    }
}

impl<E: Encoding, V, R> Branch<E, V> for Try<R>
where
    R: Branch<E, V>,
    R::Output: Default,
{
    type Attempt = R::Attempt;

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<R::Attempt> {
        self.rule.try_branch(reader)
    }

    fn finish(
        &self,
        attempt: R::Attempt,
        ctx: &mut Context<'_, E>,
        value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<R::Output> {
        let output = self.rule.finish(attempt, ctx, value, reader);
        Some(recovered(output, ctx, reader))
    }

    fn cancel(&self, attempt: R::Attempt) {
        self.rule.cancel(attempt);
    }
}
