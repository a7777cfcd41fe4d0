//! Repetition
//!
//! Repeated items are not collected by the rule itself: each item's output is pushed
//! into a sink obtained from the enclosing production's value (see
//! [`callback`](crate::lexkit::callback)). The rule outputs the finished sink.

use super::{Branch, Rule};
use crate::lexkit::callback::{Sink, SinkCallback, SinkOutput};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::grammar::Context;
use crate::lexkit::input::Reader;

/// One or more items.
#[derive(Debug, Clone, Copy)]
pub struct List<I> {
    item: I,
}

/// Zero or more items.
#[derive(Debug, Clone, Copy)]
pub struct OptList<I> {
    list: List<I>,
}

/// One or more items, separated.
#[derive(Debug, Clone, Copy)]
pub struct SepList<I, S> {
    item: I,
    sep: S,
}

/// One or more items, separated, with an optional trailing separator.
#[derive(Debug, Clone, Copy)]
pub struct TrailingSepList<I, S> {
    item: I,
    sep: S,
}

/// `item` repeated as long as it applies; at least once.
pub fn list<I>(item: I) -> List<I> {
    List { item }
}

impl<I> List<I> {
    pub fn sep<S>(self, sep: S) -> SepList<I, S> {
        SepList { item: self.item, sep }
    }

    pub fn trailing_sep<S>(self, sep: S) -> TrailingSepList<I, S> {
        TrailingSepList { item: self.item, sep }
    }

    /// Also matches no item at all, producing the empty sink.
    pub fn or_empty(self) -> OptList<I> {
        OptList { list: self }
    }

    fn rest<E, V>(
        &self,
        mut sink: V::Sink,
        ctx: &mut Context<'_, E>,
        value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<(SinkOutput<V, I::Output>,)>
    where
        E: Encoding,
        I: Branch<E, V>,
        V: SinkCallback<I::Output>,
    {
        while let Some(attempt) = self.item.try_branch(*reader) {
            let before = reader.position();
            sink.push(self.item.finish(attempt, ctx, value, reader)?);
            if reader.position() == before {
                break;
            }
        }
        Some((sink.finish(),))
    }
}

impl<E, V, I> Rule<E, V> for List<I>
where
    E: Encoding,
    I: Branch<E, V>,
    V: SinkCallback<I::Output>,
{
    type Output = (SinkOutput<V, I::Output>,);

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        let mut sink = value.sink(ctx.state());
        sink.push(self.item.parse(ctx, value, reader)?);
        self.rest(sink, ctx, value, reader)
    }
}

impl<E, V, I> Branch<E, V> for List<I>
where
    E: Encoding,
    I: Branch<E, V>,
    V: SinkCallback<I::Output>,
{
    type Attempt = I::Attempt;

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<I::Attempt> {
        self.item.try_branch(reader)
    }

    fn finish(
        &self,
        attempt: I::Attempt,
        ctx: &mut Context<'_, E>,
        value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<Self::Output> {
        let mut sink = value.sink(ctx.state());
        sink.push(self.item.finish(attempt, ctx, value, reader)?);
        self.rest(sink, ctx, value, reader)
    }

    fn cancel(&self, attempt: I::Attempt) {
        self.item.cancel(attempt);
    }
}

impl<E, V, I> Rule<E, V> for OptList<I>
where
    E: Encoding,
    I: Branch<E, V>,
    V: SinkCallback<I::Output>,
{
    type Output = (SinkOutput<V, I::Output>,);

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        let sink = value.sink(ctx.state());
        self.list.rest(sink, ctx, value, reader)
    }
}

impl<E, V, I, S> Rule<E, V> for SepList<I, S>
where
    E: Encoding,
    I: Rule<E, V>,
    S: Branch<E, V>,
    V: SinkCallback<I::Output>,
{
    type Output = (SinkOutput<V, I::Output>,);

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        let mut sink = value.sink(ctx.state());
        sink.push(self.item.parse(ctx, value, reader)?);
        while let Some(attempt) = self.sep.try_branch(*reader) {
            self.sep.finish(attempt, ctx, value, reader)?;
            sink.push(self.item.parse(ctx, value, reader)?);
        }
        Some((sink.finish(),))
    }
}

impl<E, V, I, S> Rule<E, V> for TrailingSepList<I, S>
where
    E: Encoding,
    I: Branch<E, V>,
    S: Branch<E, V>,
    V: SinkCallback<I::Output>,
{
    type Output = (SinkOutput<V, I::Output>,);

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        let mut sink = value.sink(ctx.state());
        sink.push(self.item.parse(ctx, value, reader)?);
        while let Some(attempt) = self.sep.try_branch(*reader) {
            self.sep.finish(attempt, ctx, value, reader)?;
            match self.item.try_branch(*reader) {
                Some(attempt) => sink.push(self.item.finish(attempt, ctx, value, reader)?),
                None => break,
            }
        }
        Some((sink.finish(),))
    }
}

/// Exactly `count` items.
#[derive(Debug, Clone, Copy)]
pub struct Times<R> {
    count: usize,
    item: R,
}

pub fn times<R>(count: usize, item: R) -> Times<R> {
    Times { count, item }
}

impl<E, V, R> Rule<E, V> for Times<R>
where
    E: Encoding,
    R: Rule<E, V>,
    V: SinkCallback<R::Output>,
{
    type Output = (SinkOutput<V, R::Output>,);

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        let mut sink = value.sink(ctx.state());
        sink.reserve(self.count);
        for _ in 0..self.count {
            sink.push(self.item.parse(ctx, value, reader)?);
        }
        Some((sink.finish(),))
    }
}
