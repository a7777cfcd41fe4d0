//! Per-item functions as sinks

use super::container::ListContainer;
use super::{Apply, Callback, Sink, SinkCallback};
use std::any::Any;
use std::marker::PhantomData;

/// Calls a function for every item and counts them.
#[derive(Debug, Clone, Copy)]
pub struct Collect<F> {
    f: F,
}

/// A sink calling `f` for each item; the function returns nothing and the sink
/// finishes into the number of calls.
pub fn collect<F>(f: F) -> Collect<F> {
    Collect { f }
}

#[derive(Debug, Clone)]
pub struct CountSink<F> {
    f: F,
    count: usize,
}

impl<F: Apply<Args, Output = ()> + Clone, Args> SinkCallback<Args> for Collect<F> {
    type Sink = CountSink<F>;

    fn sink(&self, _state: &dyn Any) -> CountSink<F> {
        CountSink {
            f: self.f.clone(),
            count: 0,
        }
    }
}

impl<F: Apply<Args, Output = ()>, Args> Sink<Args> for CountSink<F> {
    type Output = usize;

    fn push(&mut self, args: Args) {
        self.f.apply(args);
        self.count += 1;
    }

    fn finish(self) -> usize {
        self.count
    }
}

impl<F> Callback<(usize,)> for Collect<F> {
    type Output = usize;

    fn call(&self, _state: &dyn Any, (count,): (usize,)) -> usize {
        count
    }
}

/// Calls a function for every item and stores the results in a `C`.
pub struct CollectInto<C, F> {
    f: F,
    _container: PhantomData<fn() -> C>,
}

pub fn collect_into<C, F>(f: F) -> CollectInto<C, F> {
    CollectInto {
        f,
        _container: PhantomData,
    }
}

impl<C, F: Clone> Clone for CollectInto<C, F> {
    fn clone(&self) -> Self {
        collect_into(self.f.clone())
    }
}

impl<C, F: Copy> Copy for CollectInto<C, F> {}

impl<C, F: std::fmt::Debug> std::fmt::Debug for CollectInto<C, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("CollectInto").field("f", &self.f).finish()
    }
}

#[derive(Debug, Clone)]
pub struct IntoSink<C, F> {
    f: F,
    container: C,
}

impl<C, F, Args> SinkCallback<Args> for CollectInto<C, F>
where
    F: Apply<Args> + Clone,
    C: ListContainer<F::Output> + Default,
{
    type Sink = IntoSink<C, F>;

    fn sink(&self, _state: &dyn Any) -> IntoSink<C, F> {
        IntoSink {
            f: self.f.clone(),
            container: C::default(),
        }
    }
}

impl<C, F, Args> Sink<Args> for IntoSink<C, F>
where
    F: Apply<Args>,
    C: ListContainer<F::Output>,
{
    type Output = C;

    fn push(&mut self, args: Args) {
        let item = self.f.apply(args);
        self.container.push_back(item);
    }

    fn reserve(&mut self, additional: usize) {
        self.container.reserve(additional);
    }

    fn finish(self) -> C {
        self.container
    }
}

impl<C, F> Callback<(C,)> for CollectInto<C, F> {
    type Output = C;

    fn call(&self, _state: &dyn Any, (container,): (C,)) -> C {
        container
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_collect_counts_calls() {
        let seen = Cell::new(0u32);
        let value = collect(|n: u32| seen.set(seen.get() + n));
        let mut sink = SinkCallback::<(u32,)>::sink(&value, &());
        sink.push((2u32,));
        sink.push((5u32,));
        assert_eq!(Sink::<(u32,)>::finish(sink), 2);
        assert_eq!(seen.get(), 7);
        assert_eq!(value.call(&(), (2,)), 2);
    }

    #[test]
    fn test_collect_into_maps_items() {
        let value = collect_into::<Vec<String>, _>(|key: &str, n: u32| format!("{}={}", key, n));
        let mut sink = SinkCallback::<(&str, u32)>::sink(&value, &());
        Sink::<(&str, u32)>::reserve(&mut sink, 2);
        sink.push(("a", 1u32));
        sink.push(("b", 2u32));
        assert_eq!(Sink::<(&str, u32)>::finish(sink), vec!["a=1", "b=2"]);
    }
}
