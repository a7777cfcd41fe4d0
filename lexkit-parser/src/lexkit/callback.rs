//! Value production
//!
//! A production's value is built from its rule's output by the production's
//! [`Callback`]. Repetition rules don't produce an output per item; they ask the
//! production's value for a [`Sink`] (through [`SinkCallback`]), push every item into
//! it and output the finished sink instead.
//!
//! Both protocols receive the parse state handed to the action as `&dyn Any`, which is
//! how [`as_list`]'s allocator gets at it. An allocator whose state type doesn't match
//! the action's falls back to the container's default.
//!
//! Provided values:
//!
//!   - `()`: discards everything, for productions without a value
//!   - [`callback`]: a function called with the rule's output
//!   - [`as_list`], [`as_collection`]: build a container
//!   - [`collect`], [`collect_into`]: run a function per item

use std::any::Any;

mod collect;
mod container;

pub use collect::{collect, collect_into, Collect, CollectInto, CountSink, IntoSink};
pub use container::{
    as_collection, as_list, Allocate, AsCollection, AsList, CollectionContainer, CollectionSink, DefaultAlloc,
    ListContainer, ListSink, StateAlloc,
};

/// Turns an argument tuple into a value.
pub trait Callback<Args> {
    type Output;

    fn call(&self, state: &dyn Any, args: Args) -> Self::Output;
}

/// Accumulates argument tuples, one per repeated item.
pub trait Sink<Args> {
    type Output;

    fn push(&mut self, args: Args);

    /// Hint that `additional` more items will be pushed.
    fn reserve(&mut self, _additional: usize) {}

    fn finish(self) -> Self::Output;
}

/// Something that can hand out a fresh sink.
pub trait SinkCallback<Args> {
    type Sink: Sink<Args>;

    fn sink(&self, state: &dyn Any) -> Self::Sink;
}

/// What a sink produced by `V` finishes into.
pub type SinkOutput<V, Args> = <<V as SinkCallback<Args>>::Sink as Sink<Args>>::Output;

impl<Args> Callback<Args> for () {
    type Output = ();

    fn call(&self, _state: &dyn Any, _args: Args) {}
}

/// Sink of `()`: drops every item.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl<Args> Sink<Args> for Discard {
    type Output = ();

    fn push(&mut self, _args: Args) {}

    fn finish(self) {}
}

impl<Args> SinkCallback<Args> for () {
    type Sink = Discard;

    fn sink(&self, _state: &dyn Any) -> Discard {
        Discard
    }
}

/// Calls a function with the elements of an argument tuple.
pub trait Apply<Args> {
    type Output;

    fn apply(&self, args: Args) -> Self::Output;
}

macro_rules! apply_impl {
    ($(($($arg:ident),*);)*) => {$(
        impl<Func, Ret, $($arg,)*> Apply<($($arg,)*)> for Func
        where
            Func: Fn($($arg),*) -> Ret,
        {
            type Output = Ret;

            #[allow(non_snake_case)]
            fn apply(&self, ($($arg,)*): ($($arg,)*)) -> Ret {
                self($($arg),*)
            }
        }
    )*};
}

apply_impl! {
    ();
    (A);
    (A, B);
    (A, B, C);
    (A, B, C, D);
}

/// A function used as a callback.
#[derive(Debug, Clone, Copy)]
pub struct FnCallback<F> {
    f: F,
}

/// Wraps a function taking up to four arguments.
///
/// Production values must be nameable, so grammars pass function pointers:
/// `callback(add as fn(i64, i64) -> i64)`.
pub fn callback<F>(f: F) -> FnCallback<F> {
    FnCallback { f }
}

impl<F: Apply<Args>, Args> Callback<Args> for FnCallback<F> {
    type Output = F::Output;

    fn call(&self, _state: &dyn Any, args: Args) -> F::Output {
        self.f.apply(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(a: i64, b: i64) -> i64 {
        a + b
    }

    #[test]
    fn test_function_arities() {
        assert_eq!(callback(|| 7).call(&(), ()), 7);
        assert_eq!(callback(|x: i32| x * 2).call(&(), (21,)), 42);
        assert_eq!(callback(add as fn(i64, i64) -> i64).call(&(), (40, 2)), 42);
        let join = |a: &str, b: &str, c: &str, d: &str| [a, b, c, d].concat();
        assert_eq!(callback(join).call(&(), ("a", "b", "c", "d")), "abcd");
    }

    #[test]
    fn test_unit_discards() {
        let mut sink = <() as SinkCallback<(u32,)>>::sink(&(), &());
        Sink::<(u32,)>::push(&mut sink, (1,));
        let () = Sink::<(u32,)>::finish(sink);
        let () = Callback::<(u32, &str)>::call(&(), &(), (1, "x"));
    }
}
