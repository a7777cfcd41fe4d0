//! Container-building values
//!
//! [`as_list`] appends in order (`Vec`, `VecDeque`, `String`), [`as_collection`]
//! inserts (`HashSet`, `BTreeSet`, `HashMap`, `BTreeMap`). Either works as a callback
//! and as a sink callback:
//!
//!   - `()` gives an empty container
//!   - `(C,)` passes a finished container through, which is what a production whose
//!     rule is a list sees
//!   - two to four elements give a container of those elements
//!   - as a sink, every pushed item is added
//!
//! The initial container comes from `C::default()`, or from the parse state with
//! [`AsList::allocator`] / [`AsCollection::allocator`].

use super::{Callback, Sink, SinkCallback};
use std::any::{type_name, Any};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;
use std::marker::PhantomData;

/// Ordered containers.
pub trait ListContainer<T> {
    fn push_back(&mut self, item: T);

    fn reserve(&mut self, _additional: usize) {}
}

impl<T> ListContainer<T> for Vec<T> {
    fn push_back(&mut self, item: T) {
        self.push(item);
    }

    fn reserve(&mut self, additional: usize) {
        Vec::reserve(self, additional);
    }
}

impl<T> ListContainer<T> for VecDeque<T> {
    fn push_back(&mut self, item: T) {
        VecDeque::push_back(self, item);
    }

    fn reserve(&mut self, additional: usize) {
        VecDeque::reserve(self, additional);
    }
}

impl ListContainer<char> for String {
    fn push_back(&mut self, item: char) {
        self.push(item);
    }

    fn reserve(&mut self, additional: usize) {
        String::reserve(self, additional);
    }
}

impl ListContainer<String> for String {
    fn push_back(&mut self, item: String) {
        self.push_str(&item);
    }
}

impl<'a> ListContainer<&'a str> for String {
    fn push_back(&mut self, item: &'a str) {
        self.push_str(item);
    }
}

/// Unordered containers.
pub trait CollectionContainer<T> {
    fn insert(&mut self, item: T);

    fn reserve(&mut self, _additional: usize) {}
}

impl<T: Eq + Hash> CollectionContainer<T> for HashSet<T> {
    fn insert(&mut self, item: T) {
        HashSet::insert(self, item);
    }

    fn reserve(&mut self, additional: usize) {
        HashSet::reserve(self, additional);
    }
}

impl<T: Ord> CollectionContainer<T> for BTreeSet<T> {
    fn insert(&mut self, item: T) {
        BTreeSet::insert(self, item);
    }
}

impl<K: Eq + Hash, V> CollectionContainer<(K, V)> for HashMap<K, V> {
    fn insert(&mut self, (key, value): (K, V)) {
        HashMap::insert(self, key, value);
    }

    fn reserve(&mut self, additional: usize) {
        HashMap::reserve(self, additional);
    }
}

impl<K: Ord, V> CollectionContainer<(K, V)> for BTreeMap<K, V> {
    fn insert(&mut self, (key, value): (K, V)) {
        BTreeMap::insert(self, key, value);
    }
}

/// Produces the initial container.
pub trait Allocate<C> {
    fn allocate(&self, state: &dyn Any) -> C;
}

/// `C::default()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAlloc;

impl<C: Default> Allocate<C> for DefaultAlloc {
    fn allocate(&self, _state: &dyn Any) -> C {
        C::default()
    }
}

/// A function of the parse state. Actions run without an `S` get `C::default()`.
pub struct StateAlloc<S, F> {
    alloc: F,
    _state: PhantomData<fn(&S)>,
}

impl<S, F: Clone> Clone for StateAlloc<S, F> {
    fn clone(&self) -> Self {
        Self {
            alloc: self.alloc.clone(),
            _state: PhantomData,
        }
    }
}

impl<S, F> fmt::Debug for StateAlloc<S, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StateAlloc<{}>", type_name::<S>())
    }
}

impl<C: Default, S: 'static, F: Fn(&S) -> C> Allocate<C> for StateAlloc<S, F> {
    fn allocate(&self, state: &dyn Any) -> C {
        match state.downcast_ref::<S>() {
            Some(state) => (self.alloc)(state),
            None => {
                log::debug!(
                    "no {} parse state, allocating a default {}",
                    type_name::<S>(),
                    type_name::<C>()
                );
                C::default()
            }
        }
    }
}

/// Sink of [`as_list`].
#[derive(Debug, Clone, Default)]
pub struct ListSink<C> {
    container: C,
}

/// Sink of [`as_collection`].
#[derive(Debug, Clone, Default)]
pub struct CollectionSink<C> {
    container: C,
}

/// An ordered container.
pub struct AsList<C, A = DefaultAlloc> {
    alloc: A,
    _container: PhantomData<fn() -> C>,
}

/// An unordered container.
pub struct AsCollection<C, A = DefaultAlloc> {
    alloc: A,
    _container: PhantomData<fn() -> C>,
}

pub fn as_list<C>() -> AsList<C> {
    AsList {
        alloc: DefaultAlloc,
        _container: PhantomData,
    }
}

pub fn as_collection<C>() -> AsCollection<C> {
    AsCollection {
        alloc: DefaultAlloc,
        _container: PhantomData,
    }
}

macro_rules! same_type {
    ($_arg:ident, $ty:ty) => {
        $ty
    };
}

macro_rules! container_value {
    (@direct $value:ident, $container:ident, $add:ident; $($arg:ident),+) => {
        impl<C, A, T> Callback<($(same_type!($arg, T),)+)> for $value<C, A>
        where
            C: $container<T>,
            A: Allocate<C>,
        {
            type Output = C;

            fn call(&self, state: &dyn Any, ($($arg,)+): ($(same_type!($arg, T),)+)) -> C {
                let mut container = self.alloc.allocate(state);
                $container::<T>::reserve(&mut container, [$(stringify!($arg)),+].len());
                $(container.$add($arg);)+
                container
            }
        }
    };
    ($value:ident, $container:ident, $add:ident, $sink:ident) => {
        impl<C> $value<C, DefaultAlloc> {
            /// Creates the initial container from the parse state when it is an `S`.
            pub fn allocator<S, F>(self, alloc: F) -> $value<C, StateAlloc<S, F>>
            where
                S: 'static,
                F: Fn(&S) -> C,
            {
                $value {
                    alloc: StateAlloc {
                        alloc,
                        _state: PhantomData,
                    },
                    _container: PhantomData,
                }
            }
        }

        impl<C, A: Clone> Clone for $value<C, A> {
            fn clone(&self) -> Self {
                Self {
                    alloc: self.alloc.clone(),
                    _container: PhantomData,
                }
            }
        }

        impl<C, A: Copy> Copy for $value<C, A> {}

        impl<C, A: fmt::Debug> fmt::Debug for $value<C, A> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}<{}>({:?})", stringify!($value), type_name::<C>(), self.alloc)
            }
        }

        impl<C, A: Allocate<C>> Callback<()> for $value<C, A> {
            type Output = C;

            fn call(&self, state: &dyn Any, _args: ()) -> C {
                self.alloc.allocate(state)
            }
        }

        impl<C, A> Callback<(C,)> for $value<C, A> {
            type Output = C;

            fn call(&self, _state: &dyn Any, (container,): (C,)) -> C {
                container
            }
        }

        container_value!(@direct $value, $container, $add; a, b);
        container_value!(@direct $value, $container, $add; a, b, c);
        container_value!(@direct $value, $container, $add; a, b, c, d);

        impl<C, A, T> SinkCallback<(T,)> for $value<C, A>
        where
            C: $container<T>,
            A: Allocate<C>,
        {
            type Sink = $sink<C>;

            fn sink(&self, state: &dyn Any) -> $sink<C> {
                $sink {
                    container: self.alloc.allocate(state),
                }
            }
        }

        impl<C, A, K, V> SinkCallback<(K, V)> for $value<C, A>
        where
            C: $container<(K, V)>,
            A: Allocate<C>,
        {
            type Sink = $sink<C>;

            fn sink(&self, state: &dyn Any) -> $sink<C> {
                $sink {
                    container: self.alloc.allocate(state),
                }
            }
        }

        impl<C: $container<T>, T> Sink<(T,)> for $sink<C> {
            type Output = C;

            fn push(&mut self, (item,): (T,)) {
                self.container.$add(item);
            }

            fn reserve(&mut self, additional: usize) {
                $container::<T>::reserve(&mut self.container, additional);
            }

            fn finish(self) -> C {
                self.container
            }
        }

        impl<C: $container<(K, V)>, K, V> Sink<(K, V)> for $sink<C> {
            type Output = C;

            fn push(&mut self, item: (K, V)) {
                self.container.$add(item);
            }

            fn reserve(&mut self, additional: usize) {
                $container::<(K, V)>::reserve(&mut self.container, additional);
            }

            fn finish(self) -> C {
                self.container
            }
        }
    };
}

container_value!(AsList, ListContainer, push_back, ListSink);
container_value!(AsCollection, CollectionContainer, insert, CollectionSink);
