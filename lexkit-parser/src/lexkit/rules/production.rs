//! Production references
//!
//! `p::<P>()` parses production `P` as a child of the current one. It brackets the
//! child's events with start and finish (or cancel), switches the whitespace scope, turns
//! the child's rule output into its value with the child's callback, and skips the
//! parent's whitespace afterwards.

use super::{Branch, Rule};
use crate::lexkit::callback::Callback;
use crate::lexkit::encoding::Encoding;
use crate::lexkit::event::Event;
use crate::lexkit::grammar::{Context, Production, ProductionValue, RuleOutput, Whitespace};
use crate::lexkit::input::Reader;
use std::fmt;
use std::marker::PhantomData;

pub struct ProductionRef<P> {
    _production: PhantomData<fn() -> P>,
}

/// Parses production `P`.
pub fn p<P>() -> ProductionRef<P> {
    ProductionRef {
        _production: PhantomData,
    }
}

impl<P> Clone for ProductionRef<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for ProductionRef<P> {}

impl<P> fmt::Debug for ProductionRef<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "p::<{}>()", std::any::type_name::<P>())
    }
}

impl<P> ProductionRef<P> {
    /// Runs `body` inside the child production's context and finishes the production.
    fn run<E, F>(&self, ctx: &mut Context<'_, E>, reader: &mut Reader<'_, E>, body: F) -> Option<(ProductionValue<E, P>,)>
    where
        E: Encoding,
        P: Production<E>,
        P::Value: Callback<RuleOutput<E, P>>,
        F: FnOnce(&mut Context<'_, E>, &P::Value, &mut Reader<'_, E>) -> Option<RuleOutput<E, P>>,
    {
        let value = P::value();
        let own_whitespace = P::whitespace();
        let begin = reader.position();
        let output = {
            let whitespace = own_whitespace.as_ref().map(|w| w as &dyn Whitespace<E>);
            let mut child = ctx.enter(P::NAME, P::IS_TOKEN, whitespace, begin)?;
            log::trace!("production {} starts at {}", P::NAME, begin);
            child.emit(Event::ProductionStart {
                name: P::NAME,
                position: begin,
            });
            match body(&mut child, &value, reader) {
                Some(output) => {
                    child.emit(Event::ProductionFinish {
                        name: P::NAME,
                        position: reader.position(),
                    });
                    output
                }
                None => {
                    log::trace!("production {} cancelled at {}", P::NAME, reader.position());
                    child.emit(Event::ProductionCancel {
                        name: P::NAME,
                        position: reader.position(),
                    });
                    return None;
                }
            }
        };
        let produced = value.call(ctx.state(), output);
        if !ctx.skip_whitespace(reader) {
            return None;
        }
        Some((produced,))
    }
}

impl<E, V, P> Rule<E, V> for ProductionRef<P>
where
    E: Encoding,
    P: Production<E>,
    P::Value: Callback<RuleOutput<E, P>>,
{
    type Output = (ProductionValue<E, P>,);

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        let rule = P::rule();
        self.run(ctx, reader, |child, value, reader| rule.parse(child, value, reader))
    }
}

/// A production whose rule is a branch can itself be tried as a branch.
impl<E, V, P> Branch<E, V> for ProductionRef<P>
where
    E: Encoding,
    P: Production<E>,
    P::Rule: Branch<E, P::Value>,
    P::Value: Callback<RuleOutput<E, P>>,
{
    type Attempt = <P::Rule as Branch<E, P::Value>>::Attempt;

    fn try_branch(&self, reader: Reader<'_, E>) -> Option<Self::Attempt> {
        P::rule().try_branch(reader)
    }

    fn finish(
        &self,
        attempt: Self::Attempt,
        ctx: &mut Context<'_, E>,
        _value: &V,
        reader: &mut Reader<'_, E>,
    ) -> Option<Self::Output> {
        let rule = P::rule();
        self.run(ctx, reader, |child, value, reader| rule.finish(attempt, child, value, reader))
    }
}

/// A production reachable from its own rule.
pub trait Recursive<E: Encoding>: Production<E> {
    /// The production's value.
    type Output;

    /// Parses the production as `p::<Self>()` would.
    fn parse_recursive(ctx: &mut Context<'_, E>, reader: &mut Reader<'_, E>) -> Option<Self::Output>;
}

/// Implements [`Recursive`]: `recursive!(Expr, Utf8, i64)`.
#[macro_export]
macro_rules! recursive {
    ($production:ty, $encoding:ty, $output:ty) => {
        impl $crate::lexkit::rules::Recursive<$encoding> for $production {
            type Output = $output;

            fn parse_recursive(
                ctx: &mut $crate::lexkit::grammar::Context<'_, $encoding>,
                reader: &mut $crate::lexkit::input::Reader<'_, $encoding>,
            ) -> Option<$output> {
                let production = $crate::lexkit::rules::p::<$production>();
                $crate::lexkit::rules::Rule::<$encoding>::parse(&production, ctx, &(), reader).map(|(value,)| value)
            }
        }
    };
}

pub struct Recurse<P> {
    _production: PhantomData<fn() -> P>,
}

/// Parses production `P`, which may be the production being defined.
pub fn recurse<P>() -> Recurse<P> {
    Recurse {
        _production: PhantomData,
    }
}

impl<P> Clone for Recurse<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Recurse<P> {}

impl<P> fmt::Debug for Recurse<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "recurse::<{}>()", std::any::type_name::<P>())
    }
}

impl<E: Encoding, V, P: Recursive<E>> Rule<E, V> for Recurse<P> {
    type Output = (P::Output,);

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<Self::Output> {
        P::parse_recursive(ctx, reader).map(|value| (value,))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::callback::{callback, FnCallback};
    use crate::lexkit::encoding::Utf8;
    use crate::lexkit::error::ErrorKind;
    use crate::lexkit::event::Silent;
    use crate::lexkit::grammar::{NoWhitespace, ParseOptions};
    use crate::lexkit::rules::{branch, choice, lit, seq, Branched, Choice, Literal, Seq};
    use crate::lexkit::testing::TraceHandler;

    /// `group | leaf`, valued by its nesting depth.
    struct Nested;
    /// `"(" nested ")"`
    struct Group;
    /// `"x"`
    struct Leaf;

    fn same(depth: usize) -> usize {
        depth
    }

    fn deeper(depth: usize) -> usize {
        depth + 1
    }

    fn leaf() -> usize {
        0
    }

    impl Production<Utf8> for Nested {
        const NAME: &'static str = "nested";
        type Rule = Choice<ProductionRef<Group>, ProductionRef<Leaf>>;
        type Whitespace = NoWhitespace;
        type Value = FnCallback<fn(usize) -> usize>;

        fn rule() -> Self::Rule {
            choice(p::<Group>(), p::<Leaf>())
        }

        fn value() -> Self::Value {
            callback(same as fn(usize) -> usize)
        }
    }

    impl Production<Utf8> for Group {
        const NAME: &'static str = "group";
        type Rule = Branched<Literal, Seq<Recurse<Nested>, Literal>>;
        type Whitespace = NoWhitespace;
        type Value = FnCallback<fn(usize) -> usize>;

        fn rule() -> Self::Rule {
            branch(lit("("), seq(recurse::<Nested>(), lit(")")))
        }

        fn value() -> Self::Value {
            callback(deeper as fn(usize) -> usize)
        }
    }

    impl Production<Utf8> for Leaf {
        const NAME: &'static str = "leaf";
        type Rule = Literal;
        type Whitespace = NoWhitespace;
        type Value = FnCallback<fn() -> usize>;

        fn rule() -> Literal {
            lit("x")
        }

        fn value() -> Self::Value {
            callback(leaf as fn() -> usize)
        }
    }

    crate::recursive!(Nested, Utf8, usize);

    fn depth_of(input: &[u8], options: &ParseOptions) -> Option<usize> {
        let mut silent = Silent;
        let mut ctx = Context::new(&mut silent, &(), options);
        let mut reader = Reader::<Utf8>::new(input);
        Rule::<Utf8>::parse(&recurse::<Nested>(), &mut ctx, &(), &mut reader).map(|(depth,)| depth)
    }

    #[test]
    fn test_recursion() {
        let options = ParseOptions::default();
        assert_eq!(depth_of(b"x", &options), Some(0));
        assert_eq!(depth_of(b"((x))", &options), Some(2));
        assert_eq!(depth_of(b"((x)", &options), None);
    }

    #[test]
    fn test_recursion_limit() {
        // nested > group > nested > leaf
        let options = ParseOptions::new().with_max_recursion_depth(4);
        assert_eq!(depth_of(b"(x)", &options), Some(1));

        let mut trace = TraceHandler::new();
        let output = {
            let mut ctx = Context::new(&mut trace, &(), &options);
            let mut reader = Reader::<Utf8>::new(b"((x))");
            Rule::<Utf8>::parse(&recurse::<Nested>(), &mut ctx, &(), &mut reader)
        };
        assert!(output.is_none());
        let limit = trace.events().iter().find_map(|event| match event {
            Event::Error(error) => Some(error.kind.clone()),
            _ => None,
        });
        assert_eq!(limit, Some(ErrorKind::RecursionLimit { max_depth: 4 }));
    }
}
