//! Explicit whitespace control
//!
//! Automatic skipping (after every token, in the scope of the current production) covers
//! most grammars. These rules handle the rest:
//!
//!   - `ws()` skips the scope's whitespace right here, even inside a token production
//!   - `whitespace(rule)` skips `rule` as whitespace, whatever the scope
//!   - `no_whitespace(rule)` parses `rule` without automatic skipping and skips once after it

use super::{Branch, Rule};
use crate::lexkit::encoding::Encoding;
use crate::lexkit::grammar::Context;
use crate::lexkit::input::Reader;

#[derive(Debug, Clone, Copy, Default)]
pub struct Ws;

pub fn ws() -> Ws {
    Ws
}

impl<E: Encoding, V> Rule<E, V> for Ws {
    type Output = ();

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<()> {
        ctx.skip_scope_whitespace(reader).then_some(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WhitespaceRule<R> {
    rule: R,
}

pub fn whitespace<R>(rule: R) -> WhitespaceRule<R> {
    WhitespaceRule { rule }
}

impl<E: Encoding, V, R: Branch<E>> Rule<E, V> for WhitespaceRule<R> {
    type Output = ();

    fn parse(&self, ctx: &mut Context<'_, E>, _value: &V, reader: &mut Reader<'_, E>) -> Option<()> {
        ctx.skip_with(&self.rule, reader).then_some(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct WithoutWhitespace<R> {
    rule: R,
}

pub fn no_whitespace<R>(rule: R) -> WithoutWhitespace<R> {
    WithoutWhitespace { rule }
}

impl<E: Encoding, V, R: Rule<E, V>> Rule<E, V> for WithoutWhitespace<R> {
    type Output = R::Output;

    fn parse(&self, ctx: &mut Context<'_, E>, value: &V, reader: &mut Reader<'_, E>) -> Option<R::Output> {
        let output = self.rule.parse(&mut ctx.without_auto_whitespace(), value, reader)?;
        ctx.skip_whitespace(reader).then_some(output)
    }
}

impl<E: Encoding, V, R: Branch<E, V>> Branch<E, V> for WithoutWhitespace<R> {
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
        let output = self.rule.finish(attempt, &mut ctx.without_auto_whitespace(), value, reader)?;
        ctx.skip_whitespace(reader).then_some(output)
    }

    fn cancel(&self, attempt: R::Attempt) {
        self.rule.cancel(attempt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::encoding::Utf8;
    use crate::lexkit::grammar::{ParseOptions, Production};
    use crate::lexkit::rules::{ascii, lit, p, seq, AsciiClass, Literal, Seq};
    use crate::lexkit::testing::TraceHandler;

    struct Spaced;

    impl Production<Utf8> for Spaced {
        const NAME: &'static str = "spaced";
        type Rule = WithoutWhitespace<Seq<Literal, Literal>>;
        type Whitespace = AsciiClass;
        type Value = ();

        fn rule() -> Self::Rule {
            no_whitespace(seq(lit("a"), lit("b")))
        }

        fn whitespace() -> Option<Self::Whitespace> {
            Some(ascii::blank())
        }

        fn value() {}
    }

    struct Words;

    impl Production<Utf8> for Words {
        const NAME: &'static str = "words";
        type Rule = Seq<Literal, Seq<Ws, Literal>>;
        type Whitespace = AsciiClass;
        type Value = ();

        fn rule() -> Self::Rule {
            seq(lit("a"), seq(ws(), lit("b")))
        }

        fn whitespace() -> Option<Self::Whitespace> {
            Some(ascii::blank())
        }

        fn value() {}
    }

    fn run<R: Rule<Utf8>>(rule: R, text: &str) -> (bool, usize, Vec<String>) {
        let mut trace = TraceHandler::new();
        let mut reader = Reader::<Utf8>::new(text.as_bytes());
        let ok = {
            let mut ctx = Context::new(&mut trace, &(), &ParseOptions::default());
            rule.parse(&mut ctx, &(), &mut reader).is_some()
        };
        (ok, reader.position(), trace.lines())
    }

    #[test]
    fn test_automatic_skipping_after_tokens() {
        let (ok, position, lines) = run(p::<Words>(), "a  b ");
        assert!(ok);
        assert_eq!(position, 5);
        assert_eq!(
            lines,
            vec![
                "production words",
                "token literal 0..1",
                "token whitespace 1..3",
                "token literal 3..4",
                "token whitespace 4..5",
                "finish words",
            ]
        );
    }

    #[test]
    fn test_no_whitespace_inside() {
        let (ok, _, lines) = run(p::<Spaced>(), "a b");
        assert!(!ok);
        assert_eq!(
            lines,
            vec![
                "production spaced",
                "token literal 0..1",
                "error spaced: expected 'b' at 1..1",
                "cancel spaced",
            ]
        );
        let (ok, position, _) = run(p::<Spaced>(), "ab  ");
        assert!(ok);
        assert_eq!(position, 4);
    }

    #[test]
    fn test_explicit_whitespace_rule() {
        let (ok, position, lines) = run(seq(lit("x"), seq(whitespace(ascii::space()), lit("y"))), "x \n y");
        assert!(ok);
        assert_eq!(position, 5);
        assert_eq!(lines, vec!["token literal 0..1", "token whitespace 1..4", "token literal 4..5"]);
    }

    #[test]
    fn test_ws_without_scope_does_nothing() {
        let (ok, position, lines) = run(seq(ws(), lit("a")), "a");
        assert!(ok);
        assert_eq!(position, 1);
        assert_eq!(lines, vec!["token literal 0..1"]);
    }
}
