//! Productions and the parse context
//!
//! A grammar is a set of types implementing [`Production`]. Each production names a rule,
//! the value callback that turns the rule's output into the production's value, and
//! optionally the whitespace that is skipped between its tokens.
//!
//! The [`Context`] is threaded through every rule call. It owns nothing: it borrows the
//! event handler and the parse state, and records the whitespace scope of the
//! production currently being parsed.
//!
//! Whitespace scope:
//!
//!   - a production declaring whitespace makes it the scope for its rule
//!   - a production that does not inherits the scope of its parent
//!   - a token production (`IS_TOKEN`) only sees its own whitespace, and never skips
//!     whitespace automatically; the parent skips after it instead

use super::encoding::Encoding;
use super::error::{ErrorKind, ParseError};
use super::event::{ErrorsOnly, Event, EventHandler, TokenKind};
use super::input::Reader;
use super::rules::{Branch, Rule};
use std::any::Any;
use std::ops::Range;

pub const DEFAULT_MAX_RECURSION_DEPTH: usize = 1000;

/// Knobs for one action run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Deepest allowed production nesting, `0` for no limit.
    pub max_recursion_depth: usize,
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_recursion_depth(mut self, depth: usize) -> Self {
        self.max_recursion_depth = depth;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: DEFAULT_MAX_RECURSION_DEPTH,
        }
    }
}

/// A named grammar rule.
pub trait Production<E: Encoding> {
    const NAME: &'static str;

    /// Token productions appear as one unit to whitespace skipping.
    const IS_TOKEN: bool = false;

    type Rule: Rule<E, Self::Value>;
    type Whitespace: Branch<E>;
    type Value;

    fn rule() -> Self::Rule;

    fn whitespace() -> Option<Self::Whitespace> {
        None
    }

    fn value() -> Self::Value;
}

/// Output tuple of a production's rule.
pub type RuleOutput<E, P> =
    <<P as Production<E>>::Rule as Rule<E, <P as Production<E>>::Value>>::Output;

/// The value a production produces.
pub type ProductionValue<E, P> =
    <<P as Production<E>>::Value as super::callback::Callback<RuleOutput<E, P>>>::Output;

/// Whitespace type for productions that declare none.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWhitespace;

impl<E: Encoding, V> Rule<E, V> for NoWhitespace {
    type Output = ();

    fn parse(&self, _ctx: &mut Context<'_, E>, _value: &V, _reader: &mut Reader<'_, E>) -> Option<()> {
        Some(())
    }
}

impl<E: Encoding, V> Branch<E, V> for NoWhitespace {
    type Attempt = ();

    fn try_branch(&self, _reader: Reader<'_, E>) -> Option<()> {
        None
    }

    fn finish(&self, _attempt: (), _ctx: &mut Context<'_, E>, _value: &V, _reader: &mut Reader<'_, E>) -> Option<()> {
        Some(())
    }
}

/// Object-safe view of a whitespace rule.
pub trait Whitespace<E: Encoding> {
    /// Skips as much whitespace as possible. `false` means the whitespace rule failed
    /// after committing; the failure has been reported.
    fn skip(&self, ctx: &mut Context<'_, E>, reader: &mut Reader<'_, E>) -> bool;
}

impl<E: Encoding, R: Branch<E>> Whitespace<E> for R {
    fn skip(&self, ctx: &mut Context<'_, E>, reader: &mut Reader<'_, E>) -> bool {
        loop {
            let Some(attempt) = self.try_branch(*reader) else {
                return true;
            };
            let before = reader.position();
            if self.finish(attempt, ctx, &(), reader).is_none() {
                return false;
            }
            if reader.position() == before {
                return true;
            }
        }
    }
}

/// Execution state shared by all rules of one production.
pub struct Context<'c, E: Encoding> {
    handler: &'c mut dyn EventHandler,
    state: &'c dyn Any,
    whitespace: Option<&'c dyn Whitespace<E>>,
    auto_whitespace: bool,
    production: &'static str,
    depth: usize,
    max_depth: usize,
}

impl<'c, E: Encoding> Context<'c, E> {
    /// A context for the start of an action.
    pub fn new(handler: &'c mut dyn EventHandler, state: &'c dyn Any, options: &ParseOptions) -> Self {
        Self {
            handler,
            state,
            whitespace: None,
            auto_whitespace: true,
            production: "",
            depth: 0,
            max_depth: options.max_recursion_depth,
        }
    }

    /// The parse state handed to the action.
    pub fn state(&self) -> &'c dyn Any {
        self.state
    }

    /// The parse state, if it has type `S`.
    pub fn state_as<S: 'static>(&self) -> Option<&'c S> {
        self.state.downcast_ref::<S>()
    }

    /// Name of the production being parsed.
    pub fn production(&self) -> &'static str {
        self.production
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn emit(&mut self, event: Event) {
        self.handler.on(event);
    }

    pub fn token(&mut self, kind: TokenKind, begin: usize, end: usize) {
        self.handler.on(Event::Token {
            kind,
            range: begin..end,
        });
    }

    pub fn error(&mut self, kind: ErrorKind, range: Range<usize>) {
        let error = ParseError::new(kind, range, self.production);
        self.handler.on(Event::Error(error));
    }

    /// Skips whitespace after a token, unless automatic skipping is off here.
    pub fn skip_whitespace(&mut self, reader: &mut Reader<'_, E>) -> bool {
        if !self.auto_whitespace {
            return true;
        }
        self.skip_scope_whitespace(reader)
    }

    /// Skips the whitespace of the current scope, even where automatic skipping is off.
    pub fn skip_scope_whitespace(&mut self, reader: &mut Reader<'_, E>) -> bool {
        match self.whitespace {
            Some(whitespace) => self.skip_with(whitespace, reader),
            None => true,
        }
    }

    /// Skips `whitespace`, reporting the consumed range as one whitespace token.
    ///
    /// Tokens produced by the whitespace rule itself are swallowed; its errors are not.
    /// If it fails, whatever it consumed is reported as an error token.
    pub fn skip_with(&mut self, whitespace: &dyn Whitespace<E>, reader: &mut Reader<'_, E>) -> bool {
        let begin = reader.position();
        let skipped = {
            let mut errors = ErrorsOnly::new(&mut *self.handler);
            let mut inner = Context {
                handler: &mut errors,
                state: self.state,
                whitespace: None,
                auto_whitespace: false,
                production: self.production,
                depth: self.depth,
                max_depth: self.max_depth,
            };
            whitespace.skip(&mut inner, reader)
        };
        let end = reader.position();
        if skipped {
            if end > begin {
                self.token(TokenKind::Whitespace, begin, end);
            }
            true
        } else {
            if end > begin {
                self.token(TokenKind::Error, begin, end);
            }
            false
        }
    }

    /// The context for a child production, or `None` (after reporting) when the
    /// recursion limit is reached.
    pub(crate) fn enter<'x>(
        &'x mut self,
        name: &'static str,
        is_token: bool,
        own_whitespace: Option<&'x dyn Whitespace<E>>,
        position: usize,
    ) -> Option<Context<'x, E>> {
        let depth = self.depth + 1;
        if self.max_depth != 0 && depth > self.max_depth {
            let max_depth = self.max_depth;
            self.error(ErrorKind::RecursionLimit { max_depth }, position..position);
            return None;
        }
        let inherited: Option<&'x dyn Whitespace<E>> = self.whitespace;
        let (whitespace, auto_whitespace) = if is_token {
            (own_whitespace, false)
        } else {
            (own_whitespace.or(inherited), self.auto_whitespace)
        };
        Some(Context {
            handler: &mut *self.handler,
            state: self.state,
            whitespace,
            auto_whitespace,
            production: name,
            depth,
            max_depth: self.max_depth,
        })
    }

    /// The same context with automatic whitespace skipping turned off.
    pub(crate) fn without_auto_whitespace(&mut self) -> Context<'_, E> {
        Context {
            handler: &mut *self.handler,
            state: self.state,
            whitespace: self.whitespace,
            auto_whitespace: false,
            production: self.production,
            depth: self.depth,
            max_depth: self.max_depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::encoding::Utf8;
    use crate::lexkit::event::Silent;
    use crate::lexkit::input::string_input;
    use crate::lexkit::rules::{ascii, lit, p, seq, AsciiClass, Literal, ProductionRef, Seq};
    use crate::lexkit::testing::{trace, TraceHandler};

    /// `ab` as a single token production.
    struct Ab;

    impl Production<Utf8> for Ab {
        const NAME: &'static str = "ab";
        const IS_TOKEN: bool = true;
        type Rule = Seq<Literal, Literal>;
        type Whitespace = NoWhitespace;
        type Value = ();

        fn rule() -> Self::Rule {
            seq(lit("a"), lit("b"))
        }

        fn value() {}
    }

    /// `ab c`, skipping spaces.
    struct AbC;

    impl Production<Utf8> for AbC {
        const NAME: &'static str = "abc";
        type Rule = Seq<ProductionRef<Ab>, Literal>;
        type Whitespace = AsciiClass;
        type Value = ();

        fn rule() -> Self::Rule {
            seq(p::<Ab>(), lit("c"))
        }

        fn whitespace() -> Option<AsciiClass> {
            Some(ascii::space())
        }

        fn value() {}
    }

    #[test]
    fn test_options_builder() {
        let options = ParseOptions::new().with_max_recursion_depth(3);
        assert_eq!(options.max_recursion_depth, 3);
        assert_eq!(ParseOptions::default().max_recursion_depth, DEFAULT_MAX_RECURSION_DEPTH);
    }

    #[test]
    fn test_state_downcast() {
        let mut silent = Silent;
        let state = 42u32;
        let ctx = Context::<Utf8>::new(&mut silent, &state, &ParseOptions::default());
        assert_eq!(ctx.state_as::<u32>(), Some(&42));
        assert_eq!(ctx.state_as::<i64>(), None);
    }

    #[test]
    fn test_skip_with_reports_one_token() {
        let mut trace = TraceHandler::new();
        let space = ascii::space();
        let mut reader = Reader::<Utf8>::new(b"   x");
        {
            let mut ctx = Context::new(&mut trace, &(), &ParseOptions::default());
            assert!(ctx.skip_with(&space, &mut reader));
        }
        assert_eq!(reader.position(), 3);
        assert_eq!(trace.lines(), vec!["token whitespace 0..3"]);
    }

    #[test]
    fn test_enter_respects_recursion_limit() {
        let mut trace = TraceHandler::new();
        let mut ctx = Context::<Utf8>::new(&mut trace, &(), &ParseOptions::new().with_max_recursion_depth(1));
        let mut child = ctx.enter("a", false, None, 0).expect("depth 1 is allowed");
        assert!(child.enter("b", false, None, 0).is_none());
        drop(child);
        drop(ctx);
        assert_eq!(trace.lines(), vec!["error a: maximum recursion depth of 1 exceeded at 0..0"]);
    }

    #[test]
    fn test_token_production_does_not_inherit() {
        let mut silent = Silent;
        let dots = lit(".");
        let mut root = Context::<Utf8>::new(&mut silent, &(), &ParseOptions::default());
        let mut parent = root.enter("parent", false, Some(&dots), 0).unwrap();
        let inner = parent.enter("inner", true, None, 0).unwrap();
        assert!(inner.whitespace.is_none());
        assert!(!inner.auto_whitespace);
    }

    #[test]
    fn test_token_production_skips_no_whitespace_inside() {
        assert_eq!(
            trace::<AbC, _>(&string_input("a b c")),
            vec![
                "production abc",
                "production ab",
                "token literal 0..1",
                "error ab: expected 'b' at 1..1",
                "cancel ab",
                "cancel abc",
            ]
        );
    }

    #[test]
    fn test_parent_whitespace_resumes_after_token_production() {
        assert_eq!(
            trace::<AbC, _>(&string_input("ab  c")),
            vec![
                "production abc",
                "production ab",
                "token literal 0..1",
                "token literal 1..2",
                "finish ab",
                "token whitespace 2..4",
                "token literal 4..5",
                "finish abc",
            ]
        );
    }
}
