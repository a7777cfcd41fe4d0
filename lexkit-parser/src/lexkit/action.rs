//! Actions
//!
//! An action runs a grammar's root production over an input and consumes the event
//! stream:
//!
//!   - [`validate`] collects errors
//!   - [`parse`] additionally returns the root production's value
//!   - [`parse_as_tree`] additionally builds a lossless [`ParseTree`]
//!   - [`matches`] checks a rule against a prefix of a reader, silently
//!
//! The free functions use an empty parse state and default options; [`Action`] sets
//! both and can observe errors as they are reported.

use super::callback::Callback;
use super::encoding::Encoding;
use super::error::ParseError;
use super::event::{Event, EventHandler, Silent, TokenKind};
use super::grammar::{Context, ParseOptions, Production, ProductionValue, RuleOutput};
use super::input::{Input, Reader};
use super::rules::{p, Rule};
use super::tree::{Marker, ParseTree, TreeBuilder};
use serde::Serialize;
use std::any::Any;

/// How a parse ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The root production matched and nothing was reported.
    Success,
    /// The root production matched after recovering from errors.
    RecoveredError,
    /// The root production failed.
    FatalError,
}

impl Status {
    fn of(matched: bool, errors: &[ParseError]) -> Self {
        match (matched, errors.is_empty()) {
            (false, _) => Status::FatalError,
            (true, true) => Status::Success,
            (true, false) => Status::RecoveredError,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidateResult {
    pub status: Status,
    pub errors: Vec<ParseError>,
}

impl ValidateResult {
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Success or recovered error.
    pub fn is_recovered(&self) -> bool {
        self.status != Status::FatalError
    }

    pub fn is_fatal(&self) -> bool {
        self.status == Status::FatalError
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseResult<T> {
    pub status: Status,
    /// Present unless the parse failed fatally.
    pub value: Option<T>,
    pub errors: Vec<ParseError>,
}

impl<T> ParseResult<T> {
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn is_fatal(&self) -> bool {
        self.status == Status::FatalError
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn into_value(self) -> Option<T> {
        self.value
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }
}

/// Collects errors, passing each one to an optional callback first.
struct ValidateHandler<'a> {
    errors: Vec<ParseError>,
    on_error: Option<&'a mut dyn FnMut(&ParseError)>,
}

impl<'a> ValidateHandler<'a> {
    fn new(on_error: Option<&'a mut dyn FnMut(&ParseError)>) -> Self {
        Self {
            errors: Vec::new(),
            on_error,
        }
    }
}

impl EventHandler for ValidateHandler<'_> {
    fn on(&mut self, event: Event) {
        if let Event::Error(error) = event {
            if let Some(on_error) = self.on_error.as_mut() {
                on_error(&error);
            }
            self.errors.push(error);
        }
    }
}

/// Builds a tree from the event stream and forwards errors to a validate handler.
struct TreeHandler<'a> {
    validate: ValidateHandler<'a>,
    builder: Option<TreeBuilder>,
    markers: Vec<Marker>,
    tree: ParseTree,
    depth: usize,
}

impl<'a> TreeHandler<'a> {
    fn new(validate: ValidateHandler<'a>) -> Self {
        Self {
            validate,
            builder: None,
            markers: Vec::new(),
            tree: ParseTree::new(),
            depth: 0,
        }
    }
}

impl EventHandler for TreeHandler<'_> {
    fn on(&mut self, event: Event) {
        match event {
            Event::ProductionStart { name, position } => {
                match self.builder.as_mut() {
                    Some(builder) => self.markers.push(builder.start_production(name, position)),
                    None => self.builder = Some(TreeBuilder::new(name, position)),
                }
                self.depth += 1;
            }
            Event::ProductionFinish { .. } => {
                self.depth -= 1;
                if self.depth == 0 {
                    if let Some(builder) = self.builder.take() {
                        self.tree = builder.finish();
                    }
                } else if let (Some(builder), Some(marker)) = (self.builder.as_mut(), self.markers.pop()) {
                    builder.finish_production(marker);
                }
            }
            Event::ProductionCancel { position, .. } => {
                self.depth -= 1;
                if self.depth == 0 {
                    self.builder = None;
                    self.tree.clear();
                } else if let (Some(builder), Some(marker)) = (self.builder.as_mut(), self.markers.pop()) {
                    let begin = marker.begin(builder);
                    builder.cancel_production(marker);
                    if position > begin {
                        builder.token(TokenKind::Error, begin, position);
                    }
                }
            }
            Event::Token { kind, range } => {
                if let Some(builder) = self.builder.as_mut() {
                    builder.token(kind, range.start, range.end);
                }
            }
            Event::Error(_) => self.validate.on(event),
        }
    }
}

/// Runs production `P` as the root.
fn run_root<E, P>(
    reader: &mut Reader<'_, E>,
    handler: &mut dyn EventHandler,
    state: &dyn Any,
    options: &ParseOptions,
) -> Option<ProductionValue<E, P>>
where
    E: Encoding,
    P: Production<E>,
    P::Value: Callback<RuleOutput<E, P>>,
{
    log::debug!("running {} over {} {} units", P::NAME, reader.end(), E::KIND);
    let mut ctx = Context::new(handler, state, options);
    Rule::<E>::parse(&p::<P>(), &mut ctx, &(), reader).map(|(value,)| value)
}

fn log_outcome(name: &str, status: Status, errors: &[ParseError]) {
    log::debug!("{} finished with {:?} and {} errors", name, status, errors.len());
}

/// Configures and runs an action.
pub struct Action<'a, I> {
    input: &'a I,
    state: &'a dyn Any,
    options: ParseOptions,
    on_error: Option<&'a mut dyn FnMut(&ParseError)>,
}

impl<'a, I: Input> Action<'a, I> {
    pub fn new(input: &'a I) -> Self {
        Self {
            input,
            state: &(),
            options: ParseOptions::default(),
            on_error: None,
        }
    }

    /// The parse state seen by callbacks and allocators.
    pub fn state<S: Any>(mut self, state: &'a S) -> Self {
        self.state = state;
        self
    }

    pub fn options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    /// Called once for every reported error, in order.
    pub fn on_error(mut self, on_error: &'a mut dyn FnMut(&ParseError)) -> Self {
        self.on_error = Some(on_error);
        self
    }

    pub fn validate<P>(self) -> ValidateResult
    where
        P: Production<I::Encoding>,
        P::Value: Callback<RuleOutput<I::Encoding, P>>,
    {
        let mut reader = self.input.reader();
        let mut handler = ValidateHandler::new(self.on_error);
        let matched = run_root::<_, P>(&mut reader, &mut handler, self.state, &self.options).is_some();
        let status = Status::of(matched, &handler.errors);
        log_outcome(P::NAME, status, &handler.errors);
        ValidateResult {
            status,
            errors: handler.errors,
        }
    }

    pub fn parse<P>(self) -> ParseResult<ProductionValue<I::Encoding, P>>
    where
        P: Production<I::Encoding>,
        P::Value: Callback<RuleOutput<I::Encoding, P>>,
    {
        let mut reader = self.input.reader();
        let mut handler = ValidateHandler::new(self.on_error);
        let value = run_root::<_, P>(&mut reader, &mut handler, self.state, &self.options);
        let status = Status::of(value.is_some(), &handler.errors);
        log_outcome(P::NAME, status, &handler.errors);
        ParseResult {
            status,
            value,
            errors: handler.errors,
        }
    }

    /// Replaces the contents of `tree` with the parse tree; a fatal error leaves it empty.
    pub fn parse_as_tree<P>(self, tree: &mut ParseTree) -> ValidateResult
    where
        P: Production<I::Encoding>,
        P::Value: Callback<RuleOutput<I::Encoding, P>>,
    {
        let mut reader = self.input.reader();
        let mut handler = TreeHandler::new(ValidateHandler::new(self.on_error));
        let matched = run_root::<_, P>(&mut reader, &mut handler, self.state, &self.options).is_some();
        let status = Status::of(matched, &handler.validate.errors);
        log_outcome(P::NAME, status, &handler.validate.errors);
        *tree = handler.tree;
        ValidateResult {
            status,
            errors: handler.validate.errors,
        }
    }
}

pub fn validate<P, I>(input: &I) -> ValidateResult
where
    I: Input,
    P: Production<I::Encoding>,
    P::Value: Callback<RuleOutput<I::Encoding, P>>,
{
    Action::new(input).validate::<P>()
}

pub fn parse<P, I>(input: &I) -> ParseResult<ProductionValue<I::Encoding, P>>
where
    I: Input,
    P: Production<I::Encoding>,
    P::Value: Callback<RuleOutput<I::Encoding, P>>,
{
    Action::new(input).parse::<P>()
}

pub fn parse_as_tree<P, I>(tree: &mut ParseTree, input: &I) -> ValidateResult
where
    I: Input,
    P: Production<I::Encoding>,
    P::Value: Callback<RuleOutput<I::Encoding, P>>,
{
    Action::new(input).parse_as_tree::<P>(tree)
}

/// Whether `rule` matches at the reader's position. On a match the reader is moved
/// after it; otherwise it is left untouched. Nothing is reported.
pub fn matches<E: Encoding, R: Rule<E>>(reader: &mut Reader<'_, E>, rule: &R) -> bool {
    let mut silent = Silent;
    let mut ctx = Context::new(&mut silent, &(), &ParseOptions::default());
    let mut probe = *reader;
    match rule.parse(&mut ctx, &(), &mut probe) {
        Some(_) => {
            *reader = probe;
            true
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexkit::encoding::Utf8;
    use crate::lexkit::error::ErrorKind;
    use crate::lexkit::grammar::NoWhitespace;
    use crate::lexkit::input::string_input;
    use crate::lexkit::rules::{lit, seq, try_, Literal, Seq, Try};

    struct Greeting;

    impl Production<Utf8> for Greeting {
        const NAME: &'static str = "greeting";
        type Rule = Seq<Try<Literal>, Literal>;
        type Whitespace = NoWhitespace;
        type Value = ();

        fn rule() -> Self::Rule {
            seq(try_(lit("hello ")), lit("world"))
        }

        fn value() {}
    }

    #[test]
    fn test_status() {
        assert!(validate::<Greeting, _>(&string_input("hello world")).is_success());

        let recovered = validate::<Greeting, _>(&string_input("world"));
        assert_eq!(recovered.status, Status::RecoveredError);
        assert_eq!(recovered.errors.len(), 1);

        let fatal = validate::<Greeting, _>(&string_input("hello there"));
        assert!(fatal.is_fatal());
        assert_eq!(
            fatal.errors[0].kind,
            ErrorKind::ExpectedLiteral {
                literal: "world".to_string(),
                index: 0
            }
        );
    }

    #[test]
    fn test_error_callback_sees_every_error() {
        let mut seen = Vec::new();
        let mut record = |error: &ParseError| seen.push(error.to_string());
        let input = string_input("hello there");
        let result = Action::new(&input).on_error(&mut record).validate::<Greeting>();
        assert!(result.is_fatal());
        assert_eq!(seen, vec!["greeting: expected 'world' at 6..6"]);
    }

    #[test]
    fn test_fatal_tree_is_empty() {
        let mut tree = ParseTree::new();
        let result = parse_as_tree::<Greeting, _>(&mut tree, &string_input("hello there"));
        assert!(result.is_fatal());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_matches_prefix() {
        let input = string_input("abc123");
        let mut reader = input.reader();
        assert!(!matches(&mut reader, &lit("abd")));
        assert_eq!(reader.position(), 0);
        assert!(matches(&mut reader, &lit("abc")));
        assert_eq!(reader.position(), 3);
    }
}
