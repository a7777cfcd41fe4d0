//! Test support
//!
//! [`TraceHandler`] records the event stream as one line per event, so tests can
//! assert exactly what a grammar reported:
//!
//! ```text
//! production list
//! token digits 0..1
//! token whitespace 1..2
//! error list: expected ',' at 2..2
//! cancel list
//! ```

use super::callback::Callback;
use super::event::{Event, EventHandler};
use super::grammar::{Context, ParseOptions, Production, RuleOutput};
use super::input::Input;
use super::rules::{p, Rule};

/// Collects events and renders them as lines.
#[derive(Debug, Default, Clone)]
pub struct TraceHandler {
    events: Vec<Event>,
}

impl TraceHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(render).collect()
    }
}

impl EventHandler for TraceHandler {
    fn on(&mut self, event: Event) {
        self.events.push(event);
    }
}

fn render(event: &Event) -> String {
    match event {
        Event::ProductionStart { name, .. } => format!("production {}", name),
        Event::ProductionFinish { name, .. } => format!("finish {}", name),
        Event::ProductionCancel { name, .. } => format!("cancel {}", name),
        Event::Token { kind, range } => format!("token {} {}..{}", kind, range.start, range.end),
        Event::Error(error) => format!("error {}", error),
    }
}

/// Parses production `P` over `input` and returns the trace.
pub fn trace<P, I>(input: &I) -> Vec<String>
where
    I: Input,
    P: Production<I::Encoding>,
    P::Value: Callback<RuleOutput<I::Encoding, P>>,
{
    let mut handler = TraceHandler::new();
    let mut reader = input.reader();
    {
        let mut ctx = Context::new(&mut handler, &(), &ParseOptions::default());
        Rule::<I::Encoding>::parse(&p::<P>(), &mut ctx, &(), &mut reader);
    }
    handler.lines()
}
