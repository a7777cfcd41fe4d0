//! # lexkit
//!
//! Parser combinators for hand-written grammars.
//!
//! A grammar is a set of [`Production`](lexkit::grammar::Production) types whose rules are
//! built from small combinator values (literals, sequences, choices, lists, symbol tables,
//! tokens). The same grammar can be run three ways:
//!
//!   - [`validate`](lexkit::action::validate): success flag plus the reported errors
//!   - [`parse`](lexkit::action::parse): a typed value assembled by callbacks and sinks
//!   - [`parse_as_tree`](lexkit::action::parse_as_tree): a lossless syntax tree whose
//!     tokens cover the consumed input with no gaps
//!
//! File Layout
//!
//! src/lexkit
//!   ├── encoding, code_point   Code units and the Unicode codec
//!   ├── input, location        Readers over units, line/column lookup
//!   ├── rules, grammar         The rule protocol, combinators and productions
//!   ├── symbol                 Symbol tables (tries with longest match)
//!   ├── callback               Values, sinks and containers
//!   ├── tree                   Lossless parse trees
//!   ├── action                 The three ways to run a grammar
//!   └── testing                Event traces for tests
//!
//! For testing conventions, see the [testing module](lexkit::testing).

pub mod lexkit;
